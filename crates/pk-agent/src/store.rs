//! Visitor storage: `VisitorStore` holds visitors and their RNGs side by side.
//!
//! Ids are handed out sequentially and never reused, so iterating the
//! id-keyed maps in key order is iterating in insertion (spawn) order.
//!
//! RNGs sit in their own map for the same reason the visitors' state and
//! RNG streams are separate elsewhere: an update needs `&mut Visitor` and
//! `&mut AgentRng` at once, and [`VisitorStore::get_with_rng`] hands out
//! both from disjoint fields.

use std::collections::BTreeMap;

use pk_core::{AgentId, AgentRng, Demographic, NodeId, Tick, VisualHandle, WorldPoint};

use crate::Visitor;
use crate::names::random_name;

pub struct VisitorStore {
    seed:     u64,
    next_id:  u32,
    visitors: BTreeMap<AgentId, Visitor>,
    rngs:     BTreeMap<AgentId, AgentRng>,
}

impl VisitorStore {
    pub fn new(seed: u64) -> Self {
        Self { seed, next_id: 0, visitors: BTreeMap::new(), rngs: BTreeMap::new() }
    }

    /// Create a visitor standing on `origin` and return its id.
    pub fn spawn(
        &mut self,
        demographic: Demographic,
        visual:      VisualHandle,
        origin:      NodeId,
        at:          WorldPoint,
        now:         Tick,
        now_ms:      u64,
    ) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        let mut rng = AgentRng::new(self.seed, id);
        let name = random_name(&mut rng);
        let visitor = Visitor::new(id, name, demographic, visual, origin, at, now, now_ms);
        self.visitors.insert(id, visitor);
        self.rngs.insert(id, rng);
        id
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Total visitors ever spawned.
    pub fn spawned(&self) -> u32 {
        self.next_id
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.visitors.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Visitor> {
        self.visitors.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Visitor> {
        self.visitors.get_mut(&id)
    }

    /// A visitor together with its RNG stream.
    pub fn get_with_rng(&mut self, id: AgentId) -> Option<(&mut Visitor, &mut AgentRng)> {
        let visitor = self.visitors.get_mut(&id)?;
        let rng = self.rngs.get_mut(&id)?;
        Some((visitor, rng))
    }

    /// Live ids in insertion order, as an owned snapshot so the caller can
    /// mutate the store while walking it.
    pub fn ids(&self) -> Vec<AgentId> {
        self.visitors.keys().copied().collect()
    }

    /// Live visitors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Visitor> {
        self.visitors.values()
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Visitor> {
        self.rngs.remove(&id);
        self.visitors.remove(&id)
    }
}
