//! Stand engine: continuously open, per-visitor sampled dwell and spend.

use std::fmt;

use pk_core::{AgentId, AgentRng, ConcessionSpec, GridPos, Tick};

use crate::{Release, VenueKind};

/// One visitor inside a stand.  `dwell` and `meal_cost` are drawn once at
/// admission and never resampled.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcessionEntry {
    pub agent:      AgentId,
    /// Ticks spent inside.
    pub dwell:      f64,
    pub meal_cost:  f64,
    /// Set on the first step after admission.
    pub entry_time: Option<Tick>,
}

#[derive(Clone, Debug)]
pub struct Concession {
    pub subtype: String,
    pub spec:    ConcessionSpec,
    waiting:     Vec<ConcessionEntry>,
    loaded:      Vec<ConcessionEntry>,
    pub revenue: f64,
    pub cost:    f64,
    /// Visitors admitted over the stand's lifetime.
    pub traffic: u64,
    built_at:    Tick,
}

impl Concession {
    pub fn new(subtype: impl Into<String>, spec: ConcessionSpec, built_at: Tick) -> Self {
        let cost = spec.installation_cost;
        Self {
            subtype: subtype.into(),
            spec,
            waiting: Vec::new(),
            loaded: Vec::new(),
            revenue: 0.0,
            cost,
            traffic: 0,
            built_at,
        }
    }

    pub fn waiting(&self) -> &[ConcessionEntry] {
        &self.waiting
    }

    pub fn loaded(&self) -> &[ConcessionEntry] {
        &self.loaded
    }

    pub fn holds(&self, agent: AgentId) -> bool {
        self.waiting.iter().chain(&self.loaded).any(|e| e.agent == agent)
    }

    /// Admit a visitor, sampling its dwell time and meal cost from the
    /// visitor's own RNG.  Negative draws are clamped to zero.
    pub fn admit(&mut self, agent: AgentId, rng: &mut AgentRng) -> bool {
        if self.holds(agent) {
            return false;
        }
        let dwell = rng.normal(self.spec.dwell_mean, self.spec.dwell_sd).max(0.0);
        let meal_cost = rng.normal(self.spec.spend_mean, self.spec.spend_sd).max(0.0);
        self.admit_sampled(agent, dwell, meal_cost);
        true
    }

    /// Admit with pre-drawn values.
    pub fn admit_sampled(&mut self, agent: AgentId, dwell: f64, meal_cost: f64) {
        self.traffic += 1;
        self.waiting.push(ConcessionEntry { agent, dwell, meal_cost, entry_time: None });
    }

    /// Timestamp newly admitted visitors, then release everyone whose dwell
    /// time has elapsed.
    pub fn step(&mut self, now: Tick, pos: GridPos) -> Vec<Release> {
        self.cost = self.cost_at(now);

        for mut entry in self.waiting.drain(..) {
            entry.entry_time = Some(now);
            self.loaded.push(entry);
        }

        let mut released = Vec::new();
        // Reverse scan keeps the remaining indices valid across `remove`.
        for i in (0..self.loaded.len()).rev() {
            let entry = &self.loaded[i];
            let entered = entry.entry_time.unwrap_or(now);
            if entered.as_f64() + entry.dwell <= now.as_f64() {
                let entry = self.loaded.remove(i);
                released.push(self.release_one(entry, pos));
            }
        }
        released
    }

    /// Release everyone, loaded first, through the same routine.
    pub fn dispose(&mut self, pos: GridPos) -> Vec<Release> {
        let entries: Vec<ConcessionEntry> =
            self.loaded.drain(..).chain(self.waiting.drain(..)).collect();
        entries
            .into_iter()
            .map(|entry| self.release_one(entry, pos))
            .collect()
    }

    fn release_one(&mut self, entry: ConcessionEntry, pos: GridPos) -> Release {
        self.revenue += entry.meal_cost;
        Release {
            agent:   entry.agent,
            kind:    VenueKind::Concession,
            pos,
            subtype: self.subtype.clone(),
            amount:  entry.meal_cost,
        }
    }

    pub fn cost_at(&self, now: Tick) -> f64 {
        self.spec.installation_cost + now.since(self.built_at) as f64 * self.spec.operating_cost
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.cost
    }
}

impl fmt::Display for Concession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | inside {} | traffic {} | revenue ${:.2} | cost ${:.2}",
            self.subtype,
            self.waiting.len() + self.loaded.len(),
            self.traffic,
            self.revenue,
            self.cost,
        )
    }
}
