//! Directed lane graph overlaid on road tiles.
//!
//! # Data layout
//!
//! Nodes live in an arena (`Vec<Option<LaneNode>>`) addressed by [`NodeId`].
//! Removing a node empties its slot; ids are never reused, so a visitor still
//! holding a removed id sees `None` on lookup instead of an unrelated node.
//!
//! Each road tile owns one node at its centre, registered in a per-tile
//! index.  Two adjacent road tiles are joined by a directed edge in each
//! direction.  [`LaneGraph::update_tile`] rebuilds those edges whenever a
//! road appears or disappears; a tile that stops being a road loses its node
//! entirely rather than keeping a disconnected one.

use pk_core::{Direction, GridPos, NodeId, WorldPoint};

use crate::{SpatialError, SpatialResult};

/// A point on a road lane.
#[derive(Clone, Debug)]
pub struct LaneNode {
    /// Owning tile.
    pub pos:   GridPos,
    pub world: WorldPoint,
    next:      Vec<NodeId>,
}

impl LaneNode {
    /// Outgoing edges, in insertion order.
    #[inline]
    pub fn next(&self) -> &[NodeId] {
        &self.next
    }
}

/// Arena of lane nodes plus the tile → node index.
#[derive(Clone, Debug)]
pub struct LaneGraph {
    width:   u32,
    height:  u32,
    nodes:   Vec<Option<LaneNode>>,
    by_tile: Vec<Option<NodeId>>,
    live:    usize,
}

impl LaneGraph {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            nodes: Vec::new(),
            by_tile: vec![None; width as usize * height as usize],
            live: 0,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Total outgoing edges over live nodes.
    pub fn edge_count(&self) -> usize {
        self.iter().map(|(_, n)| n.next.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Upper bound on node indices; sizes per-search scratch arrays.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    // ── Node access ───────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&LaneNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Outgoing edges of `id`; empty for a removed or unknown id.
    pub fn next(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.next.as_slice()).unwrap_or_default()
    }

    /// Live nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LaneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// The node owned by road tile `pos`, if any.
    pub fn tile_node(&self, pos: GridPos) -> Option<NodeId> {
        self.tile_slot(pos).and_then(|i| self.by_tile[i])
    }

    // ── Raw mutation ──────────────────────────────────────────────────────

    /// Add a free-standing node.  It is not registered as any tile's node.
    pub fn add_node(&mut self, pos: GridPos, world: WorldPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(LaneNode { pos, world, next: Vec::new() }));
        self.live += 1;
        id
    }

    /// Add a directed edge.  Connecting twice is a no-op.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> SpatialResult<()> {
        if !self.contains(to) {
            return Err(SpatialError::NodeNotFound(to));
        }
        let node = self
            .nodes
            .get_mut(from.index())
            .and_then(Option::as_mut)
            .ok_or(SpatialError::NodeNotFound(from))?;
        if !node.next.contains(&to) {
            node.next.push(to);
        }
        Ok(())
    }

    /// Drop every outgoing edge of `id`.
    pub fn disconnect_all(&mut self, id: NodeId) {
        if let Some(Some(node)) = self.nodes.get_mut(id.index()) {
            node.next.clear();
        }
    }

    /// Remove `id` and every edge pointing at it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<LaneNode> {
        let removed = self.nodes.get_mut(id.index())?.take()?;
        self.live -= 1;
        for node in self.nodes.iter_mut().flatten() {
            node.next.retain(|n| *n != id);
        }
        if let Some(i) = self.tile_slot(removed.pos) {
            if self.by_tile[i] == Some(id) {
                self.by_tile[i] = None;
            }
        }
        Some(removed)
    }

    // ── Road topology ─────────────────────────────────────────────────────

    /// Bring the graph in line with whether `pos` now holds a road.
    ///
    /// A new road gets a node and is wired both ways to every neighbouring
    /// road node.  A removed road loses its node and all edges touching it.
    /// Neighbours' edges toward `pos` are rebuilt in both cases.  Returns the
    /// tile's node after the update.
    pub fn update_tile(&mut self, pos: GridPos, is_road: bool) -> Option<NodeId> {
        let slot = self.tile_slot(pos)?;
        tracing::debug!(%pos, is_road, "updating lane graph");

        if !is_road {
            if let Some(id) = self.by_tile[slot] {
                self.remove_node(id);
            }
            return None;
        }

        let id = match self.by_tile[slot] {
            Some(id) => id,
            None => {
                let id = self.add_node(pos, pos.center());
                self.by_tile[slot] = Some(id);
                id
            }
        };

        self.disconnect_all(id);
        for dir in Direction::ALL {
            let Some(other) = self.tile_node(pos.step(dir)) else {
                continue;
            };
            // Both ids are live, so these cannot fail.
            let _ = self.connect(id, other);
            let _ = self.connect(other, id);
        }
        Some(id)
    }

    fn tile_slot(&self, pos: GridPos) -> Option<usize> {
        let inside =
            pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height;
        inside.then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }
}
