//! Breadth-first searches over tiles and lane nodes.
//!
//! Both searches mark a node visited when it is *enqueued* and never enqueue
//! it again, so every node is expanded at most once and cycles terminate.

use std::collections::VecDeque;

use pk_core::{GridPos, NodeId};

use crate::{Grid, LaneGraph, Tile};

// ── Tile flood fill ───────────────────────────────────────────────────────────

/// Iterator over the tiles within `max_distance` (Manhattan) of `start`, in
/// breadth-first order over 4-connected neighbours.
struct TileBfs<'g, B> {
    grid:         &'g Grid<B>,
    start:        GridPos,
    max_distance: u32,
    queue:        VecDeque<GridPos>,
    visited:      Vec<bool>,
}

impl<'g, B> TileBfs<'g, B> {
    fn new(grid: &'g Grid<B>, start: GridPos, max_distance: u32) -> Self {
        let mut visited = vec![false; grid.width() as usize * grid.height() as usize];
        let mut queue = VecDeque::new();
        if let Some(i) = grid.index_of(start) {
            visited[i] = true;
            queue.push_back(start);
        }
        Self { grid, start, max_distance, queue, visited }
    }
}

impl<'g, B> Iterator for TileBfs<'g, B> {
    type Item = &'g Tile<B>;

    fn next(&mut self) -> Option<Self::Item> {
        let grid = self.grid;
        let pos = self.queue.pop_front()?;
        for n in grid.neighbors(pos) {
            if n.distance_to(self.start) > self.max_distance {
                continue;
            }
            if let Some(i) = grid.index_of(n) {
                if !self.visited[i] {
                    self.visited[i] = true;
                    self.queue.push_back(n);
                }
            }
        }
        grid.tile(pos)
    }
}

/// First tile (in BFS order from `start`) satisfying `predicate`, searching
/// no further than `max_distance`.  `start` itself is tested first.
pub fn find_tile<B>(
    grid:         &Grid<B>,
    start:        GridPos,
    mut predicate: impl FnMut(&Tile<B>) -> bool,
    max_distance: u32,
) -> Option<GridPos> {
    TileBfs::new(grid, start, max_distance)
        .find(|t| predicate(*t))
        .map(|t| t.pos)
}

/// Every tile within `max_distance` of `start` satisfying `predicate`, in
/// BFS order.
pub fn find_tile_list<B>(
    grid:         &Grid<B>,
    start:        GridPos,
    mut predicate: impl FnMut(&Tile<B>) -> bool,
    max_distance: u32,
) -> Vec<GridPos> {
    TileBfs::new(grid, start, max_distance)
        .filter(|t| predicate(*t))
        .map(|t| t.pos)
        .collect()
}

// ── Lane graph search ─────────────────────────────────────────────────────────

/// A planned walk through the lane graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphPath {
    /// Last node of the walk; the node the search stopped at.
    pub terminal: NodeId,
    /// Nodes from the origin (inclusive) to `terminal` (inclusive).
    pub nodes:    Vec<NodeId>,
}

impl GraphPath {
    /// Number of edges in the walk.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Shortest-hop walk from `origin` to a node whose tile is orthogonally
/// adjacent to `target`.  The target's own tile never terminates the search.
/// `None` means unreachable.
pub fn search_graph(graph: &LaneGraph, origin: NodeId, target: GridPos) -> Option<GraphPath> {
    search_graph_where(graph, origin, |pos| pos.is_adjacent(target))
}

/// Shortest-hop walk from `origin` to the first node whose tile satisfies
/// `done`.  The origin is tested before anything is expanded.
pub fn search_graph_where(
    graph:    &LaneGraph,
    origin:   NodeId,
    mut done: impl FnMut(GridPos) -> bool,
) -> Option<GraphPath> {
    graph.node(origin)?;

    let mut parent: Vec<Option<NodeId>> = vec![None; graph.capacity()];
    let mut visited = vec![false; graph.capacity()];
    let mut queue = VecDeque::new();
    visited[origin.index()] = true;
    queue.push_back(origin);

    while let Some(current) = queue.pop_front() {
        let Some(node) = graph.node(current) else {
            continue;
        };
        if done(node.pos) {
            return Some(trace_back(&parent, origin, current));
        }
        for &next in node.next() {
            let i = next.index();
            if i < visited.len() && !visited[i] && graph.contains(next) {
                visited[i] = true;
                parent[i] = Some(current);
                queue.push_back(next);
            }
        }
    }

    None
}

fn trace_back(parent: &[Option<NodeId>], origin: NodeId, terminal: NodeId) -> GraphPath {
    let mut nodes = vec![terminal];
    let mut cursor = terminal;
    while cursor != origin {
        match parent[cursor.index()] {
            Some(p) => {
                nodes.push(p);
                cursor = p;
            }
            None => break,
        }
    }
    nodes.reverse();
    GraphPath { terminal, nodes }
}
