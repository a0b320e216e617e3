//! Visitor state and the per-visitor decision policy.
//!
//! # Lifecycle
//!
//! ```text
//!  spawn ─▶ plan_next ─▶ walk edges ─▶ final node ─▶ EnterAttraction (paused)
//!              ▲                                           │
//!              └──────────── on_ride_complete ◀────────────┘
//!
//!  no acceptable ride ─▶ plan_exit ─▶ walk ─▶ Exited
//!  no exit path       ─▶ Stranded
//! ```
//!
//! Edge starts next to a concession may detour through `EnterConcession`;
//! the visitor resumes the same edge after `on_concession_complete`.

use std::collections::VecDeque;
use std::fmt;

use pk_core::{AgentId, AgentRng, Demographic, GridPos, NodeId, Tick, VisualHandle, WorldPoint};
use pk_spatial::{GraphPath, LaneGraph, search_graph};

use crate::{EdgeCycle, PlanContext, RideInfo, VisitorPolicy};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Where a visitor's current path ends.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Target {
    Attraction(GridPos),
    Exit(GridPos),
}

impl Target {
    pub fn pos(self) -> GridPos {
        match self {
            Target::Attraction(p) | Target::Exit(p) => p,
        }
    }
}

/// Result of committing to a new destination.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PlanOutcome {
    /// Walking to the attraction at this tile.
    Riding(GridPos),
    /// Walking to the exit at this tile.
    Leaving(GridPos),
    /// Neither a ride nor the exit is reachable.  The visitor has no
    /// destination and must be disposed.
    Stranded,
}

/// Why no ride path was found.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NoRide {
    /// Some rides passed the visited and thrill filters but every one of them
    /// estimated a wait at or above the visitor's tolerance.
    pub tolerance_excluded: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DisposeReason {
    /// Origin or destination is unset or no longer in the lane graph.
    MissingNode,
    /// No path to a ride or to the exit.
    Stranded,
}

impl fmt::Display for DisposeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisposeReason::MissingNode => "missing node",
            DisposeReason::Stranded    => "stranded",
        })
    }
}

/// What the park must do after a visitor update.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VisitorAction {
    /// Nothing: paused, or still walking.
    Continue,
    /// Reached the final node next to this attraction; push into its line.
    EnterAttraction(GridPos),
    /// Decided to stop at this concession; admit it.
    EnterConcession(GridPos),
    /// Reached the exit.
    Exited,
    Dispose(DisposeReason),
}

// ── Visitor ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Visitor {
    pub id:          AgentId,
    pub name:        String,
    pub demographic: Demographic,
    pub visual:      VisualHandle,

    /// Node the current edge starts from (the node the visitor stands on
    /// when not walking).
    pub origin:      Option<NodeId>,
    /// Node the current edge ends at.
    pub destination: Option<NodeId>,
    /// Nodes after `destination`, in walking order.
    path:            VecDeque<NodeId>,
    pub target:      Option<Target>,
    cycle:           EdgeCycle,
    pub position:    WorldPoint,
    /// Edge start at which the concession stop decision was last made.
    stop_checked:    Option<NodeId>,

    pub visited_attractions:      Vec<String>,
    pub visited_concessions:      Vec<GridPos>,
    pub spend:                    f64,
    pub entered_at:               Tick,
    pub is_paused:                bool,
    pub is_leaving:               bool,
    pub exited_without_tolerance: bool,
}

impl Visitor {
    /// A visitor standing on `origin` with nowhere to go yet.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id:          AgentId,
        name:        String,
        demographic: Demographic,
        visual:      VisualHandle,
        origin:      NodeId,
        at:          WorldPoint,
        entered_at:  Tick,
        now_ms:      u64,
    ) -> Self {
        Self {
            id,
            name,
            demographic,
            visual,
            origin: Some(origin),
            destination: Some(origin),
            path: VecDeque::new(),
            target: None,
            cycle: EdgeCycle::new(at, at, now_ms),
            position: at,
            stop_checked: None,
            visited_attractions: Vec::new(),
            visited_concessions: Vec::new(),
            spend: 0.0,
            entered_at,
            is_paused: false,
            is_leaving: false,
            exited_without_tolerance: false,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Nodes still to walk after the current edge.
    pub fn path(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.path.iter().copied()
    }

    /// `true` while there is an edge left to cover.
    pub fn has_path(&self) -> bool {
        self.destination.is_some() && (self.origin != self.destination || !self.path.is_empty())
    }

    /// `true` if the visitor is actually walking: not paused and with a path.
    pub fn is_moving(&self) -> bool {
        !self.is_paused && self.has_path()
    }

    pub fn has_visited(&self, subtype: &str) -> bool {
        self.visited_attractions.iter().any(|s| s == subtype)
    }

    pub fn cycle(&self) -> &EdgeCycle {
        &self.cycle
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Pick a reachable ride from `ctx.rides`.
    ///
    /// Rides already visited, outside the visitor's thrill range, or with a
    /// wait estimate at or above the tolerance are skipped.  The policy picks
    /// among the rest; a pick with no path is dropped and the policy asked
    /// again.
    pub fn next_ride_path(
        &self,
        ctx:    &PlanContext<'_>,
        policy: &dyn VisitorPolicy,
        rng:    &mut AgentRng,
    ) -> Result<(GridPos, GraphPath), NoRide> {
        let Some(origin) = self.origin else {
            return Err(NoRide { tolerance_excluded: false });
        };

        let mut candidates: Vec<&RideInfo> = ctx
            .rides
            .iter()
            .filter(|r| !self.has_visited(&r.subtype))
            .filter(|r| self.demographic.accepts(r.thrill))
            .collect();
        let eligible = candidates.len();
        candidates.retain(|r| r.wait_estimate < ctx.wait_tolerance);
        let tolerance_excluded = eligible > 0 && candidates.is_empty();

        while !candidates.is_empty() {
            let Some(i) = policy.choose_attraction(self, &candidates, rng) else {
                break;
            };
            if i >= candidates.len() {
                break;
            }
            let ride = candidates.remove(i);
            if let Some(path) = search_graph(ctx.graph, origin, ride.pos) {
                return Ok((ride.pos, path));
            }
            tracing::debug!(visitor = %self.id, ride = %ride.pos, "ride unreachable, dropping");
        }

        Err(NoRide { tolerance_excluded })
    }

    /// Commit to the next ride, or to the exit when no ride is acceptable.
    pub fn plan_next(
        &mut self,
        ctx:    &PlanContext<'_>,
        policy: &dyn VisitorPolicy,
        rng:    &mut AgentRng,
    ) -> PlanOutcome {
        match self.next_ride_path(ctx, policy, rng) {
            Ok((pos, path)) => {
                self.commit(path, Target::Attraction(pos), ctx.graph, ctx.now_ms);
                PlanOutcome::Riding(pos)
            }
            Err(NoRide { tolerance_excluded }) => {
                self.exited_without_tolerance |= tolerance_excluded;
                self.plan_exit(ctx)
            }
        }
    }

    /// Commit to leaving through the entrance.
    pub fn plan_exit(&mut self, ctx: &PlanContext<'_>) -> PlanOutcome {
        self.is_leaving = true;
        let found = self
            .origin
            .zip(ctx.entrance)
            .and_then(|(origin, exit)| search_graph(ctx.graph, origin, exit).map(|p| (exit, p)));

        match found {
            Some((exit, path)) => {
                self.commit(path, Target::Exit(exit), ctx.graph, ctx.now_ms);
                PlanOutcome::Leaving(exit)
            }
            None => {
                tracing::warn!(visitor = %self.id, "no path to a ride or the exit");
                self.destination = None;
                self.path.clear();
                self.target = None;
                PlanOutcome::Stranded
            }
        }
    }

    /// Re-plan toward the current kind of target after the road ahead changed.
    fn replan(
        &mut self,
        ctx:    &PlanContext<'_>,
        policy: &dyn VisitorPolicy,
        rng:    &mut AgentRng,
    ) -> PlanOutcome {
        if self.is_leaving {
            self.plan_exit(ctx)
        } else {
            self.plan_next(ctx, policy, rng)
        }
    }

    fn commit(&mut self, path: GraphPath, target: Target, graph: &LaneGraph, now_ms: u64) {
        let mut nodes: VecDeque<NodeId> = path.nodes.into();
        let Some(origin) = nodes.pop_front() else {
            return;
        };
        let destination = nodes.pop_front().unwrap_or(origin);
        self.origin = Some(origin);
        self.destination = Some(destination);
        self.path = nodes;
        self.target = Some(target);
        self.begin_edge(graph, now_ms);
    }

    fn begin_edge(&mut self, graph: &LaneGraph, now_ms: u64) {
        let world = |id: Option<NodeId>| id.and_then(|n| graph.node(n)).map(|n| n.world);
        let from = world(self.origin).unwrap_or(self.position);
        let to = world(self.destination).unwrap_or(from);
        self.cycle = EdgeCycle::new(from, to, now_ms);
        self.position = from;
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Advance the visitor by one park step.
    pub fn update(
        &mut self,
        ctx:    &PlanContext<'_>,
        policy: &dyn VisitorPolicy,
        rng:    &mut AgentRng,
    ) -> VisitorAction {
        if self.is_paused {
            return VisitorAction::Continue;
        }
        let (Some(origin), Some(destination)) = (self.origin, self.destination) else {
            return VisitorAction::Dispose(DisposeReason::MissingNode);
        };
        if !ctx.graph.contains(origin) {
            return VisitorAction::Dispose(DisposeReason::MissingNode);
        }

        let blocked = !ctx.graph.contains(destination)
            || self.path.iter().any(|n| !ctx.graph.contains(*n));
        if blocked {
            tracing::debug!(visitor = %self.id, "road ahead removed, replanning");
            self.destination = Some(origin);
            self.path.clear();
            return match self.replan(ctx, policy, rng) {
                PlanOutcome::Stranded => VisitorAction::Dispose(DisposeReason::Stranded),
                _ => VisitorAction::Continue,
            };
        }

        if origin != destination && self.stop_checked != Some(origin) {
            self.stop_checked = Some(origin);
            if let Some(pos) = self.consider_stands(origin, ctx, policy, rng) {
                self.is_paused = true;
                return VisitorAction::EnterConcession(pos);
            }
        }

        if self.cycle.fraction(ctx.now_ms, ctx.speed) < 1.0 {
            self.position = self.cycle.position(ctx.now_ms, ctx.speed);
            return VisitorAction::Continue;
        }

        self.position = self.cycle.to;
        self.origin = Some(destination);
        match self.path.pop_front() {
            Some(next) => {
                self.destination = Some(next);
                self.begin_edge(ctx.graph, ctx.now_ms);
                VisitorAction::Continue
            }
            None => self.arrive(),
        }
    }

    fn consider_stands(
        &self,
        origin: NodeId,
        ctx:    &PlanContext<'_>,
        policy: &dyn VisitorPolicy,
        rng:    &mut AgentRng,
    ) -> Option<GridPos> {
        if self.visited_concessions.len() >= ctx.max_concession_visits as usize {
            return None;
        }
        let at = ctx.graph.node(origin)?.pos;
        ctx.stands
            .iter()
            .filter(|s| s.pos.is_adjacent(at) && !self.visited_concessions.contains(&s.pos))
            .find(|s| policy.stop_at_concession(self, s, rng))
            .map(|s| s.pos)
    }

    /// The ride tile when the committed path already ends on the node the
    /// visitor stands on.  Such a visitor has arrived: it pauses and the
    /// caller queues it without waiting for the next update.
    pub fn arrived_at_ride(&mut self) -> Option<GridPos> {
        let Some(Target::Attraction(pos)) = self.target else {
            return None;
        };
        let standing = self.origin.is_some() && self.origin == self.destination && self.path.is_empty();
        if self.is_paused || !standing {
            return None;
        }
        self.is_paused = true;
        Some(pos)
    }

    fn arrive(&mut self) -> VisitorAction {
        match self.target {
            Some(Target::Attraction(pos)) => {
                self.is_paused = true;
                VisitorAction::EnterAttraction(pos)
            }
            Some(Target::Exit(_)) => {
                self.destination = None;
                VisitorAction::Exited
            }
            None => {
                self.destination = None;
                VisitorAction::Dispose(DisposeReason::MissingNode)
            }
        }
    }

    // ── Release hooks ─────────────────────────────────────────────────────

    /// Back from a ride.  The caller plans the next destination.
    pub fn on_ride_complete(&mut self, subtype: &str, ticket: f64, now_ms: u64) {
        self.spend += ticket;
        self.visited_attractions.push(subtype.to_string());
        self.resume(now_ms);
    }

    /// Back from a concession; continues the interrupted edge.
    pub fn on_concession_complete(&mut self, pos: GridPos, meal_cost: f64, now_ms: u64) {
        self.spend += meal_cost;
        self.visited_concessions.push(pos);
        self.resume(now_ms);
    }

    /// Clear the pause flag and restart the edge timer.
    pub fn resume(&mut self, now_ms: u64) {
        self.is_paused = false;
        self.cycle.restart(now_ms);
    }
}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_paused {
            "inside"
        } else if self.is_leaving {
            "leaving"
        } else {
            "walking"
        };
        write!(
            f,
            "{} ({}) | {} | rides {} | stands {} | spent ${:.2}",
            self.name,
            self.demographic,
            status,
            self.visited_attractions.len(),
            self.visited_concessions.len(),
            self.spend,
        )
    }
}
