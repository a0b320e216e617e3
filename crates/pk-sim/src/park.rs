//! The `Park` struct and its tick loop.

use std::collections::HashSet;

use pk_agent::{
    DisposeReason, PlanContext, PlanOutcome, RideInfo, StandInfo, UniformPolicy, Visitor,
    VisitorAction, VisitorPolicy, VisitorStore,
};
use pk_core::{AgentId, Demographic, GridPos, PaceClock, ParkConfig, SimClock, SimRng, Tick, VisualHandle};
use pk_spatial::{Grid, LaneGraph, find_tile, find_tile_list};
use pk_venue::{Building, BuildingKind, Release, RoadStyle, VenueError, VenueKind};

use crate::stats::{FinanceReport, ParkStats, RideReport, StandReport, ride_reports, stand_reports};
use crate::{Departure, ParkEvent, ParkObserver, SimResult, VisualFactory};

// ── Per-tick query lists ──────────────────────────────────────────────────────

/// Reachable venues and the entrance, built once per tick after buildings
/// have stepped.  Every visitor update in the tick reads the same lists.
#[derive(Debug, Default)]
struct QueryLists {
    rides:    Vec<RideInfo>,
    stands:   Vec<StandInfo>,
    entrance: Option<GridPos>,
}

fn plan_context<'a>(
    config: &ParkConfig,
    graph:  &'a LaneGraph,
    lists:  &'a QueryLists,
    tick:   Tick,
    now_ms: u64,
) -> PlanContext<'a> {
    PlanContext {
        tick,
        now_ms,
        graph,
        rides: &lists.rides,
        stands: &lists.stands,
        entrance: lists.entrance,
        speed: config.visitor.speed,
        wait_tolerance: config.visitor.wait_tolerance,
        max_concession_visits: config.visitor.max_concession_visits,
    }
}

fn is_road_tile(tile: &pk_spatial::Tile<Building>) -> bool {
    tile.building.as_ref().is_some_and(Building::is_road)
}

// ── Park ──────────────────────────────────────────────────────────────────────

/// The whole park: grid, lane graph, visitors and clock.
///
/// Each [`step`](Self::step) runs five phases:
///
/// 1. **Buildings** — every occupied tile, row-major: refresh road access,
///    then step attractions and concessions.  Releases are collected.
/// 2. **Lists** — reachable rides (wait estimates refreshed), reachable
///    concessions and the entrance.
/// 3. **Releases** — each released visitor is credited, unpaused and, after
///    a ride, sent toward its next destination using this tick's lists.
/// 4. **Visitors** — one update each, in spawn order.  Visitors that reach
///    a venue are admitted; those that exit or lose their nodes are removed
///    in the same tick.
/// 5. **Spawner** — at most one new visitor.
///
/// Create via [`ParkBuilder`][crate::ParkBuilder].
pub struct Park<P: VisitorPolicy = UniformPolicy> {
    /// Configuration snapshot; read-only after construction.
    pub config: ParkConfig,

    /// Park clock.  One tick is one simulated second.
    pub clock: SimClock,

    pub(crate) grid:       Grid<Building>,
    pub(crate) graph:      LaneGraph,
    pub(crate) visitors:   VisitorStore,
    pub(crate) rng:        SimRng,
    pub(crate) policy:     P,
    pub(crate) pace:       Box<dyn PaceClock>,
    pub(crate) visuals:    Box<dyn VisualFactory>,
    pub(crate) stats:      ParkStats,
    /// Tick at which the spawner next fires.
    pub(crate) next_spawn: Option<Tick>,
    /// Events not yet handed to an observer.
    pub(crate) events:     Vec<(Tick, ParkEvent)>,
    /// Rejected building names already logged.
    pub(crate) reported:   HashSet<String>,
}

impl<P: VisitorPolicy> Park<P> {
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Pace-clock milliseconds at the current tick.
    pub fn now_ms(&self) -> u64 {
        self.pace.now_ms(self.now())
    }

    pub fn grid(&self) -> &Grid<Building> {
        &self.grid
    }

    pub fn graph(&self) -> &LaneGraph {
        &self.graph
    }

    pub fn visitors(&self) -> &VisitorStore {
        &self.visitors
    }

    pub fn visitor(&self, id: AgentId) -> Option<&Visitor> {
        self.visitors.get(id)
    }

    pub fn stats(&self) -> &ParkStats {
        &self.stats
    }

    pub fn finance(&self) -> FinanceReport {
        FinanceReport::collect(&self.grid, self.now())
    }

    pub fn ride_reports(&self) -> Vec<RideReport> {
        ride_reports(&self.grid)
    }

    pub fn stand_reports(&self) -> Vec<StandReport> {
        stand_reports(&self.grid)
    }

    /// The entrance nearest the grid centre.
    pub fn entrance(&self) -> Option<GridPos> {
        let radius = self.grid.width() + self.grid.height();
        find_tile(
            &self.grid,
            self.grid.center(),
            |t| t.building.as_ref().is_some_and(Building::is_entrance),
            radius,
        )
    }

    /// End-style roads next to the entrance; visitors appear on these.
    pub fn spawn_tiles(&self) -> Vec<GridPos> {
        let Some(entrance) = self.entrance() else {
            return Vec::new();
        };
        self.grid
            .neighbors(entrance)
            .filter(|p| self.grid.building(*p).and_then(Building::road_style) == Some(RoadStyle::End))
            .collect()
    }

    /// Whether `pos` has a road within the configured search distance.
    pub fn has_road_access(&self, pos: GridPos) -> bool {
        find_tile(&self.grid, pos, is_road_tile, self.config.zone.max_road_search_distance).is_some()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Build on an empty tile.
    ///
    /// Returns `Ok(false)` when `pos` is outside the grid or occupied.  An
    /// empty `subtype` picks a random configured one.  The tile and its four
    /// neighbours get their road access, road style and lane-graph links
    /// refreshed before this returns.
    pub fn place_building(&mut self, pos: GridPos, kind: BuildingKind, subtype: &str) -> SimResult<bool> {
        if !self.grid.is_vacant(pos) {
            tracing::debug!(%pos, %kind, "tile unavailable, placement ignored");
            return Ok(false);
        }

        let now = self.now();
        let mut building = Building::new(kind, subtype, pos, now, &self.config, &mut self.rng, VisualHandle::INVALID)
            .map_err(|e| self.report(e))?;
        building.base.visual = self.visuals.building(kind, &building.base.subtype, pos);

        if let Err(rejected) = self.grid.place(pos, building) {
            self.visuals.release(rejected.base.visual);
            return Ok(false);
        }
        tracing::debug!(%pos, %kind, "placed building");
        self.refresh_around(pos);
        Ok(true)
    }

    /// [`place_building`](Self::place_building) with the kind given by name
    /// (`"road"`, `"entrance"`, `"attraction"`/`"ride"`, `"concession"`/`"stand"`).
    pub fn place_named(&mut self, pos: GridPos, kind: &str, subtype: &str) -> SimResult<bool> {
        let kind: BuildingKind = kind.parse().map_err(|e| self.report(e))?;
        self.place_building(pos, kind, subtype)
    }

    /// Demolish whatever stands on `pos`.  Visitors inside are released
    /// (and charged) exactly as if their visit had finished.
    pub fn bulldoze(&mut self, pos: GridPos) -> bool {
        let Some(mut building) = self.grid.take(pos) else {
            return false;
        };
        let released = building.dispose();
        self.visuals.release(building.base.visual);
        tracing::debug!(%pos, kind = %building.kind(), released = released.len(), "bulldozed");

        self.refresh_around(pos);
        if !released.is_empty() {
            let lists = self.query_lists();
            self.apply_releases(released, &lists);
        }
        true
    }

    /// Log a rejected building once per distinct error.
    fn report(&mut self, err: VenueError) -> crate::SimError {
        if self.reported.insert(err.to_string()) {
            tracing::error!(%err, "building rejected");
        }
        err.into()
    }

    fn refresh_around(&mut self, pos: GridPos) {
        let mut tiles = vec![pos];
        tiles.extend(self.grid.neighbors(pos));

        for &p in &tiles {
            let is_road = self.grid.building(p).is_some_and(Building::is_road);
            self.graph.update_tile(p, is_road);
        }
        for &p in &tiles {
            let access = self.has_road_access(p);
            let mask = self.grid.neighbor_mask(p, Building::is_road);
            if let Some(b) = self.grid.building_mut(p) {
                b.base.has_road_access = access;
                b.set_road_mask(mask);
            }
        }
    }

    // ── Visitors ──────────────────────────────────────────────────────────

    /// Spawn one visitor on a random spawn tile and send it toward its first
    /// ride (or straight back out).  `None` when there is no spawn tile.
    /// A visitor spawned next to its ride joins the line at once.
    ///
    /// A visitor with neither a ride nor the exit reachable is disposed at
    /// once; the returned id then no longer resolves.
    pub fn spawn_visitor(&mut self, demographic: Demographic) -> Option<AgentId> {
        let lists = self.query_lists();
        self.spawn_with(demographic, &lists)
    }

    fn spawn_with(&mut self, demographic: Demographic, lists: &QueryLists) -> Option<AgentId> {
        let tiles = self.spawn_tiles();
        let Some(i) = self.rng.pick_index(tiles.len()) else {
            tracing::debug!("no spawn tile next to an entrance");
            return None;
        };
        let at = tiles[i];
        let origin = self.graph.tile_node(at)?;
        let world = self.graph.node(origin)?.world;

        let now = self.now();
        let now_ms = self.now_ms();
        let id = self.visitors.spawn(demographic, VisualHandle::INVALID, origin, world, now, now_ms);
        let visual = self.visuals.visitor(id, demographic);
        self.stats.spawned += 1;
        self.emit(ParkEvent::Spawned { agent: id, demographic, at });

        let outcome = match self.visitors.get_with_rng(id) {
            Some((visitor, rng)) => {
                visitor.visual = visual;
                let ctx = plan_context(&self.config, &self.graph, lists, now, now_ms);
                visitor.plan_next(&ctx, &self.policy, rng)
            }
            None => PlanOutcome::Stranded,
        };
        tracing::debug!(visitor = %id, %demographic, %at, ?outcome, "spawned");
        if outcome == PlanOutcome::Stranded {
            self.depart(id, Departure::Disposed(DisposeReason::Stranded));
        } else {
            self.join_if_arrived(id, lists);
        }
        Some(id)
    }

    /// Queue a visitor whose new plan ends on the node it already stands on.
    fn join_if_arrived(&mut self, id: AgentId, lists: &QueryLists) {
        let arrived = self.visitors.get_mut(id).and_then(Visitor::arrived_at_ride);
        if let Some(pos) = arrived {
            self.enter_attraction(id, pos, lists);
        }
    }

    fn depart(&mut self, id: AgentId, departure: Departure) {
        let Some(visitor) = self.visitors.remove(id) else {
            return;
        };
        let now = self.now();
        self.stats.record_departure(&visitor, now, departure);
        self.visuals.release(visitor.visual);
        match departure {
            Departure::Exited => tracing::debug!(visitor = %id, spend = visitor.spend, "visitor exited"),
            Departure::Disposed(reason) => tracing::warn!(visitor = %id, %reason, "visitor disposed"),
        }
        self.emit(ParkEvent::Disposed { agent: id, departure });
    }

    fn emit(&mut self, event: ParkEvent) {
        self.events.push((self.now(), event));
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the park by one tick and return the new tick.
    pub fn step<O: ParkObserver>(&mut self, observer: &mut O) -> Tick {
        let now = self.clock.advance();
        observer.on_tick_start(now);

        let released = self.step_buildings(now);
        let lists = self.query_lists();
        self.apply_releases(released, &lists);
        self.step_visitors(&lists);
        self.run_spawner(&lists);

        for (tick, event) in self.events.drain(..) {
            observer.on_event(tick, &event);
        }
        observer.on_tick_end(now, self.visitors.len());
        now
    }

    /// Run exactly `n` ticks.
    pub fn run_ticks<O: ParkObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    fn step_buildings(&mut self, now: Tick) -> Vec<Release> {
        let occupied: Vec<GridPos> = self.grid.occupied().map(|(p, _)| p).collect();
        let mut released = Vec::new();
        for pos in occupied {
            let access = self.has_road_access(pos);
            if let Some(b) = self.grid.building_mut(pos) {
                released.extend(b.step(now, access));
            }
        }
        released
    }

    fn query_lists(&mut self) -> QueryLists {
        let now = self.now();
        let center = self.grid.center();

        let ride_tiles = find_tile_list(
            &self.grid,
            center,
            |t| t.building.as_ref().is_some_and(|b| b.as_attraction().is_some() && b.base.has_road_access),
            self.config.attraction.search_distance,
        );
        let mut rides = Vec::with_capacity(ride_tiles.len());
        for pos in ride_tiles {
            let Some(ride) = self.grid.building_mut(pos).and_then(Building::as_attraction_mut) else {
                continue;
            };
            let wait_estimate = ride.update_wait_estimate(now);
            rides.push(RideInfo {
                pos,
                subtype: ride.subtype.clone(),
                thrill: ride.spec.thrill,
                wait_estimate,
            });
        }

        let stands = find_tile_list(
            &self.grid,
            center,
            |t| t.building.as_ref().is_some_and(|b| b.as_concession().is_some() && b.base.has_road_access),
            self.config.concession.search_distance,
        )
        .into_iter()
        .filter_map(|pos| {
            let stand = self.grid.building(pos)?.as_concession()?;
            Some(StandInfo {
                pos,
                subtype: stand.subtype.clone(),
                stop_probability: stand.spec.stop_probability,
            })
        })
        .collect();

        QueryLists { rides, stands, entrance: self.entrance() }
    }

    fn apply_releases(&mut self, released: Vec<Release>, lists: &QueryLists) {
        let now = self.now();
        let now_ms = self.now_ms();
        for release in released {
            self.emit(ParkEvent::Released {
                agent:  release.agent,
                kind:   release.kind,
                pos:    release.pos,
                amount: release.amount,
            });
            let Some((visitor, rng)) = self.visitors.get_with_rng(release.agent) else {
                tracing::debug!(visitor = %release.agent, "release for a visitor no longer in the park");
                continue;
            };
            let stranded = match release.kind {
                VenueKind::Concession => {
                    visitor.on_concession_complete(release.pos, release.amount, now_ms);
                    false
                }
                VenueKind::Attraction => {
                    visitor.on_ride_complete(&release.subtype, release.amount, now_ms);
                    let ctx = plan_context(&self.config, &self.graph, lists, now, now_ms);
                    visitor.plan_next(&ctx, &self.policy, rng) == PlanOutcome::Stranded
                }
            };
            if stranded {
                self.depart(release.agent, Departure::Disposed(DisposeReason::Stranded));
            } else {
                self.join_if_arrived(release.agent, lists);
            }
        }
    }

    fn step_visitors(&mut self, lists: &QueryLists) {
        let now = self.now();
        let now_ms = self.now_ms();
        for id in self.visitors.ids() {
            let Some((visitor, rng)) = self.visitors.get_with_rng(id) else {
                continue;
            };
            let ctx = plan_context(&self.config, &self.graph, lists, now, now_ms);
            let action = visitor.update(&ctx, &self.policy, rng);
            if !visitor.is_paused {
                if let Some(node) = visitor.origin.and_then(|n| self.graph.node(n)) {
                    self.stats.record_walk(node.pos);
                }
            }

            match action {
                VisitorAction::Continue => {}
                VisitorAction::EnterAttraction(pos) => self.enter_attraction(id, pos, lists),
                VisitorAction::EnterConcession(pos) => self.enter_concession(id, pos),
                VisitorAction::Exited => self.depart(id, Departure::Exited),
                VisitorAction::Dispose(reason) => self.depart(id, Departure::Disposed(reason)),
            }
        }
    }

    fn enter_attraction(&mut self, id: AgentId, pos: GridPos, lists: &QueryLists) {
        if let Some(ride) = self.grid.building_mut(pos).and_then(Building::as_attraction_mut) {
            ride.enqueue(id);
            self.emit(ParkEvent::Admitted { agent: id, kind: VenueKind::Attraction, pos });
            return;
        }

        // The ride was demolished while the visitor walked to it.
        tracing::debug!(visitor = %id, %pos, "ride gone on arrival, replanning");
        let now = self.now();
        let now_ms = self.now_ms();
        let stranded = match self.visitors.get_with_rng(id) {
            Some((visitor, rng)) => {
                visitor.resume(now_ms);
                let ctx = plan_context(&self.config, &self.graph, lists, now, now_ms);
                visitor.plan_next(&ctx, &self.policy, rng) == PlanOutcome::Stranded
            }
            None => false,
        };
        if stranded {
            self.depart(id, Departure::Disposed(DisposeReason::Stranded));
        } else {
            self.join_if_arrived(id, lists);
        }
    }

    fn enter_concession(&mut self, id: AgentId, pos: GridPos) {
        let now_ms = self.now_ms();
        let Some((visitor, rng)) = self.visitors.get_with_rng(id) else {
            return;
        };
        match self.grid.building_mut(pos).and_then(Building::as_concession_mut) {
            Some(stand) => {
                stand.admit(id, rng);
            }
            None => {
                visitor.resume(now_ms);
                return;
            }
        }
        self.emit(ParkEvent::Admitted { agent: id, kind: VenueKind::Concession, pos });
    }

    // ── Spawner ───────────────────────────────────────────────────────────

    fn run_spawner(&mut self, lists: &QueryLists) {
        let max_visitors = self.config.visitor.max_visitors;
        if max_visitors == 0 {
            return;
        }
        let now = self.now();
        let due = match self.next_spawn {
            Some(t) => t,
            None => {
                let t = now + self.spawn_interval();
                self.next_spawn = Some(t);
                t
            }
        };
        if now < due || self.visitors.len() >= max_visitors {
            return;
        }

        let demographic = self.config.demographic_for(self.rng.random::<f64>());
        self.spawn_with(demographic, lists);
        self.next_spawn = Some(now + self.spawn_interval());
    }

    fn spawn_interval(&mut self) -> u64 {
        let v = &self.config.visitor;
        let (lo, hi) = (v.spawn_interval_min, v.spawn_interval_max);
        self.rng.gen_range(lo..=hi)
    }
}
