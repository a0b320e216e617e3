//! Unit tests for pk-agent.

use pk_core::{AgentId, AgentRng, Demographic, GridPos, ThrillCategory, Tick, VisualHandle, WorldPoint};
use pk_spatial::LaneGraph;

use crate::{PlanContext, RideInfo, StandInfo, Visitor, VisitorPolicy};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One world unit per second.
const SPEED: f32 = 0.001;

/// Road along `y = 0` from `x = 0` to `x = len - 1`.
fn road_line(len: i32) -> LaneGraph {
    let mut g = LaneGraph::new(10, 10);
    for x in 0..len {
        g.update_tile(GridPos::new(x, 0), true);
    }
    g
}

fn ride(x: i32, y: i32, subtype: &str, thrill: ThrillCategory, wait: u64) -> RideInfo {
    RideInfo { pos: GridPos::new(x, y), subtype: subtype.into(), thrill, wait_estimate: wait }
}

fn ctx<'a>(
    graph:    &'a LaneGraph,
    rides:    &'a [RideInfo],
    stands:   &'a [StandInfo],
    entrance: Option<GridPos>,
    now_ms:   u64,
) -> PlanContext<'a> {
    PlanContext {
        tick: Tick(now_ms / 1_000),
        now_ms,
        graph,
        rides,
        stands,
        entrance,
        speed: SPEED,
        wait_tolerance: 60,
        max_concession_visits: 3,
    }
}

fn visitor_at(graph: &LaneGraph, x: i32, demographic: Demographic) -> Visitor {
    let pos = GridPos::new(x, 0);
    let node = graph.tile_node(pos).unwrap();
    Visitor::new(AgentId(0), "Test Guest".into(), demographic, VisualHandle(0), node, pos.center(), Tick::ZERO, 0)
}

fn near(a: WorldPoint, b: WorldPoint) -> bool {
    a.distance(b) < 1e-4
}

fn rng() -> AgentRng {
    AgentRng::new(1, AgentId(0))
}

/// Always takes the first candidate.
struct FirstPolicy;

impl VisitorPolicy for FirstPolicy {
    fn choose_attraction(&self, _: &Visitor, _: &[&RideInfo], _: &mut AgentRng) -> Option<usize> {
        Some(0)
    }
}

/// Never stops at concessions.
struct NoSnacks;

impl VisitorPolicy for NoSnacks {
    fn stop_at_concession(&self, _: &Visitor, _: &StandInfo, _: &mut AgentRng) -> bool {
        false
    }
}

// ── EdgeCycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use pk_core::WorldPoint;

    use super::{SPEED, near};
    use crate::EdgeCycle;

    #[test]
    fn fraction_grows_with_elapsed_time() {
        let c = EdgeCycle::new(WorldPoint::new(0.0, 0.0), WorldPoint::new(2.0, 0.0), 1_000);
        assert_eq!(c.fraction(1_000, SPEED), 0.0);
        assert!((c.fraction(2_000, SPEED) - 0.5).abs() < 1e-6);
        assert_eq!(c.fraction(9_000, SPEED), 1.0);
        assert_eq!(c.fraction(0, SPEED), 0.0);
        assert!(near(c.position(2_000, SPEED), WorldPoint::new(1.0, 0.0)));
    }

    #[test]
    fn zero_length_edge_is_complete() {
        let p = WorldPoint::new(3.0, 3.0);
        assert_eq!(EdgeCycle::new(p, p, 50).fraction(50, SPEED), 1.0);
    }

    #[test]
    fn restart_resets_progress() {
        let mut c = EdgeCycle::new(WorldPoint::new(0.0, 0.0), WorldPoint::new(1.0, 0.0), 0);
        assert_eq!(c.fraction(5_000, SPEED), 1.0);
        c.restart(5_000);
        assert_eq!(c.fraction(5_000, SPEED), 0.0);
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planning {
    use super::*;
    use crate::{NoRide, PlanOutcome, Target, UniformPolicy};

    #[test]
    fn kids_and_elders_skip_thrill_rides() {
        let g = road_line(6);
        let rides = [
            ride(2, 1, "rollercoaster", ThrillCategory::Thrill, 0),
            ride(4, 1, "carousel", ThrillCategory::Family, 0),
        ];
        let c = ctx(&g, &rides, &[], None, 0);
        for demographic in [Demographic::Kid, Demographic::Elder] {
            let v = visitor_at(&g, 0, demographic);
            let (pos, _) = v.next_ride_path(&c, &FirstPolicy, &mut rng()).unwrap();
            assert_eq!(pos, GridPos::new(4, 1));
        }
        let adult = visitor_at(&g, 0, Demographic::Adult);
        let (pos, _) = adult.next_ride_path(&c, &FirstPolicy, &mut rng()).unwrap();
        assert_eq!(pos, GridPos::new(2, 1));
    }

    #[test]
    fn visited_subtypes_are_skipped() {
        let g = road_line(6);
        let rides = [
            ride(2, 1, "carousel", ThrillCategory::Family, 0),
            ride(4, 1, "arcade", ThrillCategory::Family, 0),
        ];
        let c = ctx(&g, &rides, &[], None, 0);
        let mut v = visitor_at(&g, 0, Demographic::Kid);
        v.visited_attractions.push("carousel".into());
        let (pos, path) = v.next_ride_path(&c, &UniformPolicy, &mut rng()).unwrap();
        assert_eq!(pos, GridPos::new(4, 1));
        assert_eq!(path.hops(), 4);
    }

    #[test]
    fn long_waits_send_visitor_home() {
        let g = road_line(6);
        let rides = [ride(3, 1, "arcade", ThrillCategory::Family, 60)];
        let c = ctx(&g, &rides, &[], Some(GridPos::new(0, 1)), 0);
        let mut v = visitor_at(&g, 2, Demographic::Adult);

        let err = v.next_ride_path(&c, &UniformPolicy, &mut rng()).unwrap_err();
        assert_eq!(err, NoRide { tolerance_excluded: true });

        assert_eq!(v.plan_next(&c, &UniformPolicy, &mut rng()), PlanOutcome::Leaving(GridPos::new(0, 1)));
        assert!(v.is_leaving);
        assert!(v.exited_without_tolerance);
    }

    #[test]
    fn all_visited_means_leaving() {
        let g = road_line(6);
        let rides = [
            ride(2, 1, "carousel", ThrillCategory::Family, 0),
            ride(4, 1, "arcade", ThrillCategory::Family, 0),
        ];
        let c = ctx(&g, &rides, &[], Some(GridPos::new(0, 1)), 0);
        let mut v = visitor_at(&g, 3, Demographic::Elder);
        v.visited_attractions = vec!["carousel".into(), "arcade".into()];

        assert_eq!(
            v.next_ride_path(&c, &UniformPolicy, &mut rng()),
            Err(NoRide { tolerance_excluded: false })
        );
        let outcome = v.plan_next(&c, &UniformPolicy, &mut rng());
        assert_eq!(outcome, PlanOutcome::Leaving(GridPos::new(0, 1)));
        assert!(v.is_leaving);
        assert!(!v.exited_without_tolerance);
        assert_eq!(v.target, Some(Target::Exit(GridPos::new(0, 1))));

        // Walking toward the exit-adjacent node at x = 0.
        let last = v.path().last().or(v.destination).unwrap();
        assert_eq!(g.node(last).unwrap().pos, GridPos::new(0, 0));
    }

    #[test]
    fn unreachable_ride_is_dropped() {
        let g = road_line(4);
        let rides = [
            ride(8, 8, "island", ThrillCategory::Family, 0),
            ride(2, 1, "carousel", ThrillCategory::Family, 0),
        ];
        let c = ctx(&g, &rides, &[], None, 0);
        let v = visitor_at(&g, 0, Demographic::Kid);
        let (pos, _) = v.next_ride_path(&c, &FirstPolicy, &mut rng()).unwrap();
        assert_eq!(pos, GridPos::new(2, 1));
    }

    #[test]
    fn no_ride_and_no_exit_strands() {
        let g = road_line(3);
        let c = ctx(&g, &[], &[], None, 0);
        let mut v = visitor_at(&g, 1, Demographic::Adult);
        assert_eq!(v.plan_next(&c, &UniformPolicy, &mut rng()), PlanOutcome::Stranded);
        assert_eq!(v.destination, None);
        assert!(v.is_leaving);
        assert!(!v.has_path());
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;
    use crate::{DisposeReason, PlanOutcome, UniformPolicy, VisitorAction};

    #[test]
    fn walks_node_by_node_then_queues() {
        let g = road_line(6);
        let rides = [ride(3, 1, "carousel", ThrillCategory::Family, 0)];
        let mut v = visitor_at(&g, 0, Demographic::Kid);
        let mut r = rng();
        assert_eq!(v.plan_next(&ctx(&g, &rides, &[], None, 0), &NoSnacks, &mut r), PlanOutcome::Riding(GridPos::new(3, 1)));

        let step = |v: &mut Visitor, r: &mut AgentRng, ms| v.update(&ctx(&g, &rides, &[], None, ms), &NoSnacks, r);

        assert_eq!(step(&mut v, &mut r, 500), VisitorAction::Continue);
        assert!(near(v.position, WorldPoint::new(0.5, 0.0)));
        assert_eq!(step(&mut v, &mut r, 1_000), VisitorAction::Continue);
        assert_eq!(step(&mut v, &mut r, 2_000), VisitorAction::Continue);
        assert_eq!(step(&mut v, &mut r, 3_000), VisitorAction::EnterAttraction(GridPos::new(3, 1)));
        assert!(v.is_paused);
        assert!(!v.has_path());
        assert_eq!(v.position, WorldPoint::new(3.0, 0.0));
    }

    #[test]
    fn paused_visitor_never_moves() {
        let g = road_line(6);
        let rides = [ride(5, 1, "carousel", ThrillCategory::Family, 0)];
        let mut v = visitor_at(&g, 0, Demographic::Kid);
        let mut r = rng();
        v.plan_next(&ctx(&g, &rides, &[], None, 0), &NoSnacks, &mut r);
        v.update(&ctx(&g, &rides, &[], None, 300), &NoSnacks, &mut r);
        let held = v.position;

        v.is_paused = true;
        for ms in [600, 5_000, 50_000] {
            let action = v.update(&ctx(&g, &rides, &[], None, ms), &NoSnacks, &mut r);
            assert_eq!(action, VisitorAction::Continue);
            assert_eq!(v.position, held);
            assert!(!v.is_moving());
        }
    }

    #[test]
    fn stops_at_adjacent_concession_then_resumes() {
        let g = road_line(6);
        let rides = [ride(4, 1, "carousel", ThrillCategory::Family, 0)];
        let stands = [StandInfo { pos: GridPos::new(1, 1), subtype: "burger".into(), stop_probability: 1.0 }];
        let mut v = visitor_at(&g, 0, Demographic::Adult);
        let mut r = rng();
        let policy = FirstPolicy;
        let mut step = |v: &mut Visitor, ms| v.update(&ctx(&g, &rides, &stands, None, ms), &policy, &mut r);

        v.plan_next(&ctx(&g, &rides, &stands, None, 0), &FirstPolicy, &mut rng());
        assert_eq!(step(&mut v, 0), VisitorAction::Continue);
        assert_eq!(step(&mut v, 1_000), VisitorAction::Continue);
        // Edge now starts at (1, 0), next to the stand.
        assert_eq!(step(&mut v, 1_000), VisitorAction::EnterConcession(GridPos::new(1, 1)));
        assert!(v.is_paused);
        assert_eq!(step(&mut v, 4_000), VisitorAction::Continue);
        assert_eq!(v.position, WorldPoint::new(1.0, 0.0));

        v.on_concession_complete(GridPos::new(1, 1), 7.5, 9_000);
        assert!(!v.is_paused);
        assert_eq!(v.spend, 7.5);
        // One decision per edge start: no second stop here.
        assert_eq!(step(&mut v, 9_000), VisitorAction::Continue);
        assert_eq!(step(&mut v, 9_500), VisitorAction::Continue);
        assert!(near(v.position, WorldPoint::new(1.5, 0.0)));
    }

    #[test]
    fn concession_cap_blocks_stops() {
        let g = road_line(6);
        let rides = [ride(4, 1, "carousel", ThrillCategory::Family, 0)];
        let stands = [StandInfo { pos: GridPos::new(0, 1), subtype: "burger".into(), stop_probability: 1.0 }];
        let mut v = visitor_at(&g, 0, Demographic::Adult);
        v.visited_concessions = vec![GridPos::new(9, 9); 3];
        let mut r = rng();
        let c = ctx(&g, &rides, &stands, None, 0);
        v.plan_next(&c, &FirstPolicy, &mut r);
        assert_eq!(v.update(&c, &FirstPolicy, &mut r), VisitorAction::Continue);
        assert!(!v.is_paused);
    }

    #[test]
    fn visited_stand_is_passed_by() {
        let g = road_line(6);
        let rides = [ride(4, 1, "carousel", ThrillCategory::Family, 0)];
        let stands = [StandInfo { pos: GridPos::new(0, 1), subtype: "burger".into(), stop_probability: 1.0 }];
        let mut v = visitor_at(&g, 0, Demographic::Adult);
        v.visited_concessions = vec![GridPos::new(0, 1)];
        let mut r = rng();
        let c = ctx(&g, &rides, &stands, None, 0);
        v.plan_next(&c, &FirstPolicy, &mut r);
        assert_eq!(v.update(&c, &FirstPolicy, &mut r), VisitorAction::Continue);
        assert!(!v.is_paused);
    }

    #[test]
    fn plan_ending_underfoot_has_arrived() {
        let g = road_line(6);
        let rides = [ride(2, 1, "carousel", ThrillCategory::Family, 0)];
        let mut v = visitor_at(&g, 2, Demographic::Kid);
        let mut r = rng();
        let c = ctx(&g, &rides, &[], None, 0);
        assert_eq!(v.plan_next(&c, &NoSnacks, &mut r), PlanOutcome::Riding(GridPos::new(2, 1)));
        assert_eq!(v.arrived_at_ride(), Some(GridPos::new(2, 1)));
        assert!(v.is_paused);
        assert_eq!(v.arrived_at_ride(), None, "already queued");
    }

    #[test]
    fn walking_or_leaving_has_not_arrived() {
        let g = road_line(6);
        let rides = [ride(3, 1, "carousel", ThrillCategory::Family, 0)];
        let mut v = visitor_at(&g, 0, Demographic::Kid);
        let mut r = rng();
        v.plan_next(&ctx(&g, &rides, &[], None, 0), &NoSnacks, &mut r);
        assert_eq!(v.arrived_at_ride(), None);
        assert!(!v.is_paused);

        let mut w = visitor_at(&g, 1, Demographic::Kid);
        let exit = Some(GridPos::new(1, 1));
        assert!(matches!(w.plan_next(&ctx(&g, &[], &[], exit, 0), &NoSnacks, &mut r), PlanOutcome::Leaving(_)));
        assert_eq!(w.arrived_at_ride(), None);
        assert!(!w.is_paused);
    }

    #[test]
    fn removed_origin_disposes() {
        let mut g = road_line(6);
        let rides = [ride(4, 1, "carousel", ThrillCategory::Family, 0)];
        let mut v = visitor_at(&g, 0, Demographic::Kid);
        let mut r = rng();
        v.plan_next(&ctx(&g, &rides, &[], None, 0), &NoSnacks, &mut r);
        g.update_tile(GridPos::new(0, 0), false);
        let action = v.update(&ctx(&g, &rides, &[], None, 100), &NoSnacks, &mut r);
        assert_eq!(action, VisitorAction::Dispose(DisposeReason::MissingNode));
    }

    #[test]
    fn removed_road_ahead_triggers_replan() {
        let mut g = road_line(6);
        let rides = [
            ride(4, 1, "carousel", ThrillCategory::Family, 0),
            ride(1, 1, "arcade", ThrillCategory::Family, 0),
        ];
        let mut v = visitor_at(&g, 0, Demographic::Kid);
        let mut r = rng();
        assert_eq!(
            v.plan_next(&ctx(&g, &rides, &[], None, 0), &FirstPolicy, &mut r),
            PlanOutcome::Riding(GridPos::new(4, 1))
        );

        g.update_tile(GridPos::new(3, 0), false);
        let action = v.update(&ctx(&g, &rides, &[], None, 100), &FirstPolicy, &mut r);
        assert_eq!(action, VisitorAction::Continue);
        // The carousel is now cut off, so the arcade is chosen.
        assert_eq!(v.target.map(|t| t.pos()), Some(GridPos::new(1, 1)));
    }

    #[test]
    fn stranded_visitor_is_disposed_on_update() {
        let g = road_line(3);
        let mut v = visitor_at(&g, 1, Demographic::Adult);
        let mut r = rng();
        let c = ctx(&g, &[], &[], None, 0);
        v.plan_next(&c, &UniformPolicy, &mut r);
        assert_eq!(v.update(&c, &UniformPolicy, &mut r), VisitorAction::Dispose(DisposeReason::MissingNode));
    }
}

// ── Release hooks ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod release {
    use super::*;

    #[test]
    fn ride_release_records_visit_and_unpauses() {
        let g = road_line(3);
        let mut v = visitor_at(&g, 0, Demographic::Adult);
        v.is_paused = true;
        v.on_ride_complete("carousel", 3.0, 12_000);
        assert!(!v.is_paused);
        assert!(v.has_visited("carousel"));
        assert_eq!(v.spend, 3.0);
        assert_eq!(v.cycle().start_ms, 12_000);
    }
}

// ── VisitorStore ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use pk_core::{NodeId, WorldPoint};

    use super::*;
    use crate::VisitorStore;

    fn spawn(store: &mut VisitorStore) -> AgentId {
        store.spawn(Demographic::Adult, VisualHandle(0), NodeId(0), WorldPoint::default(), Tick(1), 1_000)
    }

    #[test]
    fn ids_follow_spawn_order() {
        let mut store = VisitorStore::new(42);
        let a = spawn(&mut store);
        let b = spawn(&mut store);
        let c = spawn(&mut store);
        store.remove(b);
        assert_eq!(store.ids(), vec![a, c]);
        let d = spawn(&mut store);
        assert_eq!(store.ids(), vec![a, c, d]);
        assert_ne!(d, b);
        assert_eq!(store.spawned(), 4);
    }

    #[test]
    fn visitor_and_rng_borrowed_together() {
        let mut store = VisitorStore::new(42);
        let a = spawn(&mut store);
        let (v, r) = store.get_with_rng(a).unwrap();
        v.spend += r.gen_range(1.0..2.0);
        assert!(store.get(a).unwrap().spend >= 1.0);
        assert!(!store.get(a).unwrap().name.is_empty());
        store.remove(a);
        assert!(store.get_with_rng(a).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn names_are_deterministic_per_seed() {
        let mut s1 = VisitorStore::new(7);
        let mut s2 = VisitorStore::new(7);
        let a = spawn(&mut s1);
        let b = spawn(&mut s2);
        assert_eq!(s1.get(a).unwrap().name, s2.get(b).unwrap().name);
    }
}
