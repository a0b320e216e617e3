//! Unit tests for pk-sim.
//!
//! Parks are laid out by hand on a 10×10 grid with the spawner off, so every
//! visitor is spawned explicitly and every tick is predictable.

use pk_core::{AttractionSpec, ConcessionSpec, Demographic, GridPos, ParkConfig, ThrillCategory, Tick};
use pk_venue::BuildingKind;

use crate::{NoopObserver, Park, ParkBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn at(x: i32, y: i32) -> GridPos {
    GridPos::new(x, y)
}

fn config() -> ParkConfig {
    let mut c = ParkConfig::default();
    c.sim.width = 10;
    c.sim.height = 10;
    c.visitor.max_visitors = 0;
    // One tile per tick.
    c.visitor.speed = 0.001;
    c.attraction.subtypes.insert(
        "teacups".into(),
        AttractionSpec {
            installation_cost: 1_000.0,
            ticket_price:      2.5,
            operating_cost:    0.5,
            duration:          3,
            capacity:          2,
            thrill:            ThrillCategory::Family,
        },
    );
    c.concession.subtypes.insert(
        "snack".into(),
        ConcessionSpec {
            installation_cost: 100.0,
            operating_cost:    0.0,
            spend_mean:        4.0,
            spend_sd:          0.0,
            dwell_mean:        2.0,
            dwell_sd:          0.0,
            stop_probability:  1.0,
        },
    );
    c
}

fn place(park: &mut Park, kind: BuildingKind, subtype: &str, pos: GridPos) {
    assert!(park.place_building(pos, kind, subtype).unwrap(), "could not build {kind} at {pos}");
}

/// ```text
///   y=7          R
///   y=8      T   R      T = teacups (capacity 2, 3 ticks)
///   y=9          E      R = road, E = entrance
///           x=4 x=5
/// ```
/// Visitors appear on (5, 8), already next to the ride.
fn teacup_park() -> Park {
    let mut park = ParkBuilder::new(config()).build().unwrap();
    place(&mut park, BuildingKind::Entrance, "", at(5, 9));
    place(&mut park, BuildingKind::Road, "", at(5, 8));
    place(&mut park, BuildingKind::Road, "", at(5, 7));
    place(&mut park, BuildingKind::Attraction, "teacups", at(4, 8));
    park
}

/// ```text
///   y=4          S       T      S = snack stand (always stops, 2 ticks, $4)
///   y=5   E  R   R   R   R
///        x=0 1   2   3   4
/// ```
fn snack_park() -> Park {
    let mut park = ParkBuilder::new(config()).build().unwrap();
    place(&mut park, BuildingKind::Entrance, "", at(0, 5));
    for x in 1..=4 {
        place(&mut park, BuildingKind::Road, "", at(x, 5));
    }
    place(&mut park, BuildingKind::Concession, "snack", at(2, 4));
    place(&mut park, BuildingKind::Attraction, "teacups", at(4, 4));
    park
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod placement {
    use pk_venue::{RoadStyle, VenueError};

    use super::*;
    use crate::SimError;

    #[test]
    fn occupied_or_outside_is_a_no_op() {
        let mut park = teacup_park();
        assert!(!park.place_building(at(5, 8), BuildingKind::Road, "").unwrap());
        assert!(!park.place_building(at(10, 0), BuildingKind::Road, "").unwrap());
        assert!(!park.place_building(at(-1, 3), BuildingKind::Road, "").unwrap());
        assert!(!park.bulldoze(at(0, 0)));
        assert!(!park.bulldoze(at(42, 42)));
    }

    #[test]
    fn unknown_subtype_is_an_error_logged_once() {
        let mut park = teacup_park();
        for _ in 0..3 {
            let err = park.place_building(at(1, 1), BuildingKind::Attraction, "warp-drive").unwrap_err();
            assert!(matches!(err, SimError::Venue(VenueError::UnknownSubtype { .. })));
        }
        assert!(park.grid().is_vacant(at(1, 1)));
        assert_eq!(park.reported.len(), 1);

        let err = park.place_named(at(1, 1), "castle", "").unwrap_err();
        assert!(matches!(err, SimError::Venue(VenueError::UnknownKind(_))));
        assert_eq!(park.reported.len(), 2);
    }

    #[test]
    fn named_kinds_and_random_subtype() {
        let mut park = teacup_park();
        assert!(park.place_named(at(1, 1), "stand", "").unwrap());
        let b = park.grid().building(at(1, 1)).unwrap();
        assert_eq!(b.kind(), BuildingKind::Concession);
        assert!(park.config.concession(&b.base.subtype).is_some());
        assert!([0, 90, 180, 270].contains(&b.base.rotation));
    }

    #[test]
    fn road_styles_follow_neighbours() {
        let mut park = ParkBuilder::new(config()).build().unwrap();
        let c = at(5, 5);
        for p in [c, at(4, 5), at(6, 5), at(5, 4)] {
            place(&mut park, BuildingKind::Road, "", p);
        }
        let style = |park: &Park, p| park.grid().building(p).and_then(|b| b.road_style());
        assert_eq!(style(&park, c), Some(RoadStyle::Tee));
        assert_eq!(style(&park, at(4, 5)), Some(RoadStyle::End));

        place(&mut park, BuildingKind::Road, "", at(5, 6));
        assert_eq!(style(&park, c), Some(RoadStyle::Cross));

        assert!(park.bulldoze(at(4, 5)));
        assert!(park.bulldoze(at(6, 5)));
        assert_eq!(style(&park, c), Some(RoadStyle::Straight));
    }

    #[test]
    fn spawn_tiles_are_end_roads_next_to_the_entrance() {
        let park = teacup_park();
        assert_eq!(park.entrance(), Some(at(5, 9)));
        assert_eq!(park.spawn_tiles(), vec![at(5, 8)]);
    }

    #[test]
    fn lane_graph_tracks_roads() {
        let mut park = teacup_park();
        assert_eq!(park.graph().node_count(), 2);
        assert_eq!(park.graph().edge_count(), 2);
        assert!(park.bulldoze(at(5, 7)));
        assert_eq!(park.graph().node_count(), 1);
        assert_eq!(park.graph().edge_count(), 0);
        assert!(park.graph().tile_node(at(5, 7)).is_none());
    }
}

// ── Road access ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod road_access {
    use super::*;

    fn access(park: &Park) -> Vec<(GridPos, bool)> {
        park.grid().occupied().map(|(p, b)| (p, b.base.has_road_access)).collect()
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut park = teacup_park();
        let before = access(&park);
        let (nodes, edges) = (park.graph().node_count(), park.graph().edge_count());
        park.run_ticks(3, &mut NoopObserver);
        assert_eq!(access(&park), before);
        assert_eq!(park.graph().node_count(), nodes);
        assert_eq!(park.graph().edge_count(), edges);
    }

    #[test]
    fn access_needs_a_road_within_reach() {
        let mut park = teacup_park();
        place(&mut park, BuildingKind::Attraction, "teacups", at(5, 5));
        let ride = |park: &Park| park.grid().building(at(5, 5)).unwrap().base.has_road_access;
        assert!(!ride(&park));

        place(&mut park, BuildingKind::Road, "", at(5, 6));
        assert!(ride(&park), "placing a neighbour road refreshes access at once");

        assert!(park.bulldoze(at(5, 6)));
        assert!(!ride(&park));
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use pk_core::AgentId;
    use pk_venue::RideState;

    use super::*;
    use crate::{Departure, EventLog, ParkEvent};

    fn ride(park: &Park) -> &pk_venue::Attraction {
        park.grid().building(at(4, 8)).and_then(|b| b.as_attraction()).unwrap()
    }

    /// Three kids, two seats.  Visitors spawned next to the ride join the
    /// line at once, the first batch boards on tick 1 and gets off on tick 4,
    /// when the third boards.
    #[test]
    fn two_seats_three_riders() {
        let mut park = teacup_park();
        let ids: Vec<AgentId> = (0..3).map(|_| park.spawn_visitor(Demographic::Kid).unwrap()).collect();
        assert_eq!(ride(&park).waiting().collect::<Vec<_>>(), ids);
        assert!(ids.iter().all(|id| park.visitor(*id).unwrap().is_paused));

        park.step(&mut NoopObserver);
        assert_eq!(ride(&park).loaded(), &ids[..2]);
        assert_eq!(ride(&park).waiting().collect::<Vec<_>>(), vec![ids[2]]);
        assert_eq!(ride(&park).state, RideState::Operating);

        park.run_ticks(3, &mut NoopObserver);
        assert_eq!(park.now(), Tick(4));
        assert_eq!(ride(&park).ridership, 2);
        assert_eq!(ride(&park).revenue, 5.0);
        assert_eq!(ride(&park).loaded(), &ids[2..]);
        assert_eq!(ride(&park).queue_len(), 0);

        // The only ride is done, so both riders walked straight out.
        assert!(!park.visitors().contains(ids[0]));
        assert!(!park.visitors().contains(ids[1]));
        let visits = park.stats().visits();
        assert_eq!(visits.len(), 2);
        assert!(visits.iter().all(|v| v.departure == Departure::Exited && v.spend == 2.5));
        assert_eq!(park.stats().time_in_park(Demographic::Kid), vec![4, 4]);
    }

    #[test]
    fn released_beside_the_next_ride_queues_at_once() {
        let mut park = teacup_park();
        let id = park.spawn_visitor(Demographic::Kid).unwrap();
        place(&mut park, BuildingKind::Attraction, "carousel", at(6, 8));
        let carousel = |park: &Park| park.grid().building(at(6, 8)).and_then(|b| b.as_attraction()).cloned().unwrap();

        park.run_ticks(4, &mut NoopObserver);
        assert_eq!(ride(&park).ridership, 1);
        assert_eq!(carousel(&park).waiting().collect::<Vec<_>>(), vec![id]);
        assert!(park.visitor(id).unwrap().is_paused);

        park.step(&mut NoopObserver);
        assert_eq!(carousel(&park).loaded(), &[id]);
    }

    #[test]
    fn paused_visitors_stay_put() {
        let mut park = teacup_park();
        let ids: Vec<AgentId> = (0..3).map(|_| park.spawn_visitor(Demographic::Kid).unwrap()).collect();
        park.step(&mut NoopObserver);

        let last = ids[2];
        let held = park.visitor(last).unwrap().position;
        for _ in 0..3 {
            park.step(&mut NoopObserver);
            let v = park.visitor(last).unwrap();
            assert!(v.is_paused);
            assert!(!v.is_moving());
            assert_eq!(v.position, held);
        }
    }

    #[test]
    fn all_rides_visited_means_leaving() {
        let mut park = teacup_park();
        let id = park.spawn_visitor(Demographic::Elder).unwrap();
        park.run_ticks(5, &mut NoopObserver);
        assert_eq!(park.stats().visits().len(), 1);
        let visit = &park.stats().visits()[0];
        assert_eq!(visit.agent, id);
        assert_eq!(visit.departure, Departure::Exited);
        assert!(!visit.without_tolerance);
    }

    #[test]
    fn thrill_ride_turns_kids_away() {
        let mut park = ParkBuilder::new(config()).build().unwrap();
        place(&mut park, BuildingKind::Entrance, "", at(5, 9));
        place(&mut park, BuildingKind::Road, "", at(5, 8));
        place(&mut park, BuildingKind::Road, "", at(5, 7));
        place(&mut park, BuildingKind::Attraction, "rollercoaster", at(4, 8));

        let kid = park.spawn_visitor(Demographic::Kid).unwrap();
        assert!(park.visitor(kid).unwrap().is_leaving);
        let adult = park.spawn_visitor(Demographic::Adult).unwrap();
        assert!(!park.visitor(adult).unwrap().is_leaving);
    }

    #[test]
    fn long_line_sends_visitors_home() {
        let mut cfg = config();
        cfg.visitor.wait_tolerance = 1;
        let mut park = ParkBuilder::new(cfg).build().unwrap();
        place(&mut park, BuildingKind::Entrance, "", at(5, 9));
        place(&mut park, BuildingKind::Road, "", at(5, 8));
        place(&mut park, BuildingKind::Road, "", at(5, 7));
        place(&mut park, BuildingKind::Attraction, "teacups", at(4, 8));

        for _ in 0..2 {
            park.spawn_visitor(Demographic::Kid);
        }
        park.run_ticks(2, &mut NoopObserver);
        // Boarded on tick 1, so 2 ticks left: estimate 2 >= tolerance 1.
        let late = park.spawn_visitor(Demographic::Kid).unwrap();
        assert!(park.visitor(late).unwrap().is_leaving);
        park.step(&mut NoopObserver);
        assert_eq!(park.stats().exited_without_tolerance, 1);
    }

    #[test]
    fn concession_stop_on_the_way() {
        let mut park = snack_park();
        let id = park.spawn_visitor(Demographic::Kid).unwrap();
        let stand = |park: &Park| park.grid().building(at(2, 4)).and_then(|b| b.as_concession()).cloned().unwrap();

        park.run_ticks(2, &mut NoopObserver);
        assert!(park.visitor(id).unwrap().is_paused);
        assert!(stand(&park).holds(id));

        park.run_ticks(3, &mut NoopObserver);
        let v = park.visitor(id).unwrap();
        assert!(!v.is_paused);
        assert_eq!(v.spend, 4.0);
        assert_eq!(v.visited_concessions, vec![at(2, 4)]);
        assert_eq!(stand(&park).revenue, 4.0);
        assert_eq!(stand(&park).traffic, 1);

        park.run_ticks(2, &mut NoopObserver);
        let ride = park.grid().building(at(4, 4)).and_then(|b| b.as_attraction()).unwrap();
        assert!(ride.holds(id));
        assert!(park.stats().heat(at(2, 5)) >= 1);
    }

    #[test]
    fn one_meal_per_stand() {
        let mut park = snack_park();
        let id = park.spawn_visitor(Demographic::Kid).unwrap();
        park.run_ticks(40, &mut NoopObserver);

        // Out and back past the stand, but it only eats there once.
        assert!(!park.visitors().contains(id));
        let visit = &park.stats().visits()[0];
        assert_eq!(visit.departure, Departure::Exited);
        assert_eq!(visit.spend, 4.0 + 2.5);
        let stand = park.grid().building(at(2, 4)).and_then(|b| b.as_concession()).unwrap();
        assert_eq!(stand.traffic, 1);
    }

    #[test]
    fn bulldozed_ride_releases_everyone() {
        let mut park = teacup_park();
        let ids: Vec<AgentId> = (0..3).map(|_| park.spawn_visitor(Demographic::Kid).unwrap()).collect();
        park.run_ticks(2, &mut NoopObserver);
        assert_eq!(ride(&park).loaded().len(), 2);

        assert!(park.bulldoze(at(4, 8)));
        for id in &ids {
            let v = park.visitor(*id).unwrap();
            assert!(!v.is_paused);
            assert!(v.is_leaving);
            assert_eq!(v.spend, 2.5);
        }

        let mut log = EventLog::default();
        park.step(&mut log);
        let released = log.events.iter().filter(|(_, e)| matches!(e, ParkEvent::Released { .. })).count();
        let exited = log
            .events
            .iter()
            .filter(|(_, e)| matches!(e, ParkEvent::Disposed { departure: Departure::Exited, .. }))
            .count();
        assert_eq!((released, exited), (3, 3));
        assert!(park.visitors().is_empty());
    }

    #[test]
    fn stale_origin_disposes_visitor() {
        let mut park = snack_park();
        assert!(park.bulldoze(at(2, 4)));
        let id = park.spawn_visitor(Demographic::Kid).unwrap();
        park.step(&mut NoopObserver);
        // Now walking (2, 5) → (3, 5).
        assert!(park.bulldoze(at(2, 5)));

        let mut log = EventLog::default();
        park.step(&mut log);
        assert!(!park.visitors().contains(id));
        assert!(log.events.iter().any(|(_, e)| matches!(
            e,
            ParkEvent::Disposed { departure: Departure::Disposed(pk_agent::DisposeReason::MissingNode), .. }
        )));
    }

    #[test]
    fn events_arrive_in_order() {
        let mut park = teacup_park();
        let id = park.spawn_visitor(Demographic::Adult).unwrap();
        let mut log = EventLog::default();
        park.step(&mut log);
        let kinds: Vec<&ParkEvent> = log.events.iter().map(|(_, e)| e).collect();
        assert!(matches!(kinds[0], ParkEvent::Spawned { agent, .. } if *agent == id));
        assert!(matches!(kinds[1], ParkEvent::Admitted { agent, .. } if *agent == id));
        // Spawned beside the ride: both happen before the first tick.
        assert_eq!(log.events[0].0, Tick(0));
        assert_eq!(log.events[1].0, Tick(0));
    }
}

// ── Spawner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawner {
    use super::*;
    use crate::ParkObserver;

    #[derive(Default)]
    struct Peak(usize);

    impl ParkObserver for Peak {
        fn on_tick_end(&mut self, _tick: Tick, visitors: usize) {
            self.0 = self.0.max(visitors);
        }
    }

    #[test]
    fn respects_interval_and_cap() {
        let mut cfg = config();
        cfg.visitor.max_visitors = 2;
        cfg.visitor.spawn_interval_min = 1;
        cfg.visitor.spawn_interval_max = 1;
        let mut park = ParkBuilder::new(cfg).build().unwrap();
        place(&mut park, BuildingKind::Entrance, "", at(5, 9));
        place(&mut park, BuildingKind::Road, "", at(5, 8));
        place(&mut park, BuildingKind::Road, "", at(5, 7));
        place(&mut park, BuildingKind::Attraction, "arcade", at(4, 8));

        let mut peak = Peak::default();
        park.step(&mut peak);
        assert_eq!(park.stats().spawned, 0, "first tick only schedules");
        park.step(&mut peak);
        assert_eq!(park.stats().spawned, 1);
        park.run_ticks(10, &mut peak);
        assert_eq!(park.stats().spawned, 2);
        assert_eq!(peak.0, 2);
    }

    #[test]
    fn no_entrance_no_visitors() {
        let mut cfg = config();
        cfg.visitor.max_visitors = 5;
        let mut park = ParkBuilder::new(cfg).build().unwrap();
        park.run_ticks(30, &mut NoopObserver);
        assert_eq!(park.stats().spawned, 0);
        assert!(park.spawn_visitor(Demographic::Adult).is_none());
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod statistics {
    use pk_venue::RideState;

    use super::*;

    #[test]
    fn idle_park_costs_money() {
        let mut park = teacup_park();
        park.run_ticks(10, &mut NoopObserver);
        let f = park.finance();
        assert_eq!(f.fixed_cost, 2.0 * 500.0 + 1_000.0);
        assert!((f.operational_cost - 5.0).abs() < 1e-9);
        assert!((f.total_cost - 2_005.0).abs() < 1e-9);
        assert_eq!(f.total_revenue, 0.0);
        assert_eq!(f.break_even, None);
    }

    #[test]
    fn break_even_from_operating_profit() {
        let mut park = teacup_park();
        for _ in 0..3 {
            park.spawn_visitor(Demographic::Kid);
        }
        park.run_ticks(5, &mut NoopObserver);
        let f = park.finance();
        assert_eq!(f.total_revenue, 5.0);
        // (5.0 - 2.5) / 5 ticks = 0.5 per tick against 2000 fixed.
        assert!((f.break_even.unwrap() - 4_000.0).abs() < 1e-6);
    }

    #[test]
    fn ride_and_stand_reports() {
        let mut park = snack_park();
        park.spawn_visitor(Demographic::Kid);
        park.run_ticks(7, &mut NoopObserver);

        let rides = park.ride_reports();
        assert_eq!(rides.len(), 1);
        assert_eq!(rides[0].subtype, "teacups");
        assert_eq!(rides[0].pos, at(4, 4));
        assert_eq!(rides[0].state, RideState::Idle);
        assert_eq!(rides[0].queue, 1);

        let stands = park.stand_reports();
        assert_eq!(stands.len(), 1);
        assert_eq!(stands[0].traffic, 1);
        assert_eq!(stands[0].revenue, 4.0);
        assert_eq!(stands[0].profit, 4.0 - 100.0);
    }

    #[test]
    fn spend_by_demographic() {
        let mut park = teacup_park();
        park.spawn_visitor(Demographic::Kid);
        park.spawn_visitor(Demographic::Elder);
        park.run_ticks(5, &mut NoopObserver);
        assert_eq!(park.stats().money_spent(Demographic::Kid), vec![2.5]);
        assert_eq!(park.stats().money_spent(Demographic::Elder), vec![2.5]);
        assert!(park.stats().money_spent(Demographic::Adult).is_empty());
        assert_eq!(park.stats().mean_stay(Demographic::Kid), Some(4.0));
        assert_eq!(park.stats().mean_stay(Demographic::Adult), None);
    }
}
