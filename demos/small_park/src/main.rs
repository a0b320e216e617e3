//! small_park — a hand-built 16×16 park run for half an hour of park time.
//!
//! Usage: `small_park [config.json] [ticks]`.  Without a config file the
//! built-in defaults are used (seed 42, 1 tick = 1 s, up to 10 visitors).
//! Set `RUST_LOG=pk_sim=debug` to watch individual visitors.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use pk_core::{GridPos, ParkConfig, Tick};
use pk_sim::{Departure, Park, ParkBuilder, ParkEvent, ParkObserver};
use pk_venue::{BuildingKind, VenueKind};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_TICKS:   u64 = 1_800;
const REPORT_INTERVAL: u64 = 300;

// ── Layout ────────────────────────────────────────────────────────────────────
//
//   The entrance sits at the bottom centre.  A main street runs north from it
//   and a cross street runs east–west through the middle.
//
//        x=3        x=8        x=13
//   y=4             R
//   y=6          F  R  A             F ferris-wheel   A arcade
//   y=8       B     R           W    B bumper-car     W water-ride
//   y=9   R R R R R R R R R R R      cross street
//   y=10      S  h  R  i     b       h hot-dog  i ice-cream  b burger  S swing-claw
//   y=12         C  R  X             C carousel       X rollercoaster
//   y=15            E                entrance

const RIDES: &[(i32, i32, &str)] = &[
    (7, 12, "carousel"),
    (9, 12, "rollercoaster"),
    (7, 6, "ferris-wheel"),
    (9, 6, "arcade"),
    (4, 8, "bumper-car"),
    (12, 8, "water-ride"),
    (4, 10, "swing-claw"),
];

const STANDS: &[(i32, i32, &str)] = &[
    (7, 10, "hot-dog"),
    (9, 10, "ice-cream"),
    (12, 10, "burger"),
];

fn lay_out(park: &mut Park) -> Result<()> {
    park.place_building(GridPos::new(8, 15), BuildingKind::Entrance, "")?;
    for y in 4..=14 {
        park.place_building(GridPos::new(8, y), BuildingKind::Road, "")?;
    }
    for x in 3..=13 {
        park.place_building(GridPos::new(x, 9), BuildingKind::Road, "")?;
    }
    for &(x, y, subtype) in RIDES {
        park.place_building(GridPos::new(x, y), BuildingKind::Attraction, subtype)?;
    }
    for &(x, y, subtype) in STANDS {
        park.place_building(GridPos::new(x, y), BuildingKind::Concession, subtype)?;
    }
    Ok(())
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    spawned:     usize,
    rides:       usize,
    meals:       usize,
    exited:      usize,
    disposed:    usize,
    in_park:     usize,
}

impl ParkObserver for Tally {
    fn on_event(&mut self, _tick: Tick, event: &ParkEvent) {
        match event {
            ParkEvent::Spawned { .. } => self.spawned += 1,
            ParkEvent::Released { kind: VenueKind::Attraction, .. } => self.rides += 1,
            ParkEvent::Released { kind: VenueKind::Concession, .. } => self.meals += 1,
            ParkEvent::Disposed { departure: Departure::Exited, .. } => self.exited += 1,
            ParkEvent::Disposed { .. } => self.disposed += 1,
            ParkEvent::Admitted { .. } => {}
        }
    }

    fn on_tick_end(&mut self, tick: Tick, visitors: usize) {
        self.in_park = visitors;
        if tick.0 % REPORT_INTERVAL == 0 {
            println!(
                "  t={:>5}  in park {:>3}  spawned {:>4}  rides {:>4}  meals {:>4}  left {:>4}",
                tick.0, visitors, self.spawned, self.rides, self.meals, self.exited + self.disposed
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ParkConfig::from_path(Path::new(&path))
            .with_context(|| format!("loading park config from {path}"))?,
        None => ParkConfig::default(),
    };
    let ticks = match args.next() {
        Some(n) => n.parse::<u64>().with_context(|| format!("bad tick count {n:?}"))?,
        None => DEFAULT_TICKS,
    };

    println!("=== small_park ===");
    println!(
        "Grid: {}×{}  |  Seed: {}  |  Ticks: {}  |  Max visitors: {}",
        config.sim.width, config.sim.height, config.sim.seed, ticks, config.visitor.max_visitors
    );

    let mut park = ParkBuilder::new(config).build()?;
    lay_out(&mut park)?;
    println!(
        "Lane graph: {} nodes, {} edges  |  spawn tiles: {:?}",
        park.graph().node_count(),
        park.graph().edge_count(),
        park.spawn_tiles()
    );
    println!();

    let mut tally = Tally::default();
    let t0 = Instant::now();
    park.run_ticks(ticks, &mut tally);
    println!();
    println!("Simulated {} in {:.3} s", park.clock, t0.elapsed().as_secs_f64());
    println!("Visitors still in the park: {}", tally.in_park);
    println!();

    // ── Rides ──
    println!("{:<16} {:<10} {:>6} {:>7} {:>9} {:>10}", "Ride", "State", "Queue", "Riders", "Revenue", "Profit");
    println!("{}", "-".repeat(62));
    for r in park.ride_reports() {
        println!(
            "{:<16} {:<10} {:>6} {:>7} {:>9.2} {:>10.2}",
            r.subtype,
            r.state.as_str(),
            r.queue,
            r.ridership,
            r.revenue,
            r.profit
        );
    }
    println!();

    // ── Stands ──
    println!("{:<16} {:>8} {:>9} {:>10}", "Stand", "Traffic", "Revenue", "Profit");
    println!("{}", "-".repeat(46));
    for s in park.stand_reports() {
        println!("{:<16} {:>8} {:>9.2} {:>10.2}", s.subtype, s.traffic, s.revenue, s.profit);
    }
    println!();

    // ── Visitors ──
    let stats = park.stats();
    for demographic in [pk_core::Demographic::Adult, pk_core::Demographic::Kid, pk_core::Demographic::Elder] {
        let spend = stats.money_spent(demographic);
        let total: f64 = spend.iter().sum();
        match stats.mean_stay(demographic) {
            Some(stay) => println!(
                "{demographic:<6} {:>4} visits  mean stay {stay:>7.1} ticks  spent ${total:.2}",
                spend.len()
            ),
            None => println!("{demographic:<6}    0 visits"),
        }
    }
    println!(
        "Left over long lines: {}  |  stranded: {}",
        stats.exited_without_tolerance, stats.stranded
    );
    if let Some((pos, heat)) = stats.road_heatmap().max_by_key(|(_, n)| *n) {
        println!("Busiest road tile: {pos} ({heat} visitor-ticks)");
    }
    println!();

    // ── Finance ──
    let f = park.finance();
    println!("Fixed cost       ${:>10.2}", f.fixed_cost);
    println!("Operating cost   ${:>10.2}", f.operational_cost);
    println!("Revenue          ${:>10.2}", f.total_revenue);
    println!("Net              ${:>10.2}", f.net());
    match f.break_even {
        Some(t) => println!("Break-even in    {t:>11.0} ticks"),
        None => println!("Break-even       never at the current rate"),
    }

    Ok(())
}
