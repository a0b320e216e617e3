//! `pk-sim` — the park and its tick loop for the rust_park simulator.
//!
//! # Tick loop
//!
//! ```text
//! each step:
//!   ① Clock      — advance one tick (one simulated second).
//!   ② Buildings  — row-major: refresh road access, step attractions and
//!                  concessions; collect the visitors they release.
//!   ③ Lists      — reachable rides (wait estimates refreshed), reachable
//!                  concessions, entrance.  Built once, shared by ④ and ⑤.
//!   ④ Releases   — credit and unpause released visitors; riders plan their
//!                  next destination.
//!   ⑤ Visitors   — one update each, spawn order; push into venue queues,
//!                  remove those who exited or were disposed.
//!   ⑥ Spawner    — at most one new visitor when the interval has elapsed.
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`park`]      | `Park` — grid, lane graph, visitors, clock, tick loop     |
//! | [`builder`]   | `ParkBuilder`                                             |
//! | [`observer`]  | `ParkObserver`, `ParkEvent`, `NoopObserver`, `EventLog`   |
//! | [`visual`]    | `VisualFactory`, `SequentialVisuals`                      |
//! | [`stats`]     | `ParkStats`, `FinanceReport`, ride and stand reports      |
//! | [`error`]     | `SimError`, `SimResult<T>`                                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pk_core::{GridPos, ParkConfig};
//! use pk_sim::{NoopObserver, ParkBuilder};
//! use pk_venue::BuildingKind;
//!
//! let mut park = ParkBuilder::new(ParkConfig::default()).build()?;
//! park.place_building(GridPos::new(8, 15), BuildingKind::Entrance, "")?;
//! park.place_building(GridPos::new(8, 14), BuildingKind::Road, "")?;
//! park.place_building(GridPos::new(9, 14), BuildingKind::Attraction, "carousel")?;
//! park.run_ticks(600, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod park;
pub mod stats;
pub mod visual;

#[cfg(test)]
mod tests;

pub use builder::ParkBuilder;
pub use error::{SimError, SimResult};
pub use observer::{Departure, EventLog, NoopObserver, ParkEvent, ParkObserver};
pub use park::Park;
pub use stats::{FinanceReport, ParkStats, RideReport, StandReport, VisitRecord};
pub use visual::{SequentialVisuals, VisualFactory};
