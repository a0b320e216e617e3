//! `pk-core` — foundational types for the `rust_park` theme-park simulator.
//!
//! This crate is a dependency of every other `pk-*` crate.  It intentionally
//! has no `pk-*` dependencies.
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `VisualHandle`                     |
//! | [`geo`]         | `GridPos`, `Direction`, `WorldPoint`                    |
//! | [`time`]        | `Tick`, `SimClock`, `PaceClock`, `TickPace`             |
//! | [`rng`]         | `AgentRng` (per-visitor), `SimRng` (park-level)         |
//! | [`profile`]     | `Demographic`, `ThrillCategory`                         |
//! | [`config`]      | `ParkConfig` and its per-subtype tables                 |
//! | [`error`]       | `CoreError`, `CoreResult`                               |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod profile;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AttractionSpec, ConcessionSpec, ParkConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{Direction, GridPos, WorldPoint};
pub use ids::{AgentId, NodeId, VisualHandle};
pub use profile::{Demographic, ThrillCategory};
pub use rng::{AgentRng, SimRng};
pub use time::{PaceClock, SimClock, Tick, TickPace};
