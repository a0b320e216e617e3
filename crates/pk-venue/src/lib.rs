//! `pk-venue` — buildings and the two visitor-queueing engines.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`building`]   | `Building`, `Facility`, `BuildingKind`, `Road`, `RoadStyle` |
//! | [`attraction`] | `Attraction` — capacity/duration ride cycle                 |
//! | [`concession`] | `Concession` — sampled dwell time and spend                 |
//! | [`release`]    | `Release` — a visitor handed back by an engine              |
//! | [`error`]      | `VenueError`, `VenueResult<T>`                              |
//!
//! # Push/pop split
//!
//! Visitors push *themselves* into a venue (`Attraction::enqueue`,
//! `Concession::admit`); only the venue's own `step`/`dispose` pops them,
//! returning [`Release`] records.  The engines never touch visitor state:
//! the park applies each release (spend, visited list, unpause, new plan).

pub mod attraction;
pub mod building;
pub mod concession;
pub mod error;
pub mod release;


pub use attraction::{Attraction, RideState};
pub use building::{Building, BuildingBase, BuildingKind, Facility, Road, RoadStyle};
pub use concession::{Concession, ConcessionEntry};
pub use error::{VenueError, VenueResult};
pub use release::{Release, VenueKind};
