//! `pk-agent` — park visitors.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`visitor`]   | `Visitor`, `Target`, `VisitorAction`, `PlanOutcome`          |
//! | [`context`]   | `PlanContext`, `RideInfo`, `StandInfo` — per-tick snapshot   |
//! | [`policy`]    | `VisitorPolicy` trait, `UniformPolicy`                       |
//! | [`motion`]    | `EdgeCycle` — time-paced interpolation along one edge        |
//! | [`store`]     | `VisitorStore` — insertion-ordered visitors plus their RNGs  |
//! | [`names`]     | Random display names                                         |
//!
//! A visitor never touches a venue directly.  Its update returns a
//! [`VisitorAction`] and the park performs the queue push; venues later hand
//! the visitor back through [`Visitor::on_ride_complete`] or
//! [`Visitor::on_concession_complete`].

pub mod context;
pub mod motion;
pub mod names;
pub mod policy;
pub mod store;
pub mod visitor;

#[cfg(test)]
mod tests;

pub use context::{PlanContext, RideInfo, StandInfo};
pub use motion::EdgeCycle;
pub use policy::{UniformPolicy, VisitorPolicy};
pub use store::VisitorStore;
pub use visitor::{DisposeReason, NoRide, PlanOutcome, Target, Visitor, VisitorAction};
