//! Read-only park state passed to every visitor update.

use pk_core::{GridPos, ThrillCategory, Tick};
use pk_spatial::LaneGraph;

/// A road-accessible attraction as seen by planning visitors.
#[derive(Clone, Debug, PartialEq)]
pub struct RideInfo {
    pub pos:           GridPos,
    pub subtype:       String,
    pub thrill:        ThrillCategory,
    /// Wait estimate refreshed when the list was built.
    pub wait_estimate: u64,
}

/// A road-accessible concession as seen by passing visitors.
#[derive(Clone, Debug, PartialEq)]
pub struct StandInfo {
    pub pos:              GridPos,
    pub subtype:          String,
    pub stop_probability: f64,
}

/// Snapshot shared by every visitor update in one tick.
///
/// The park builds the ride, stand and entrance lists once per tick, after
/// buildings have stepped, and lends them to each visitor in turn.
pub struct PlanContext<'a> {
    pub tick:                  Tick,
    /// Pace-clock milliseconds at `tick`.
    pub now_ms:                u64,
    pub graph:                 &'a LaneGraph,
    pub rides:                 &'a [RideInfo],
    pub stands:                &'a [StandInfo],
    /// Park entrance, which doubles as the exit.
    pub entrance:              Option<GridPos>,
    /// World distance per millisecond.
    pub speed:                 f32,
    pub wait_tolerance:        u64,
    pub max_concession_visits: u32,
}
