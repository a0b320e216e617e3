//! Park configuration snapshot.
//!
//! A `ParkConfig` is built once (from `Default`, or from JSON via
//! [`ParkConfig::from_json_str`] / [`ParkConfig::from_path`]) and handed to
//! the park builder.  Nothing re-reads configuration mid-run; every engine
//! receives the snapshot (or the per-subtype spec it needs) at construction.
//!
//! Economics are keyed by subtype name, e.g.
//!
//! ```json
//! { "attraction": { "subtypes": { "carousel": { "capacity": 12, ... } } } }
//! ```
//!
//! All sections carry `#[serde(default)]`, so a JSON file only needs the
//! keys it overrides.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Demographic, ThrillCategory};

// ── Per-subtype specs ─────────────────────────────────────────────────────────

/// Economics and throughput of one attraction subtype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttractionSpec {
    pub installation_cost: f64,
    pub ticket_price:      f64,
    /// Running cost accrued per tick since construction.
    pub operating_cost:    f64,
    /// Ride cycle length in ticks.
    pub duration:          u64,
    /// Visitors boarded per cycle.
    pub capacity:          usize,
    pub thrill:            ThrillCategory,
}

/// Economics and visitor-behaviour parameters of one concession subtype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConcessionSpec {
    pub installation_cost: f64,
    /// Running cost accrued per tick since construction.
    pub operating_cost:    f64,
    pub spend_mean:        f64,
    pub spend_sd:          f64,
    /// Dwell time in ticks.
    pub dwell_mean:        f64,
    pub dwell_sd:          f64,
    /// Chance that a passing visitor stops.
    pub stop_probability:  f64,
}

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed:        u64,
    pub width:       u32,
    pub height:      u32,
    /// Milliseconds of movement time per tick for the default pace clock.
    pub ms_per_tick: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self { seed: 42, width: 16, height: 16, ms_per_tick: 1_000 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitorSettings {
    /// World distance travelled per millisecond.
    pub speed:                 f32,
    /// Auto-spawn cap.  `0` disables the spawner.
    pub max_visitors:          usize,
    pub spawn_interval_min:    u64,
    pub spawn_interval_max:    u64,
    pub prob_adult:            f64,
    pub prob_kid:              f64,
    pub prob_elder:            f64,
    pub max_concession_visits: u32,
    /// Longest wait (ticks) a visitor accepts; rides estimating this or more
    /// are skipped.
    pub wait_tolerance:        u64,
}

impl Default for VisitorSettings {
    fn default() -> Self {
        Self {
            speed:                 0.0005,
            max_visitors:          10,
            spawn_interval_min:    3,
            spawn_interval_max:    10,
            prob_adult:            0.6,
            prob_kid:              0.2,
            prob_elder:            0.2,
            max_concession_visits: 3,
            wait_tolerance:        60,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// Max Manhattan distance between a building and a road for road access.
    pub max_road_search_distance: u32,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self { max_road_search_distance: 1 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadSettings {
    pub cost_per_tile: f64,
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self { cost_per_tile: 500.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractionSettings {
    /// Radius (from the grid centre) of the per-tick attraction query.
    pub search_distance: u32,
    pub subtypes:        BTreeMap<String, AttractionSpec>,
}

impl Default for AttractionSettings {
    fn default() -> Self {
        use ThrillCategory::{Family, Thrill};
        // (name, installation, ticket, operating, duration, capacity, thrill)
        let table = [
            ("circus-tent",     2000.0, 3.0, 0.10, 40, 40, Family),
            ("water-ride",      3000.0, 5.0, 0.20, 10, 20, Thrill),
            ("bumper-car",      2000.0, 5.0, 0.15,  3, 24, Thrill),
            ("ferris-wheel",    3500.0, 3.0, 0.20, 15, 20, Family),
            ("roundabout",      2500.0, 3.0, 0.10,  3, 10, Family),
            ("carousel",        2000.0, 3.0, 0.10,  5, 12, Family),
            ("swing-claw",      3000.0, 5.0, 0.20,  5, 16, Thrill),
            ("space-adventure", 2500.0, 3.0, 0.15,  5, 12, Thrill),
            ("rollercoaster",   3000.0, 5.0, 0.25,  3, 10, Thrill),
            ("arcade",          2000.0, 3.0, 0.05, 20, 20, Family),
        ];
        let subtypes = table
            .into_iter()
            .map(|(name, install, ticket, op, duration, capacity, thrill)| {
                (
                    name.to_string(),
                    AttractionSpec {
                        installation_cost: install,
                        ticket_price:      ticket,
                        operating_cost:    op,
                        duration,
                        capacity,
                        thrill,
                    },
                )
            })
            .collect();
        Self { search_distance: 100, subtypes }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcessionSettings {
    /// Radius (from the grid centre) of the per-tick concession query.
    pub search_distance: u32,
    pub subtypes:        BTreeMap<String, ConcessionSpec>,
}

impl Default for ConcessionSettings {
    fn default() -> Self {
        // (name, installation, operating, spend μ, spend σ, dwell μ, dwell σ, stop p)
        let table = [
            ("hot-dog",            200.0, 0.02,  2.0, 0.5,  1.0,  0.5, 0.3),
            ("burger",             300.0, 0.03,  7.0, 1.0,  5.0,  2.0, 0.2),
            ("cafe",               500.0, 0.05,  8.0, 2.0, 20.0,  8.0, 0.1),
            ("chinese-restaurant", 600.0, 0.06, 15.0, 4.0, 30.0, 10.0, 0.1),
            ("ice-cream",          200.0, 0.02,  1.0, 0.2,  1.0,  0.5, 0.3),
        ];
        let subtypes = table
            .into_iter()
            .map(|(name, install, op, sm, ss, dm, ds, p)| {
                (
                    name.to_string(),
                    ConcessionSpec {
                        installation_cost: install,
                        operating_cost:    op,
                        spend_mean:        sm,
                        spend_sd:          ss,
                        dwell_mean:        dm,
                        dwell_sd:          ds,
                        stop_probability:  p,
                    },
                )
            })
            .collect();
        Self { search_distance: 100, subtypes }
    }
}

// ── ParkConfig ────────────────────────────────────────────────────────────────

/// Immutable configuration snapshot for one park run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    pub sim:        SimSettings,
    pub visitor:    VisitorSettings,
    pub zone:       ZoneSettings,
    pub road:       RoadSettings,
    pub attraction: AttractionSettings,
    pub concession: ConcessionSettings,
}

impl ParkConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: ParkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn attraction(&self, subtype: &str) -> Option<&AttractionSpec> {
        self.attraction.subtypes.get(subtype)
    }

    pub fn concession(&self, subtype: &str) -> Option<&ConcessionSpec> {
        self.concession.subtypes.get(subtype)
    }

    /// Draw a demographic from the configured mix with a uniform `u ∈ [0, 1)`.
    /// Adults take the first band, kids the second, elders the rest.
    pub fn demographic_for(&self, u: f64) -> Demographic {
        let v = &self.visitor;
        if u < v.prob_adult {
            Demographic::Adult
        } else if u < v.prob_adult + v.prob_kid {
            Demographic::Kid
        } else {
            Demographic::Elder
        }
    }

    /// Reject configurations the engines cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        let v = &self.visitor;
        if self.sim.width == 0 || self.sim.height == 0 {
            return Err(CoreError::Config("grid dimensions must be non-zero".into()));
        }
        if !(v.speed > 0.0) {
            return Err(CoreError::Config(format!("visitor speed must be positive, got {}", v.speed)));
        }
        if v.spawn_interval_min > v.spawn_interval_max {
            return Err(CoreError::Config(format!(
                "spawn interval range is empty: {}..={}",
                v.spawn_interval_min, v.spawn_interval_max
            )));
        }
        let probs = [v.prob_adult, v.prob_kid, v.prob_elder];
        if probs.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(CoreError::Config("demographic probabilities must lie in [0, 1]".into()));
        }
        let total: f64 = probs.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(CoreError::Config(format!(
                "demographic probabilities must sum to 1, got {total}"
            )));
        }
        for (name, spec) in &self.attraction.subtypes {
            if spec.capacity == 0 {
                return Err(CoreError::Config(format!("attraction `{name}` has zero capacity")));
            }
        }
        for (name, spec) in &self.concession.subtypes {
            if !(0.0..=1.0).contains(&spec.stop_probability) {
                return Err(CoreError::Config(format!(
                    "concession `{name}` stop probability {} is outside [0, 1]",
                    spec.stop_probability
                )));
            }
        }
        Ok(())
    }
}
