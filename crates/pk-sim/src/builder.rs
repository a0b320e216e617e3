//! Fluent builder for constructing a [`Park`].

use std::collections::HashSet;

use pk_agent::{UniformPolicy, VisitorPolicy, VisitorStore};
use pk_core::{PaceClock, ParkConfig, SimClock, SimRng, TickPace};
use pk_spatial::{Grid, LaneGraph};

use crate::stats::ParkStats;
use crate::{Park, SequentialVisuals, SimResult, VisualFactory};

/// Fluent builder for [`Park<P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                  |
/// |-----------------|------------------------------------------|
/// | `.policy(p)`    | [`UniformPolicy`]                        |
/// | `.pace(c)`      | `TickPace::new(config.sim.ms_per_tick)`  |
/// | `.visuals(f)`   | [`SequentialVisuals`]                    |
///
/// # Example
///
/// ```rust,ignore
/// let mut park = ParkBuilder::new(ParkConfig::default()).build()?;
/// park.place_building(GridPos::new(8, 15), BuildingKind::Entrance, "")?;
/// park.run_ticks(600, &mut NoopObserver);
/// ```
pub struct ParkBuilder<P: VisitorPolicy = UniformPolicy> {
    config:  ParkConfig,
    policy:  P,
    pace:    Option<Box<dyn PaceClock>>,
    visuals: Option<Box<dyn VisualFactory>>,
}

impl ParkBuilder<UniformPolicy> {
    pub fn new(config: ParkConfig) -> Self {
        Self { config, policy: UniformPolicy, pace: None, visuals: None }
    }
}

impl<P: VisitorPolicy> ParkBuilder<P> {
    /// Replace the visitor decision policy.
    pub fn policy<Q: VisitorPolicy>(self, policy: Q) -> ParkBuilder<Q> {
        ParkBuilder { config: self.config, policy, pace: self.pace, visuals: self.visuals }
    }

    /// Supply the millisecond source for visitor movement.
    pub fn pace(mut self, pace: impl PaceClock + 'static) -> Self {
        self.pace = Some(Box::new(pace));
        self
    }

    /// Supply the rendering collaborator.
    pub fn visuals(mut self, visuals: impl VisualFactory + 'static) -> Self {
        self.visuals = Some(Box::new(visuals));
        self
    }

    /// Validate the configuration and return an empty park at tick 0.
    pub fn build(self) -> SimResult<Park<P>> {
        self.config.validate()?;
        let sim = &self.config.sim;
        let grid = Grid::new(sim.width, sim.height)?;
        let graph = LaneGraph::new(sim.width, sim.height);
        let pace = self.pace.unwrap_or_else(|| Box::new(TickPace::new(sim.ms_per_tick)));
        let visuals = self.visuals.unwrap_or_else(|| Box::new(SequentialVisuals::default()));

        tracing::debug!(width = sim.width, height = sim.height, seed = sim.seed, "park built");
        Ok(Park {
            clock:      SimClock::new(),
            grid,
            graph,
            visitors:   VisitorStore::new(sim.seed),
            rng:        SimRng::new(sim.seed),
            policy:     self.policy,
            pace,
            visuals,
            stats:      ParkStats::default(),
            next_spawn: None,
            events:     Vec::new(),
            reported:   HashSet::new(),
            config:     self.config,
        })
    }
}
