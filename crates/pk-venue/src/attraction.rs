//! Ride engine: a two-state capacity/duration cycle.
//!
//! ```text
//!            waiting non-empty            now >= last_run + duration
//!   Idle ─────────────────────────▶ Operating ─────────────────────────▶ Idle
//!        board min(waiting, capacity)            release every loaded rider
//! ```
//!
//! Within one [`Attraction::step`] completion is checked before boarding, so
//! a ride that finishes at tick `t` boards its next batch at tick `t` too.

use std::collections::VecDeque;
use std::fmt;

use pk_core::{AgentId, AttractionSpec, GridPos, Tick};

use crate::{Release, VenueKind};

/// Operating state of a ride.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum RideState {
    #[default]
    Idle,
    Operating,
}

impl RideState {
    pub fn as_str(self) -> &'static str {
        match self {
            RideState::Idle      => "idle",
            RideState::Operating => "operating",
        }
    }
}

/// A ride and its two FIFO queues.
#[derive(Clone, Debug)]
pub struct Attraction {
    pub subtype:       String,
    pub spec:          AttractionSpec,
    pub state:         RideState,
    waiting:           VecDeque<AgentId>,
    loaded:            Vec<AgentId>,
    pub revenue:       f64,
    pub ridership:     u64,
    /// Accrued cost as of the last step.
    pub cost:          f64,
    pub last_run:      Tick,
    /// Wait estimate as of the last [`update_wait_estimate`](Self::update_wait_estimate).
    pub wait_estimate: u64,
    built_at:          Tick,
}

impl Attraction {
    pub fn new(subtype: impl Into<String>, spec: AttractionSpec, built_at: Tick) -> Self {
        let cost = spec.installation_cost;
        Self {
            subtype: subtype.into(),
            spec,
            state: RideState::Idle,
            waiting: VecDeque::new(),
            loaded: Vec::new(),
            revenue: 0.0,
            ridership: 0,
            cost,
            last_run: built_at,
            wait_estimate: 0,
            built_at,
        }
    }

    // ── Queue access ──────────────────────────────────────────────────────

    /// Visitors in line, earliest first.
    pub fn waiting(&self) -> impl ExactSizeIterator<Item = AgentId> + '_ {
        self.waiting.iter().copied()
    }

    /// Visitors currently on the ride.
    pub fn loaded(&self) -> &[AgentId] {
        &self.loaded
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// `true` if `agent` is waiting or riding.
    pub fn holds(&self, agent: AgentId) -> bool {
        self.loaded.contains(&agent) || self.waiting.contains(&agent)
    }

    /// Join the back of the line.  A visitor already in either queue is not
    /// added twice; returns `false` in that case.
    pub fn enqueue(&mut self, agent: AgentId) -> bool {
        if self.holds(agent) {
            return false;
        }
        self.waiting.push_back(agent);
        true
    }

    // ── Engine ────────────────────────────────────────────────────────────

    /// Advance the ride to `now`.  Returns the riders released by a cycle
    /// that completed this step.
    pub fn step(&mut self, now: Tick, pos: GridPos) -> Vec<Release> {
        self.cost = self.cost_at(now);

        let mut released = Vec::new();
        if self.state == RideState::Operating && now >= self.last_run + self.spec.duration {
            released = self.release_loaded(pos);
            self.state = RideState::Idle;
        }

        if self.state == RideState::Idle && !self.waiting.is_empty() {
            let batch = self.waiting.len().min(self.spec.capacity);
            self.loaded.extend(self.waiting.drain(..batch));
            self.last_run = now;
            self.state = RideState::Operating;
            tracing::trace!(subtype = %self.subtype, %pos, boarded = batch, "ride started");
        }

        released
    }

    /// Empty both queues through the normal release path.  Riders first,
    /// then the line in order.
    pub fn dispose(&mut self, pos: GridPos) -> Vec<Release> {
        let mut released = self.release_loaded(pos);
        let line: Vec<AgentId> = self.waiting.drain(..).collect();
        released.extend(line.into_iter().map(|agent| self.release_one(agent, pos)));
        self.state = RideState::Idle;
        released
    }

    fn release_loaded(&mut self, pos: GridPos) -> Vec<Release> {
        let riders = std::mem::take(&mut self.loaded);
        riders
            .into_iter()
            .map(|agent| self.release_one(agent, pos))
            .collect()
    }

    fn release_one(&mut self, agent: AgentId, pos: GridPos) -> Release {
        self.revenue += self.spec.ticket_price;
        self.ridership += 1;
        Release {
            agent,
            kind:    VenueKind::Attraction,
            pos,
            subtype: self.subtype.clone(),
            amount:  self.spec.ticket_price,
        }
    }

    // ── Estimates and accounting ──────────────────────────────────────────

    /// Ticks a visitor joining the line now would wait before boarding.
    pub fn wait_time(&self, now: Tick) -> u64 {
        let duration = self.spec.duration;
        let full_batches = (self.waiting.len() / self.spec.capacity.max(1)) as u64;
        let queued = full_batches * duration;
        match self.state {
            RideState::Idle => queued,
            RideState::Operating => {
                let remaining = duration.saturating_sub(now.since(self.last_run));
                remaining + queued
            }
        }
    }

    /// Refresh and return [`wait_estimate`](Self::wait_estimate).
    pub fn update_wait_estimate(&mut self, now: Tick) -> u64 {
        self.wait_estimate = self.wait_time(now);
        self.wait_estimate
    }

    /// `installation + elapsed × operating rate`.
    pub fn cost_at(&self, now: Tick) -> f64 {
        self.spec.installation_cost + now.since(self.built_at) as f64 * self.spec.operating_cost
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.cost
    }
}

impl fmt::Display for Attraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} | queue {} | riding {}/{} | riders {} | revenue ${:.2} | cost ${:.2}",
            self.subtype,
            self.spec.thrill,
            self.state.as_str(),
            self.waiting.len(),
            self.loaded.len(),
            self.spec.capacity,
            self.ridership,
            self.revenue,
            self.cost,
        )
    }
}
