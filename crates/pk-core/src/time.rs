//! Simulation time model.
//!
//! # Design
//!
//! Park time is a monotonically increasing `Tick` counter; one tick is one
//! simulated second and every ride duration, dwell time and spawn interval
//! in the configuration is expressed in ticks.
//!
//! Visitor *movement* is paced separately, in milliseconds, through the
//! [`PaceClock`] trait.  The default [`TickPace`] derives milliseconds from
//! the tick so runs stay fully deterministic; a renderer can plug in a
//! wall-clock implementation to get smooth inter-tick motion.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The park's clock.  Holds no heap data.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    /// The current tick — advanced by `SimClock::advance()` at the start of
    /// every park step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick and return the new tick.
    #[inline]
    pub fn advance(&mut self) -> Tick {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.current_tick
    }

    /// Break elapsed park time into (hour, minute, second).
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let secs = self.current_tick.0;
        let hours = secs / 3_600;
        let minutes = ((secs % 3_600) / 60) as u32;
        let seconds = (secs % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}

// ── Movement pacing ───────────────────────────────────────────────────────────

/// Source of the millisecond timestamps that drive visitor edge cycles.
pub trait PaceClock {
    /// Milliseconds at park tick `tick`.  Must be non-decreasing in `tick`.
    fn now_ms(&self, tick: Tick) -> u64;
}

/// Deterministic pacing: `tick * ms_per_tick`.
#[derive(Copy, Clone, Debug)]
pub struct TickPace {
    pub ms_per_tick: u64,
}

impl TickPace {
    pub fn new(ms_per_tick: u64) -> Self {
        Self { ms_per_tick }
    }
}

impl Default for TickPace {
    fn default() -> Self {
        Self { ms_per_tick: 1_000 }
    }
}

impl PaceClock for TickPace {
    #[inline]
    fn now_ms(&self, tick: Tick) -> u64 {
        tick.0.saturating_mul(self.ms_per_tick)
    }
}
