//! Edge-cycle movement.
//!
//! A visitor crosses one edge per cycle.  Progress is the fraction of the
//! edge's travel time (`length / speed`) elapsed since the cycle started,
//! measured on the pace clock rather than in ticks, so motion stays smooth
//! however often the park is stepped.

use pk_core::WorldPoint;

const COMPLETE_EPSILON: f64 = 1e-6;

/// One edge traversal in progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeCycle {
    pub from:     WorldPoint,
    pub to:       WorldPoint,
    /// Pace-clock milliseconds at which the cycle (re)started.
    pub start_ms: u64,
}

impl EdgeCycle {
    pub fn new(from: WorldPoint, to: WorldPoint, start_ms: u64) -> Self {
        Self { from, to, start_ms }
    }

    /// Fraction of the edge covered at `now_ms`, in `[0, 1]`.  A zero-length
    /// edge is complete immediately.
    pub fn fraction(&self, now_ms: u64, speed: f32) -> f32 {
        let distance = self.from.distance(self.to);
        if distance <= f32::EPSILON || !(speed > 0.0) {
            return 1.0;
        }
        let duration_ms = f64::from(distance) / f64::from(speed);
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        let fraction = elapsed / duration_ms;
        // Float noise in `distance / speed` must not leave an edge at 0.9999.
        if fraction >= 1.0 - COMPLETE_EPSILON {
            1.0
        } else {
            fraction.max(0.0) as f32
        }
    }

    /// Interpolated world position at `now_ms`.
    pub fn position(&self, now_ms: u64, speed: f32) -> WorldPoint {
        self.from.lerp(self.to, self.fraction(now_ms, speed))
    }

    /// Start the cycle over; used when a paused visitor resumes.
    pub fn restart(&mut self, now_ms: u64) {
        self.start_ms = now_ms;
    }
}
