//! Park observer trait and the lifecycle events it receives.

use pk_agent::DisposeReason;
use pk_core::{AgentId, Demographic, GridPos, Tick};
use pk_venue::VenueKind;

/// How a visitor left the park.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Departure {
    /// Walked out through the entrance.
    Exited,
    /// Removed by the park.
    Disposed(DisposeReason),
}

/// Visitor lifecycle events.  A renderer reacts to these instead of the
/// park touching meshes or animations.
#[derive(Clone, Debug, PartialEq)]
pub enum ParkEvent {
    Spawned {
        agent:       AgentId,
        demographic: Demographic,
        at:          GridPos,
    },
    /// Joined an attraction line or sat down at a concession.
    Admitted {
        agent: AgentId,
        kind:  VenueKind,
        pos:   GridPos,
    },
    /// Handed back by a venue after paying `amount`.
    Released {
        agent:  AgentId,
        kind:   VenueKind,
        pos:    GridPos,
        amount: f64,
    },
    Disposed {
        agent:     AgentId,
        departure: Departure,
    },
}

/// Callbacks invoked by [`Park::step`][crate::Park::step].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Events raised between steps (by `bulldoze` or `spawn_visitor`) are held
/// and delivered with the next step's events.
///
/// # Example — admission counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Admissions(usize);
///
/// impl ParkObserver for Admissions {
///     fn on_event(&mut self, _tick: Tick, event: &ParkEvent) {
///         if matches!(event, ParkEvent::Admitted { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait ParkObserver {
    /// Called after the clock advanced, before any building steps.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per lifecycle event, in the order the events occurred.
    fn on_event(&mut self, _tick: Tick, _event: &ParkEvent) {}

    /// Called at the end of each tick with the number of visitors in the park.
    fn on_tick_end(&mut self, _tick: Tick, _visitors: usize) {}
}

/// A [`ParkObserver`] that does nothing.
pub struct NoopObserver;

impl ParkObserver for NoopObserver {}

/// Keeps every event; handy for tests and replays.
#[derive(Default, Debug)]
pub struct EventLog {
    pub events: Vec<(Tick, ParkEvent)>,
}

impl ParkObserver for EventLog {
    fn on_event(&mut self, tick: Tick, event: &ParkEvent) {
        self.events.push((tick, event.clone()));
    }
}
