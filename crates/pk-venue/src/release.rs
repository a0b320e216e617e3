//! Records emitted when a venue lets a visitor go.

use pk_core::{AgentId, GridPos};

/// Which engine produced a [`Release`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum VenueKind {
    Attraction,
    Concession,
}

/// A visitor handed back by an attraction or concession.
///
/// The venue has already booked `amount` as revenue; the receiver must add
/// it to the visitor's spend, record the visit, unpause the visitor and (for
/// attractions) give it a new destination.
#[derive(Clone, Debug, PartialEq)]
pub struct Release {
    pub agent:   AgentId,
    pub kind:    VenueKind,
    /// Tile of the venue.
    pub pos:     GridPos,
    /// Venue subtype (the visited-list key for attractions).
    pub subtype: String,
    /// Ticket price or meal cost charged.
    pub amount:  f64,
}
