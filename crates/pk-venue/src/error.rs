use thiserror::Error;

use crate::BuildingKind;

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("`{0}` is not a recognized building type")]
    UnknownKind(String),

    #[error("`{subtype}` is not a configured {kind} subtype")]
    UnknownSubtype {
        kind:    BuildingKind,
        subtype: String,
    },

    #[error("no {0} subtypes are configured")]
    NoSubtypes(BuildingKind),
}

pub type VenueResult<T> = Result<T, VenueError>;
