use pk_core::CoreError;
use pk_spatial::SpatialError;
use pk_venue::VenueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("park configuration error: {0}")]
    Core(#[from] CoreError),

    #[error("grid error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("building error: {0}")]
    Venue(#[from] VenueError),
}

pub type SimResult<T> = Result<T, SimError>;
