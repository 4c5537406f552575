//! Error taxonomy shared by the metric core and the GPX collaborator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("need at least {required} point(s), got {actual}")]
    InsufficientPoints { required: usize, actual: usize },
    #[error("time span is zero or negative")]
    DegenerateDuration,
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("point {index} has no elevation")]
    MissingElevation { index: usize },
    #[error("point {index} has no timestamp")]
    MissingTimestamp { index: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("GPX error: {0}")]
    Gpx(#[from] ::gpx::errors::GpxError),
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
