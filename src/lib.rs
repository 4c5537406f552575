pub mod error;
pub mod geodesic;
pub mod gpx;
pub mod point;
pub mod report;
pub mod segment;
pub mod track;

pub use error::{Error, Result};
pub use point::GeoPoint;
pub use report::{AnalysisParams, Report};
pub use segment::{Segment, Summary, TimeWindow};
pub use track::Track;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
