//! Domain records and persisted preference values.

mod club;
mod feedback;
mod geo;
mod preferences;
mod road_sections;
mod route;

pub use club::{Club, ClubId};
pub use feedback::{ConfidenceLevel, FeedbackRecord};
pub use geo::{BoundingBox, SUPPORTED_EXTENT};
pub use preferences::{FeedbackMode, HeatmapMode, MapLayer, MapModeState, ViewMode};
pub use road_sections::{RoadSectionRating, RoadSectionScore};
pub use route::Route;
