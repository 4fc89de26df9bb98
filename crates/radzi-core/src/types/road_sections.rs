//! Road-section ratings and community scores.

use serde::{Deserialize, Serialize};

use super::ConfidenceLevel;

/// A road section rated by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadSectionRating {
    /// Server identifier of the section
    pub section_id: String,
    /// Polyline as `[lon, lat]` pairs
    pub geometry: Vec<[f64; 2]>,
    /// The user's rating
    pub rating: f64,
    /// When the rating was given, RFC 3339
    #[serde(default)]
    pub rated_at: Option<String>,
}

/// Aggregated community score for a road section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadSectionScore {
    /// Server identifier of the section
    pub section_id: String,
    /// Polyline as `[lon, lat]` pairs
    pub geometry: Vec<[f64; 2]>,
    /// Mean rating across contributors
    pub average_rating: f64,
    /// Number of ratings aggregated
    pub rating_count: u32,
    /// Server-assigned confidence
    pub confidence_level: ConfidenceLevel,
}
