//! Community feedback records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RadziError;

/// Quality tag the server attaches to aggregated feedback.
///
/// Opaque to the client beyond acting as a query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Few or inconsistent ratings
    Low,
    /// Moderate agreement
    Medium,
    /// Strong agreement across many ratings
    High,
}

impl ConfidenceLevel {
    /// Wire name used in query strings and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = RadziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(RadziError::invalid(format!(
                "unknown confidence level: {other}"
            ))),
        }
    }
}

/// A single piece of community feedback placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Server identifier
    pub id: String,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Rating on the service's scale
    pub rating: f64,
    /// Aggregation confidence
    pub confidence_level: ConfidenceLevel,
    /// Creation time, RFC 3339
    #[serde(default)]
    pub created_at: Option<String>,
}
