//! Remote read API.
//!
//! All endpoints are idempotent GETs. Aggregation (scores, confidence) is
//! done server-side; the client treats the results as opaque records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{
    BoundingBox, Club, ConfidenceLevel, FeedbackRecord, RoadSectionRating, RoadSectionScore,
};

/// Error type for remote reads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ApiError {
    /// Connection, DNS or TLS failure
    #[error("Transport error: {reason}")]
    Transport {
        /// Failure detail
        reason: String,
    },
    /// Request exceeded the configured timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },
    /// Non-success HTTP status
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },
    /// Response body did not match the expected shape
    #[error("Failed to decode response: {reason}")]
    Decode {
        /// Failure detail
        reason: String,
    },
    /// Request could not be built
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Failure detail
        reason: String,
    },
}

impl ApiError {
    /// Create a transport error
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}

/// The read endpoints the client core consumes.
#[async_trait]
pub trait RadziApiEffects: Send + Sync {
    /// Community feedback inside `bbox`, optionally filtered by confidence.
    async fn global_feedback(
        &self,
        bbox: BoundingBox,
        confidence_level: Option<ConfidenceLevel>,
    ) -> Result<Vec<FeedbackRecord>, ApiError>;

    /// The current user's road-section ratings inside `bbox`.
    async fn personal_road_sections(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<RoadSectionRating>, ApiError>;

    /// Community road-section scores inside `bbox`, optionally only
    /// sections with at least `min_rating_count` ratings.
    async fn community_road_sections(
        &self,
        bbox: BoundingBox,
        min_rating_count: Option<u32>,
    ) -> Result<Vec<RoadSectionScore>, ApiError>;

    /// The club a share code points to; `Ok(None)` when no club matches.
    async fn club_by_share_code(&self, code: &str) -> Result<Option<Club>, ApiError>;
}
