//! Query policies for the Radzi read endpoints
//!
//! Each policy fixes the cache key shape, the staleness window and the
//! enable gate of one remote read. Screens call these instead of the API
//! directly.

use radzi_core::config::CacheConfig;
use radzi_core::effects::RadziApiEffects;
use radzi_core::types::{
    BoundingBox, Club, ConfidenceLevel, FeedbackRecord, RoadSectionRating, RoadSectionScore,
    SUPPORTED_EXTENT,
};
use radzi_core::{CacheKey, RadziError};
use std::sync::Arc;
use std::time::Duration;

use super::cache::{QueryCache, QueryEntry, QueryOptions};

// ─────────────────────────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────────────────────────

/// `["feedback", "global", {bbox, confidence_level}]`
pub fn feedback_key(bbox: Option<BoundingBox>, confidence_level: Option<ConfidenceLevel>) -> CacheKey {
    CacheKey::new("feedback", "global")
        .with_optional_param("bbox", bbox)
        .with_optional_param("confidence_level", confidence_level)
}

/// `["road_sections", "personal", {bbox}]`
pub fn personal_sections_key() -> CacheKey {
    CacheKey::new("road_sections", "personal").with_param("bbox", SUPPORTED_EXTENT)
}

/// `["road_sections", "community", {bbox, min_rating_count}]`
pub fn community_sections_key(min_rating_count: Option<u32>) -> CacheKey {
    CacheKey::new("road_sections", "community")
        .with_param("bbox", SUPPORTED_EXTENT)
        .with_optional_param("min_rating_count", min_rating_count)
}

/// `["clubs", "share_code", {code}]`
pub fn club_share_code_key(code: &str) -> CacheKey {
    CacheKey::new("clubs", "share_code").with_param("code", code)
}

// ─────────────────────────────────────────────────────────────────────────────
// Policies
// ─────────────────────────────────────────────────────────────────────────────

/// Staleness windows of the four policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessWindows {
    /// Bounding-box feedback
    pub feedback: Duration,
    /// Personal and community road sections
    pub road_sections: Duration,
    /// Club lookup by share code
    pub clubs: Duration,
}

impl Default for StalenessWindows {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for StalenessWindows {
    fn from(config: &CacheConfig) -> Self {
        Self {
            feedback: config.feedback_stale_after(),
            road_sections: config.road_sections_stale_after(),
            clubs: config.clubs_stale_after(),
        }
    }
}

/// The read endpoints wrapped in their cache policies.
#[derive(Clone)]
pub struct QueryPolicies {
    cache: QueryCache,
    api: Arc<dyn RadziApiEffects>,
    windows: StalenessWindows,
}

impl std::fmt::Debug for QueryPolicies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPolicies")
            .field("cache", &self.cache)
            .field("windows", &self.windows)
            .finish_non_exhaustive()
    }
}

impl QueryPolicies {
    /// Bind the policies to a cache and an API handler.
    pub fn new(cache: QueryCache, api: Arc<dyn RadziApiEffects>, windows: StalenessWindows) -> Self {
        Self { cache, api, windows }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Community feedback for the visible map region.
    ///
    /// Disabled until the map has reported a region (`bbox == None`).
    pub async fn global_feedback(
        &self,
        bbox: Option<BoundingBox>,
        confidence_level: Option<ConfidenceLevel>,
    ) -> QueryEntry<Vec<FeedbackRecord>> {
        let key = feedback_key(bbox, confidence_level);
        let options = QueryOptions::stale_after(self.windows.feedback).enabled(bbox.is_some());
        let api = Arc::clone(&self.api);
        self.cache
            .query(&key, options, || async move {
                let bbox = bbox.ok_or_else(|| RadziError::invalid("feedback query without a region"))?;
                Ok(api.global_feedback(bbox, confidence_level).await?)
            })
            .await
    }

    /// The signed-in user's road-section ratings over the supported extent.
    pub async fn personal_road_sections(&self) -> QueryEntry<Vec<RoadSectionRating>> {
        let options = QueryOptions::stale_after(self.windows.road_sections);
        let api = Arc::clone(&self.api);
        self.cache
            .query(&personal_sections_key(), options, || async move {
                Ok(api.personal_road_sections(SUPPORTED_EXTENT).await?)
            })
            .await
    }

    /// Community road-section scores over the supported extent.
    pub async fn community_road_sections(
        &self,
        min_rating_count: Option<u32>,
    ) -> QueryEntry<Vec<RoadSectionScore>> {
        let key = community_sections_key(min_rating_count);
        let options = QueryOptions::stale_after(self.windows.road_sections);
        let api = Arc::clone(&self.api);
        self.cache
            .query(&key, options, || async move {
                Ok(api
                    .community_road_sections(SUPPORTED_EXTENT, min_rating_count)
                    .await?)
            })
            .await
    }

    /// Club a share code points to. `data == Some(None)` means no such club.
    pub async fn club_by_share_code(&self, code: &str) -> QueryEntry<Option<Club>> {
        let key = club_share_code_key(code);
        let options = QueryOptions::stale_after(self.windows.clubs);
        let api = Arc::clone(&self.api);
        let code = code.to_string();
        self.cache
            .query(&key, options, || async move {
                Ok(api.club_by_share_code(&code).await?)
            })
            .await
    }
}
