//! Scripted read API with per-endpoint call counters.

use async_trait::async_trait;
use parking_lot::Mutex;
use radzi_core::effects::{ApiError, RadziApiEffects};
use radzi_core::types::{
    BoundingBox, Club, ConfidenceLevel, FeedbackRecord, RoadSectionRating, RoadSectionScore,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Number of calls each endpoint received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiCallCounts {
    /// `global_feedback`
    pub feedback: usize,
    /// `personal_road_sections`
    pub personal_sections: usize,
    /// `community_road_sections`
    pub community_sections: usize,
    /// `club_by_share_code`
    pub clubs: usize,
}

#[derive(Debug)]
struct Script {
    feedback: Result<Vec<FeedbackRecord>, ApiError>,
    personal_sections: Result<Vec<RoadSectionRating>, ApiError>,
    community_sections: Result<Vec<RoadSectionScore>, ApiError>,
    clubs: HashMap<String, Club>,
    club_error: Option<ApiError>,
    delay: Duration,
    counts: ApiCallCounts,
    feedback_args: Vec<(String, Option<ConfidenceLevel>)>,
    community_args: Vec<(String, Option<u32>)>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            feedback: Ok(Vec::new()),
            personal_sections: Ok(Vec::new()),
            community_sections: Ok(Vec::new()),
            clubs: HashMap::new(),
            club_error: None,
            delay: Duration::ZERO,
            counts: ApiCallCounts::default(),
            feedback_args: Vec::new(),
            community_args: Vec::new(),
        }
    }
}

/// Read API returning whatever the test scripted.
///
/// Responses can be changed between calls; the optional latency uses the
/// tokio clock.
#[derive(Debug, Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    /// All endpoints return empty lists; no clubs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every call only after `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.script.lock().delay = delay;
    }

    /// Script the feedback endpoint.
    pub fn set_feedback(&self, result: Result<Vec<FeedbackRecord>, ApiError>) {
        self.script.lock().feedback = result;
    }

    /// Script the personal road-section endpoint.
    pub fn set_personal_sections(&self, result: Result<Vec<RoadSectionRating>, ApiError>) {
        self.script.lock().personal_sections = result;
    }

    /// Script the community road-section endpoint.
    pub fn set_community_sections(&self, result: Result<Vec<RoadSectionScore>, ApiError>) {
        self.script.lock().community_sections = result;
    }

    /// Make `code` resolve to `club`.
    pub fn add_club(&self, code: impl Into<String>, club: Club) {
        self.script.lock().clubs.insert(code.into(), club);
    }

    /// Make every share-code lookup fail (or stop failing with `None`).
    pub fn set_club_error(&self, error: Option<ApiError>) {
        self.script.lock().club_error = error;
    }

    /// Calls received so far.
    pub fn counts(&self) -> ApiCallCounts {
        self.script.lock().counts
    }

    /// Arguments of every feedback call: canonical bbox text and filter.
    pub fn feedback_args(&self) -> Vec<(String, Option<ConfidenceLevel>)> {
        self.script.lock().feedback_args.clone()
    }

    /// Arguments of every community call: canonical bbox text and threshold.
    pub fn community_args(&self) -> Vec<(String, Option<u32>)> {
        self.script.lock().community_args.clone()
    }

    async fn latency(&self) {
        let delay = self.script.lock().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RadziApiEffects for ScriptedApi {
    async fn global_feedback(
        &self,
        bbox: BoundingBox,
        confidence_level: Option<ConfidenceLevel>,
    ) -> Result<Vec<FeedbackRecord>, ApiError> {
        {
            let mut script = self.script.lock();
            script.counts.feedback += 1;
            script
                .feedback_args
                .push((bbox.to_string(), confidence_level));
        }
        self.latency().await;
        self.script.lock().feedback.clone()
    }

    async fn personal_road_sections(
        &self,
        _bbox: BoundingBox,
    ) -> Result<Vec<RoadSectionRating>, ApiError> {
        self.script.lock().counts.personal_sections += 1;
        self.latency().await;
        self.script.lock().personal_sections.clone()
    }

    async fn community_road_sections(
        &self,
        bbox: BoundingBox,
        min_rating_count: Option<u32>,
    ) -> Result<Vec<RoadSectionScore>, ApiError> {
        {
            let mut script = self.script.lock();
            script.counts.community_sections += 1;
            script
                .community_args
                .push((bbox.to_string(), min_rating_count));
        }
        self.latency().await;
        self.script.lock().community_sections.clone()
    }

    async fn club_by_share_code(&self, code: &str) -> Result<Option<Club>, ApiError> {
        self.script.lock().counts.clubs += 1;
        self.latency().await;
        let script = self.script.lock();
        if let Some(err) = &script.club_error {
            return Err(err.clone());
        }
        Ok(script.clubs.get(code).cloned())
    }
}
