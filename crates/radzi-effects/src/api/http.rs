//! HTTP implementation of the read API.
//!
//! Plain JSON GETs against the Radzi backend. Bodies are decoded straight
//! into the `radzi-core` records; a 404 on the share-code lookup means "no
//! such club" rather than an error.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use radzi_core::config::ApiConfig;
use radzi_core::effects::{ApiError, RadziApiEffects};
use radzi_core::types::{
    BoundingBox, Club, ConfidenceLevel, FeedbackRecord, RoadSectionRating, RoadSectionScore,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Everything outside the RFC 3986 unreserved set is escaped, so a share
/// code always stays one path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// reqwest-backed API handler.
#[derive(Debug, Clone)]
pub struct HttpApiHandler {
    client: Client,
    base_url: String,
    timeout_ms: u64,
    bearer_token: Option<String>,
}

impl HttpApiHandler {
    /// Build a handler from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApiError::InvalidRequest {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Replace the bearer token sent with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_transport(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else if err.is_decode() {
            ApiError::decode(err.to_string())
        } else {
            ApiError::transport(err.to_string())
        }
    }

    async fn send(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        let mut request = self.client.get(&url).query(query);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(url = %url, "api request");
        request.send().await.map_err(|e| self.map_transport(e))
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(path, query).await?;
        self.decode(response).await
    }
}

#[async_trait]
impl RadziApiEffects for HttpApiHandler {
    async fn global_feedback(
        &self,
        bbox: BoundingBox,
        confidence_level: Option<ConfidenceLevel>,
    ) -> Result<Vec<FeedbackRecord>, ApiError> {
        let mut query = vec![("bbox", bbox.to_string())];
        if let Some(level) = confidence_level {
            query.push(("confidenceLevel", level.as_str().to_string()));
        }
        self.get_json("feedback/global", &query).await
    }

    async fn personal_road_sections(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<RoadSectionRating>, ApiError> {
        self.get_json("road-sections/personal", &[("bbox", bbox.to_string())])
            .await
    }

    async fn community_road_sections(
        &self,
        bbox: BoundingBox,
        min_rating_count: Option<u32>,
    ) -> Result<Vec<RoadSectionScore>, ApiError> {
        let mut query = vec![("bbox", bbox.to_string())];
        if let Some(min) = min_rating_count {
            query.push(("minRatingCount", min.to_string()));
        }
        self.get_json("road-sections/community", &query).await
    }

    async fn club_by_share_code(&self, code: &str) -> Result<Option<Club>, ApiError> {
        // dot segments are collapsed by URL parsing even when escaped
        if code == "." || code == ".." {
            return Ok(None);
        }
        let segment = utf8_percent_encode(code, PATH_SEGMENT_ENCODE_SET);
        let response = self.send(&format!("clubs/share/{segment}"), &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.decode(response).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radzi_core::types::{ClubId, SUPPORTED_EXTENT};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn handler_for(server: &MockServer) -> HttpApiHandler {
        let config = ApiConfig {
            base_url: format!("{}/", server.uri()),
            timeout_ms: 2_000,
            bearer_token: None,
        };
        HttpApiHandler::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn feedback_request_carries_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feedback/global"))
            .and(query_param("bbox", "-10,35,20,65"))
            .and(query_param("confidenceLevel", "high"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "fb-1",
                    "latitude": 52.23,
                    "longitude": 21.01,
                    "rating": 4.5,
                    "confidenceLevel": "high"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let records = handler_for(&server)
            .global_feedback(SUPPORTED_EXTENT, Some(ConfidenceLevel::High))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "fb-1");
        assert_eq!(records[0].confidence_level, ConfidenceLevel::High);
        assert_eq!(records[0].created_at, None);
    }

    #[tokio::test]
    async fn community_sections_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/road-sections/community"))
            .and(query_param("minRatingCount", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "sectionId": "rs-9",
                    "geometry": [[21.0, 52.2], [21.1, 52.3]],
                    "averageRating": 3.8,
                    "ratingCount": 12,
                    "confidenceLevel": "medium"
                }
            ])))
            .mount(&server)
            .await;

        let sections = handler_for(&server)
            .community_road_sections(SUPPORTED_EXTENT, Some(3))
            .await
            .unwrap();
        assert_eq!(sections[0].rating_count, 12);
        assert_eq!(sections[0].geometry.len(), 2);
    }

    #[tokio::test]
    async fn unknown_share_code_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clubs/share/NOPE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let club = handler_for(&server).club_by_share_code("NOPE").await.unwrap();
        assert_eq!(club, None);
    }

    #[tokio::test]
    async fn share_code_lookup_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clubs/share/ABC123"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 42, "name": "Warsaw Riders"})),
            )
            .mount(&server)
            .await;

        let club = handler_for(&server)
            .with_bearer_token("t0ken")
            .club_by_share_code("ABC123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(club.id, ClubId(42));
        assert_eq!(club.name, "Warsaw Riders");
    }

    #[tokio::test]
    async fn share_code_is_sent_as_one_escaped_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clubs/share/AB"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Other"})),
            )
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/clubs/share/AB%23CD%3Fx%3D1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "Hash Club"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/clubs/share/a%2Fb%25c"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 43, "name": "Slash Club"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let handler = handler_for(&server);
        let club = handler.club_by_share_code("AB#CD?x=1").await.unwrap().unwrap();
        assert_eq!(club.id, ClubId(42));

        let club = handler.club_by_share_code("a/b%c").await.unwrap().unwrap();
        assert_eq!(club.id, ClubId(43));
    }

    #[tokio::test]
    async fn dot_segment_codes_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let handler = handler_for(&server);
        assert_eq!(handler.club_by_share_code("..").await.unwrap(), None);
        assert_eq!(handler.club_by_share_code(".").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_errors_surface_as_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/road-sections/personal"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = handler_for(&server)
            .personal_road_sections(SUPPORTED_EXTENT)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/road-sections/personal"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
            .mount(&server)
            .await;

        let err = handler_for(&server)
            .personal_road_sections(SUPPORTED_EXTENT)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
