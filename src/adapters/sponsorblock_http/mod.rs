//! SponsorBlock HTTP adapter for skip segment lookup
//!
//! Every failure mode collapses to an empty segment list: unknown videos,
//! non-YouTube URLs, error statuses, timeouts and malformed bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::Segment;
use crate::ports::SegmentSourcePort;
use crate::utils::video_id::resolve_video_id;

/// Public SponsorBlock instance
pub const DEFAULT_API: &str = "https://sponsor.ajay.app";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the SponsorBlock `skipSegments` endpoint
pub struct SponsorBlockHttpAdapter {
    client: reqwest::Client,
    api: String,
}

impl SponsorBlockHttpAdapter {
    /// Create a new adapter against `api` (no trailing slash needed)
    pub fn new(api: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skipcut/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::ConfigFail(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api: api.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/skipSegments", self.api)
    }

    async fn request(&self, video_id: &str, categories: &[&str]) -> Result<Vec<Segment>, reqwest::Error> {
        let categories = serde_json::to_string(categories).unwrap_or_else(|_| "[]".to_string());
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("videoID", video_id), ("categories", categories.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No segments submitted for {}", video_id);
            return Ok(Vec::new());
        }
        if status == StatusCode::BAD_REQUEST
            || status == StatusCode::FORBIDDEN
            || status.is_server_error()
        {
            warn!("Segment lookup for {} answered {}", video_id, status);
            return Ok(Vec::new());
        }

        let body: Value = response.error_for_status()?.json().await?;
        Ok(parse_skip_segments(&body))
    }
}

/// Extract well-formed segments from a `skipSegments` response body.
///
/// Entries need a `segment` array with at least two numbers and a string
/// `category`; anything else is skipped. A body that is not a list yields
/// nothing.
pub fn parse_skip_segments(body: &Value) -> Vec<Segment> {
    let entries = match body.as_array() {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    entries
        .iter()
        .filter_map(|entry| {
            let bounds = entry.get("segment")?.as_array()?;
            let category = entry.get("category")?.as_str()?;
            if bounds.len() < 2 {
                return None;
            }
            let start = number(&bounds[0])?;
            let end = number(&bounds[1])?;
            Some(Segment::new(start, end, category)).filter(Segment::is_well_formed)
        })
        .collect()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl SegmentSourcePort for SponsorBlockHttpAdapter {
    async fn fetch_segments(&self, url_or_id: &str, categories: &[&str]) -> Vec<Segment> {
        let video_id = match resolve_video_id(url_or_id) {
            Some(id) => id,
            None => {
                debug!("No YouTube video id in {}, skipping segment lookup", url_or_id);
                return Vec::new();
            }
        };

        match self.request(&video_id, categories).await {
            Ok(segments) => {
                info!("Fetched {} segments for {}", segments.len(), video_id);
                segments
            }
            Err(e) if e.is_timeout() => {
                warn!("Segment lookup for {} timed out", video_id);
                Vec::new()
            }
            Err(e) => {
                warn!("Segment lookup for {} failed: {}", video_id, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEO_ID: &str = "dQw4w9WgXcQ";

    fn adapter(server: &MockServer) -> SponsorBlockHttpAdapter {
        SponsorBlockHttpAdapter::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_skip_segments_filters_malformed() {
        let body = json!([
            {"segment": [10.5, 20.0], "category": "sponsor", "UUID": "a"},
            {"segment": ["30", "35.5"], "category": "intro"},
            {"segment": [1.0], "category": "outro"},
            {"segment": [5.0, 6.0]},
            {"segment": "bad", "category": "sponsor"},
            {"segment": [9.0, 3.0], "category": "preview"},
            {"segment": [null, 3.0], "category": "preview"},
            "junk"
        ]);
        let segments = parse_skip_segments(&body);
        assert_eq!(
            segments,
            vec![
                Segment::new(10.5, 20.0, "sponsor"),
                Segment::new(30.0, 35.5, "intro"),
            ]
        );
    }

    #[test]
    fn test_parse_skip_segments_non_list() {
        assert!(parse_skip_segments(&json!({"error": "nope"})).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_segments_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/skipSegments"))
            .and(query_param("videoID", VIDEO_ID))
            .and(query_param("categories", "[\"sponsor\",\"intro\"]"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"segment": [0.0, 8.0], "category": "intro"},
                {"segment": [60.0, 95.0], "category": "sponsor"}
            ])))
            .mount(&server)
            .await;

        let segments = adapter(&server)
            .fetch_segments(
                &format!("https://www.youtube.com/watch?v={}", VIDEO_ID),
                &["sponsor", "intro"],
            )
            .await;
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].category, "sponsor");
    }

    #[tokio::test]
    async fn test_fetch_segments_not_found_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/skipSegments"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(adapter(&server).fetch_segments(VIDEO_ID, &["sponsor"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_segments_server_error_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/skipSegments"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(adapter(&server).fetch_segments(VIDEO_ID, &["sponsor"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_segments_invalid_json_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/skipSegments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(adapter(&server).fetch_segments(VIDEO_ID, &["sponsor"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_segments_timeout_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let adapter = SponsorBlockHttpAdapter::new(server.uri(), Duration::from_millis(50)).unwrap();
        assert!(adapter.fetch_segments(VIDEO_ID, &["sponsor"]).await.is_empty());
    }

    #[tokio::test]
    async fn test_non_youtube_url_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"segment": [0.0, 8.0], "category": "intro"}
            ])))
            .expect(0)
            .mount(&server)
            .await;

        assert!(adapter(&server)
            .fetch_segments("https://vimeo.com/123456", &["sponsor"])
            .await
            .is_empty());
    }
}
