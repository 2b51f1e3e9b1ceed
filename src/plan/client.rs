use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::plan::model::{PlanPayload, SessionConfig};

pub const GENERATE_PATH: &str = "/api/generate-plan";

/// Why a generation attempt produced no plan.
///
/// `Display` is the bare message; the loading view prefixes it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Network failure, unreadable body, or a non-JSON response.
    #[error("{0}")]
    Transport(String),

    /// The service answered but reported an `error` in the payload.
    #[error("{0}")]
    Rejected(String),
}

pub trait PlanGenerator: Send + Sync {
    fn generate(&self, config: &SessionConfig) -> Result<PlanPayload, GenerationError>;
}

/// Map a finished HTTP exchange to a plan. The status code alone never fails
/// a request: a JSON body with an `error` field is what signals rejection.
pub fn parse_response(status: u16, body: &str) -> Result<PlanPayload, GenerationError> {
    match serde_json::from_str::<PlanPayload>(body) {
        Ok(payload) => match payload.failure() {
            Some(message) => Err(GenerationError::Rejected(message.to_string())),
            None => Ok(payload),
        },
        Err(e) if !(200..300).contains(&status) => {
            debug!("unparseable body with status {status}: {e}");
            Err(GenerationError::Transport(format!("HTTP {status}")))
        }
        Err(e) => Err(GenerationError::Transport(format!("invalid response: {e}"))),
    }
}

pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/'))
}

pub struct HttpPlanClient {
    url: String,
    #[cfg_attr(not(feature = "network"), allow(dead_code))]
    timeout: Duration,
}

impl HttpPlanClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            url: endpoint_url(base_url),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "network")]
impl PlanGenerator for HttpPlanClient {
    fn generate(&self, config: &SessionConfig) -> Result<PlanPayload, GenerationError> {
        tracing::info!(topic = %config.topic, url = %self.url, "requesting plan");
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let response = client
            .post(&self.url)
            .json(config)
            .send()
            .map_err(|e| {
                warn!("plan request failed: {e}");
                GenerationError::Transport(e.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let result = parse_response(status, &body);
        match &result {
            Ok(payload) => tracing::info!(status, units = payload.units().len(), "plan received"),
            Err(e) => warn!(status, "plan rejected: {e}"),
        }
        result
    }
}

#[cfg(not(feature = "network"))]
impl PlanGenerator for HttpPlanClient {
    fn generate(&self, _config: &SessionConfig) -> Result<PlanPayload, GenerationError> {
        warn!(url = %self.url, "built without network support");
        Err(GenerationError::Transport(
            "network support is disabled in this build".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_fails_even_on_http_success() {
        let err = parse_response(200, r#"{"error":"quota exceeded"}"#).unwrap_err();
        assert_eq!(err, GenerationError::Rejected("quota exceeded".to_string()));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_error_body_on_http_failure_keeps_service_message() {
        let err = parse_response(500, r#"{"error":"Server missing API Key."}"#).unwrap_err();
        assert_eq!(err.to_string(), "Server missing API Key.");
    }

    #[test]
    fn test_non_json_body_is_transport_error() {
        let err = parse_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err, GenerationError::Transport("HTTP 502".to_string()));

        let err = parse_response(200, "not json").unwrap_err();
        assert!(matches!(err, GenerationError::Transport(ref m) if m.starts_with("invalid response")));
    }

    #[test]
    fn test_plan_body_parses() {
        let payload = parse_response(
            200,
            r#"{"plan":[{"unit_title":"Unit 1","duration":"2h","description":"Intro"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.units().len(), 1);
        assert_eq!(payload.units()[0].duration.as_deref(), Some("2h"));
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        assert_eq!(
            endpoint_url("https://example.test/"),
            "https://example.test/api/generate-plan"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:5001"),
            "http://127.0.0.1:5001/api/generate-plan"
        );
    }
}
