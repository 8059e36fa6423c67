//! Blocking JSON-over-HTTP client shared by the API sources

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

use super::SourceError;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth JSON client for one upstream service
#[derive(Debug, Clone)]
pub struct ApiClient {
    service: &'static str,
    client: Client,
    user: String,
    secret: String,
}

impl ApiClient {
    /// Build a client with a per-request `timeout`
    ///
    /// Fails with [`SourceError::Transport`] when the HTTP stack cannot be
    /// initialised (e.g. no usable TLS backend).
    pub fn new(
        service: &'static str,
        user: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport {
                service,
                message: e.to_string(),
                context: "building HTTP client".to_string(),
            })?;
        Ok(Self {
            service,
            client,
            user: user.into(),
            secret: secret.into(),
        })
    }

    /// GET `url` and decode the JSON body
    ///
    /// `context` describes the request for diagnostics (the query, the plan
    /// id...). Non-success statuses become [`SourceError::Upstream`].
    pub fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<Value, SourceError> {
        tracing::debug!(service = self.service, %url, "GET");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.secret))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .map_err(|e| SourceError::Transport {
                service: self.service,
                message: e.to_string(),
                context: context.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| SourceError::Transport {
            service: self.service,
            message: e.to_string(),
            context: context.to_string(),
        })?;

        if !status.is_success() {
            return Err(SourceError::Upstream {
                service: self.service,
                status: status.as_u16(),
                message: upstream_message(&body, status.canonical_reason()),
                context: context.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            service: self.service,
            message: e.to_string(),
            context: context.to_string(),
        })
    }
}

/// Pull a human-readable message out of an error body
///
/// Jira answers `{"errorMessages": [...]}`, TestRail answers `{"error": "..."}`.
pub(crate) fn upstream_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(messages) = json.get("errorMessages").and_then(Value::as_array) {
            let joined = messages
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return joined;
            }
        }
        if let Some(error) = json.get("error").and_then(Value::as_str) {
            return error.to_string();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 500 {
        return trimmed.to_string();
    }
    reason.unwrap_or("request failed").to_string()
}
