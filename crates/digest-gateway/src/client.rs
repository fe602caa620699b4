//! Shared HTTP plumbing for the backend gateways.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use digest_core::{Error, Result};

use crate::config::GatewayConfig;

/// Thin wrapper over a configured `reqwest::Client`.
///
/// Cheap to clone; all gateways built from the same config can share one.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    config: Arc<GatewayConfig>,
}

impl BackendClient {
    /// Build a client from validated configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Backend client ready");

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// POST a JSON body and return the response once its status is known to
    /// be a success. Failures are returned as plain messages so each gateway
    /// can wrap them in its own error variant.
    pub(crate) async fn post(
        &self,
        path: &'static str,
        body: &(impl Serialize + ?Sized),
    ) -> std::result::Result<Response, String> {
        let start = Instant::now();
        let response = self
            .client
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        debug!(
            endpoint = path,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Backend responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Backend returned {}: {}", status, body));
        }

        Ok(response)
    }

    /// POST a JSON body and read the full response as text.
    ///
    /// A 200 response whose body is a JSON object with an `error` key is
    /// treated as a failure; the backend reports handler exceptions that way.
    pub(crate) async fn post_text(
        &self,
        path: &'static str,
        body: &(impl Serialize + ?Sized),
    ) -> std::result::Result<String, String> {
        let response = self.post(path, body).await?;
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        debug!(endpoint = path, response_len = text.len(), "Read response body");

        if let Some(message) = error_body(&text) {
            return Err(message);
        }
        Ok(text)
    }
}

/// Extract the message from an `{"error": ...}` body, if that is what `text` is.
pub(crate) fn error_body(text: &str) -> Option<String> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
    match value.get("error")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_detects_error_object() {
        assert_eq!(
            error_body(r#"{"error": "access_token is required"}"#).as_deref(),
            Some("access_token is required")
        );
    }

    #[test]
    fn test_error_body_ignores_plain_text_and_arrays() {
        assert!(error_body("Q4 budget meeting Thu 2pm.").is_none());
        assert!(error_body(r#"[{"error": "x"}]"#).is_none());
        assert!(error_body(r#"{"emails": []}"#).is_none());
    }

    #[test]
    fn test_error_body_null_is_not_error() {
        assert!(error_body(r#"{"error": null, "emails": []}"#).is_none());
    }

    #[test]
    fn test_error_body_non_string_error() {
        assert_eq!(
            error_body(r#"{"error": {"code": 401}}"#).as_deref(),
            Some(r#"{"code":401}"#)
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = BackendClient::new(GatewayConfig::new("ftp://nope"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
