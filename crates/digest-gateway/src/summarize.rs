//! Enrichment gateway: one summary per call.

use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, Instrument};

use digest_core::logging::gateway_span;
use digest_core::{defaults, Error, Result, Summarizer};

use crate::client::BackendClient;

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    #[serde(rename = "emailBody")]
    email_body: &'a str,
}

/// Requests email summaries from the backend.
///
/// No streaming and no retry: a failed call is reported once and the caller
/// decides whether the user may try again.
#[derive(Clone)]
pub struct SummarizeGateway {
    client: BackendClient,
}

impl SummarizeGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn call(&self, content: &str) -> Result<String> {
        let start = Instant::now();
        let text = self
            .client
            .post_text(
                defaults::SUMMARIZE_PATH,
                &SummarizeRequest {
                    email_body: content,
                },
            )
            .await
            .map_err(Error::Summarize)?;

        let summary = text.trim();
        if summary.is_empty() {
            return Err(Error::Summarize("Backend returned an empty summary".to_string()));
        }

        debug!(
            content_len = content.len(),
            response_len = summary.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary received"
        );
        Ok(summary.to_string())
    }
}

#[async_trait]
impl Summarizer for SummarizeGateway {
    async fn summarize(&self, content: &str) -> Result<String> {
        self.call(content)
            .instrument(gateway_span("summarize", defaults::SUMMARIZE_PATH))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case_field() {
        let json = serde_json::to_value(SummarizeRequest { email_body: "A" }).unwrap();
        assert_eq!(json, serde_json::json!({"emailBody": "A"}));
    }
}
