//! Data source gateway: the initial email collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};

use digest_core::logging::gateway_span;
use digest_core::{defaults, Error, Item, ItemSource, Result};

use crate::client::BackendClient;

/// Request body for `/api/get_emails`.
///
/// The token travels in the body (not a header) and is sent as `null` when
/// absent; the backend answers with an error body in that case.
#[derive(Debug, Serialize)]
struct EmailsRequest<'a> {
    access_token: Option<&'a str>,
    days: u32,
}

/// The backend answers with a bare array; older builds wrapped it.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmailsPayload {
    List(Vec<Item>),
    Wrapped { emails: Vec<Item> },
}

impl EmailsPayload {
    fn into_items(self) -> Vec<Item> {
        match self {
            EmailsPayload::List(items) | EmailsPayload::Wrapped { emails: items } => items,
        }
    }
}

/// Fetches recent emails from the backend.
#[derive(Clone)]
pub struct EmailGateway {
    client: BackendClient,
}

impl EmailGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<Vec<Item>> {
        let config = self.client.config();
        let request = EmailsRequest {
            access_token: config.access_token.as_deref(),
            days: config.email_lookback_days,
        };

        let text = self
            .client
            .post_text(defaults::EMAILS_PATH, &request)
            .await
            .map_err(Error::Fetch)?;

        let payload: EmailsPayload = serde_json::from_str(&text)
            .map_err(|e| Error::Fetch(format!("Unexpected email payload: {}", e)))?;
        let items = payload.into_items();

        info!(
            item_count = items.len(),
            days = config.email_lookback_days,
            "Fetched emails"
        );
        Ok(items)
    }
}

#[async_trait]
impl ItemSource for EmailGateway {
    async fn fetch_initial(&self) -> Result<Vec<Item>> {
        self.fetch()
            .instrument(gateway_span("fetch_initial", defaults::EMAILS_PATH))
            .await
    }
}
