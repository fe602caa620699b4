//! Calendar and task gateways.
//!
//! Same single-call pattern as the email gateway, but these endpoints refuse
//! to run without a credential, so the check happens before any network
//! traffic.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, Instrument};

use digest_core::logging::gateway_span;
use digest_core::{defaults, CalendarEvent, Error, Result, TaskEntry};

use crate::client::BackendClient;

#[derive(Debug, Serialize)]
struct EventsRequest<'a> {
    access_token: &'a str,
}

#[derive(Debug, Serialize)]
struct TasksRequest<'a> {
    access_token: &'a str,
    look_ahead_days: u32,
}

/// Fetches calendar events and tasks.
#[derive(Clone)]
pub struct AgendaGateway {
    client: BackendClient,
}

impl AgendaGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn token(&self) -> Result<&str> {
        self.client
            .config()
            .access_token
            .as_deref()
            .ok_or_else(|| Error::Fetch(defaults::MISSING_TOKEN_MESSAGE.to_string()))
    }

    async fn fetch_list<T, B>(&self, path: &'static str, body: &B) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let text = self
            .client
            .post_text(path, body)
            .await
            .map_err(Error::Fetch)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Fetch(format!("Unexpected payload from {}: {}", path, e)))
    }

    /// Upcoming calendar events.
    pub async fn fetch_events(&self) -> Result<Vec<CalendarEvent>> {
        let request = EventsRequest {
            access_token: self.token()?,
        };
        let events: Vec<CalendarEvent> = self
            .fetch_list(defaults::EVENTS_PATH, &request)
            .instrument(gateway_span("fetch_events", defaults::EVENTS_PATH))
            .await?;
        info!(item_count = events.len(), "Fetched events");
        Ok(events)
    }

    /// Tasks due within the configured look-ahead window (plus undated ones).
    pub async fn fetch_tasks(&self) -> Result<Vec<TaskEntry>> {
        let request = TasksRequest {
            access_token: self.token()?,
            look_ahead_days: self.client.config().task_look_ahead_days,
        };
        let tasks: Vec<TaskEntry> = self
            .fetch_list(defaults::TASKS_PATH, &request)
            .instrument(gateway_span("fetch_tasks", defaults::TASKS_PATH))
            .await?;
        info!(item_count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    /// Events, or the placeholder events when the fetch fails.
    pub async fn events_or_placeholder(&self) -> (Vec<CalendarEvent>, Option<Error>) {
        match self.fetch_events().await {
            Ok(events) => (events, None),
            Err(e) => {
                tracing::warn!(error = %e, fallback = true, "Event fetch failed, using placeholder events");
                (digest_core::placeholder::events(), Some(e))
            }
        }
    }

    /// Tasks, or the placeholder tasks when the fetch fails.
    pub async fn tasks_or_placeholder(&self) -> (Vec<TaskEntry>, Option<Error>) {
        match self.fetch_tasks().await {
            Ok(tasks) => (tasks, None),
            Err(e) => {
                tracing::warn!(error = %e, fallback = true, "Task fetch failed, using placeholder tasks");
                (digest_core::placeholder::tasks(), Some(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayConfig;

    #[test]
    fn test_tasks_request_shape() {
        let json = serde_json::to_value(TasksRequest {
            access_token: "t",
            look_ahead_days: 7,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"access_token": "t", "look_ahead_days": 7})
        );
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_network() {
        // Port 9 (discard) is never contacted: the token check comes first.
        let client = BackendClient::new(GatewayConfig::new("http://127.0.0.1:9")).unwrap();
        let gateway = AgendaGateway::new(client);

        let err = gateway.fetch_events().await.unwrap_err();
        assert_eq!(err.to_string(), format!("Fetch error: {}", defaults::MISSING_TOKEN_MESSAGE));

        let err = gateway.fetch_tasks().await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn test_missing_token_falls_back_to_placeholders() {
        let client = BackendClient::new(GatewayConfig::new("http://127.0.0.1:9")).unwrap();
        let gateway = AgendaGateway::new(client);

        let (events, err) = gateway.events_or_placeholder().await;
        assert_eq!(events, digest_core::placeholder::events());
        assert!(err.is_some());

        let (tasks, err) = gateway.tasks_or_placeholder().await;
        assert_eq!(tasks, digest_core::placeholder::tasks());
        assert!(err.is_some());
    }
}
