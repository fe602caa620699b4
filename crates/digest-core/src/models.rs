//! Core data models for inbox-digest.
//!
//! These types are shared across all inbox-digest crates and mirror the JSON
//! shapes exchanged with the local backend.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// =============================================================================
// ITEM IDENTITY
// =============================================================================

/// Stable identity of an item.
///
/// The backend delivers Gmail message ids as opaque strings, while the
/// placeholder collection uses small integers. Both are normalized to a
/// string so lookups and concurrency control use a single key type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ItemId(s),
            RawId::Int(n) => ItemId(n.to_string()),
            RawId::Uint(n) => ItemId(n.to_string()),
        })
    }
}

/// Treat a JSON `null` the same as a missing string field.
///
/// The backend emits `null` for absent headers (e.g. a message without a
/// `Subject:`), which would otherwise fail deserialization.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// ITEM (EMAIL)
// =============================================================================

/// A fetched email eligible for enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sender: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    /// Short preview; always present, possibly empty.
    #[serde(default, alias = "content", deserialize_with = "null_as_empty")]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    /// Write-once summary. Use [`Item::enrichment`] / [`Item::set_enrichment`].
    #[serde(default, alias = "summary", skip_serializing_if = "Option::is_none")]
    enrichment: Option<String>,
}

impl Item {
    /// Create an item without a body or enrichment.
    pub fn new(
        id: impl Into<ItemId>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        snippet: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            subject: subject.into(),
            snippet: snippet.into(),
            body: None,
            date: date.into(),
            enrichment: None,
        }
    }

    /// Attach a full body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The summary, if one has been computed.
    pub fn enrichment(&self) -> Option<&str> {
        self.enrichment.as_deref()
    }

    /// Whether a non-blank summary is present.
    pub fn is_enriched(&self) -> bool {
        self.enrichment
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// Set the summary. Fails if a non-blank one is already present; a blank
    /// one counts as absent and is overwritten.
    pub fn set_enrichment(&mut self, summary: impl Into<String>) -> Result<()> {
        if self.is_enriched() {
            return Err(Error::AlreadyEnriched(self.id.clone()));
        }
        self.enrichment = Some(summary.into());
        Ok(())
    }

    /// Content to send for summarization: the body when present and
    /// non-blank, otherwise the snippet.
    pub fn enrichment_source(&self) -> &str {
        match self.body.as_deref() {
            Some(body) if !body.trim().is_empty() => body,
            _ => &self.snippet,
        }
    }
}

// =============================================================================
// ENRICHMENT STATE
// =============================================================================

/// Per-item enrichment lifecycle.
///
/// `Idle` is never stored; it is the answer for ids with no entry. `Done` is
/// derived from the item's populated enrichment field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentState {
    #[default]
    Idle,
    Pending,
    Done,
    Failed,
}

impl EnrichmentState {
    /// Whether a new enrichment attempt may be admitted from this state.
    pub fn admits_request(&self) -> bool {
        matches!(self, EnrichmentState::Idle | EnrichmentState::Failed)
    }
}

impl fmt::Display for EnrichmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// =============================================================================
// AGENDA TYPES
// =============================================================================

/// A calendar event as delivered by `/api/get_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// `HH:MM`, 24-hour.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
}

/// A task as delivered by `/api/get_tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    /// `YYYY-MM-DD`, or empty for tasks without a due date.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
}

// =============================================================================
// CHAT TYPES
// =============================================================================

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat turn sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_from_string_and_number() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[{"id": "18c2f0a", "snippet": "x"}, {"id": 7, "snippet": "y"}]"#,
        )
        .unwrap();
        assert_eq!(items[0].id, ItemId::from("18c2f0a"));
        assert_eq!(items[1].id, ItemId::from(7));
    }

    #[test]
    fn test_item_null_headers_become_empty() {
        let item: Item = serde_json::from_str(
            r#"{"id": "a", "sender": null, "subject": null, "snippet": "hi", "body": "", "date": null}"#,
        )
        .unwrap();
        assert_eq!(item.sender, "");
        assert_eq!(item.subject, "");
        assert_eq!(item.date, "");
        assert_eq!(item.body.as_deref(), Some(""));
    }

    #[test]
    fn test_item_content_alias_maps_to_snippet() {
        let item: Item =
            serde_json::from_str(r#"{"id": 2, "sender": "s", "content": "preview", "date": "2025-11-13"}"#)
                .unwrap();
        assert_eq!(item.snippet, "preview");
        assert!(item.body.is_none());
    }

    #[test]
    fn test_item_summary_alias_maps_to_enrichment() {
        let item: Item =
            serde_json::from_str(r#"{"id": 2, "snippet": "p", "summary": "short"}"#).unwrap();
        assert_eq!(item.enrichment(), Some("short"));
        assert!(item.is_enriched());
    }

    #[test]
    fn test_enrichment_is_write_once() {
        let mut item = Item::new(1, "a@b", "s", "snippet", "2025-11-14");
        item.set_enrichment("first").unwrap();
        let err = item.set_enrichment("second").unwrap_err();
        assert!(matches!(err, Error::AlreadyEnriched(_)));
        assert_eq!(item.enrichment(), Some("first"));
    }

    #[test]
    fn test_blank_wire_summary_can_be_replaced() {
        let mut item: Item =
            serde_json::from_str(r#"{"id": 1, "snippet": "a", "summary": ""}"#).unwrap();
        assert!(!item.is_enriched());

        item.set_enrichment("Real summary").unwrap();
        assert_eq!(item.enrichment(), Some("Real summary"));
        assert!(item.is_enriched());
    }

    #[test]
    fn test_enrichment_source_prefers_body() {
        let item = Item::new(1, "a", "s", "a", "d").with_body("A");
        assert_eq!(item.enrichment_source(), "A");
    }

    #[test]
    fn test_enrichment_source_falls_back_to_snippet() {
        let no_body = Item::new(2, "a", "s", "b", "d");
        assert_eq!(no_body.enrichment_source(), "b");

        let blank_body = Item::new(3, "a", "s", "c", "d").with_body("  \n");
        assert_eq!(blank_body.enrichment_source(), "c");
    }

    #[test]
    fn test_enrichment_state_admission() {
        assert!(EnrichmentState::Idle.admits_request());
        assert!(EnrichmentState::Failed.admits_request());
        assert!(!EnrichmentState::Pending.admits_request());
        assert!(!EnrichmentState::Done.admits_request());
        assert_eq!(EnrichmentState::default(), EnrichmentState::Idle);
    }

    #[test]
    fn test_chat_message_serialization() {
        let json = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_task_without_due_date() {
        let task: TaskEntry =
            serde_json::from_str(r#"{"title": "Call mom", "notes": null}"#).unwrap();
        assert_eq!(task.notes, "");
        assert_eq!(task.date, "");
    }
}
