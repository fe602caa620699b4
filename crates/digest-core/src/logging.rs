//! Structured logging field name constants for inbox-digest.
//!
//! All crates use these names for structured `tracing` fields so that log
//! output can be filtered by the same keys across gateways and the board.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | A spawned task panicked or the shell cannot start |
//! | WARN  | Recoverable issue, fallback applied or result absorbed |
//! | INFO  | Lifecycle events (load, enrichment completion) |
//! | DEBUG | Admission decisions, request/response sizes |
//! | TRACE | Per-fragment chat stream data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "gateway", "enrich", "shell"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "fetch_initial", "summarize", "request", "complete"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Item id being operated on.
pub const ITEM_ID: &str = "item_id";

/// UUIDv7 of a single enrichment attempt.
pub const ATTEMPT_ID: &str = "attempt_id";

/// Backend endpoint path.
pub const ENDPOINT: &str = "endpoint";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of items in a loaded collection.
pub const ITEM_COUNT: &str = "item_count";

/// Byte length of content sent for summarization.
pub const CONTENT_LEN: &str = "content_len";

/// Byte length of a backend response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Whether placeholder data was substituted.
pub const FALLBACK: &str = "fallback";

// ─── Span constructors ─────────────────────────────────────────────────────
//
// Field names below must stay in sync with the constants above; `tracing`
// macros only accept literal identifiers.

/// Span wrapping a single enrichment attempt from admission to completion.
pub fn enrichment_span(item_id: &crate::ItemId, attempt_id: &uuid::Uuid) -> tracing::Span {
    tracing::info_span!(
        "enrichment",
        subsystem = "enrich",
        item_id = %item_id,
        attempt_id = %attempt_id
    )
}

/// Span wrapping one backend call.
pub fn gateway_span(op: &'static str, endpoint: &'static str) -> tracing::Span {
    tracing::debug_span!("gateway", subsystem = "gateway", op, endpoint)
}
