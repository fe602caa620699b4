//! Centralized default constants for the inbox-digest system.
//!
//! **This module is the single source of truth** for shared default values.
//! Gateways, the enrichment board, and the shell reference these constants
//! instead of defining their own magic numbers.

// =============================================================================
// BACKEND
// =============================================================================

/// Base URL of the local backend that proxies Google APIs and summarization.
pub const BACKEND_URL: &str = "http://localhost:7878";

/// HTTP request timeout for every gateway call.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// ENDPOINTS
// =============================================================================

pub const EMAILS_PATH: &str = "/api/get_emails";

pub const SUMMARIZE_PATH: &str = "/api/summarize_email";

pub const EVENTS_PATH: &str = "/api/get_events";

pub const TASKS_PATH: &str = "/api/get_tasks";

pub const CHAT_PATH: &str = "/api/data";

// =============================================================================
// FETCH WINDOWS
// =============================================================================

/// Days of mail history requested on initial load.
pub const EMAIL_LOOKBACK_DAYS: u32 = 2;

/// Days ahead to include when listing tasks.
pub const TASK_LOOK_AHEAD_DAYS: u32 = 7;

// =============================================================================
// EVENTS
// =============================================================================

/// Broadcast buffer for board change notifications.
pub const EVENT_BUS_CAPACITY: usize = 64;

// =============================================================================
// MESSAGES
// =============================================================================

/// Error text for agenda fetches attempted without a credential.
pub const MISSING_TOKEN_MESSAGE: &str = "No access token found. Please log in.";

/// Prefix of a text fragment line in the chat stream protocol.
pub const CHAT_TEXT_PREFIX: &str = "0:";
