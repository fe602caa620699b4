//! # digest-core
//!
//! Core types, traits, and abstractions for the inbox-digest workspace.
//!
//! This crate provides the foundational data structures (items, agenda
//! entries, chat messages), the shared error type, and the gateway traits
//! that the enrichment orchestrator and the HTTP gateways agree on.

pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod placeholder;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{DigestEvent, EventBus};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
