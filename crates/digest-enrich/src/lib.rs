//! # digest-enrich
//!
//! Per-item asynchronous enrichment for the inbox-digest board.
//!
//! This crate provides:
//! - [`ItemStore`]: the ordered item collection and its write-once summaries
//! - [`EnrichmentCoordinator`]: at most one in-flight summary per item
//! - [`EmailBoard`]: initial load with placeholder fallback, and triggers that
//!   run summaries on spawned tasks
//! - [`view`]: pure projection of board state into cards
//!
//! ## Example
//!
//! ```ignore
//! use digest_enrich::{BoardConfig, EmailBoard, TriggerOutcome};
//! use digest_gateway::Gateways;
//!
//! let gateways = Gateways::new(GatewayConfig::from_env())?;
//! let board = EmailBoard::new(gateways.emails, gateways.summarize, BoardConfig::from_env());
//!
//! board.load_initial().await;
//! if let Some(card) = board.cards().into_iter().find(|c| c.can_trigger()) {
//!     board.trigger(&card.id).join().await;
//! }
//! ```

pub mod board;
pub mod coordinator;
pub mod store;
pub mod view;

// Re-export core types
pub use digest_core::*;

pub use board::{BoardConfig, EmailBoard, LoadOutcome, TriggerOutcome};
pub use coordinator::{Admission, EnrichmentCoordinator, PendingLookup, RejectReason};
pub use store::ItemStore;
pub use view::{CardVariant, CardView, EventCard, TaskCard};
