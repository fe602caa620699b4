//! # digest-gateway
//!
//! HTTP gateways to the local inbox-digest backend.
//!
//! This crate provides:
//! - [`EmailGateway`]: the initial email collection (`/api/get_emails`)
//! - [`SummarizeGateway`]: per-email summaries (`/api/summarize_email`)
//! - [`AgendaGateway`]: calendar events and tasks
//! - [`ChatGateway`]: the streaming chat assistant
//! - [`GatewayConfig`]: explicit backend location and credential
//!
//! Each gateway performs exactly one backend call per operation and maps
//! every failure to a single error variant; retry and fallback policy
//! belong to the caller.
//!
//! # Feature Flags
//!
//! - `mock`: expose [`mock`] doubles for tests in dependent crates
//!
//! # Example
//!
//! ```rust,no_run
//! use digest_gateway::{BackendClient, GatewayConfig, SummarizeGateway};
//! use digest_core::Summarizer;
//!
//! #[tokio::main]
//! async fn main() -> digest_core::Result<()> {
//!     let client = BackendClient::new(GatewayConfig::from_env())?;
//!     let summary = SummarizeGateway::new(client).summarize("Lunch moved to 1pm").await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod agenda;
pub mod chat;
pub mod client;
pub mod config;
pub mod emails;
pub mod summarize;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use digest_core::*;

pub use agenda::AgendaGateway;
pub use chat::{ChatGateway, FragmentDecoder};
pub use client::BackendClient;
pub use config::GatewayConfig;
pub use emails::EmailGateway;
pub use summarize::SummarizeGateway;

/// All gateways built from one shared client.
#[derive(Clone)]
pub struct Gateways {
    pub emails: EmailGateway,
    pub summarize: SummarizeGateway,
    pub agenda: AgendaGateway,
    pub chat: ChatGateway,
}

impl Gateways {
    /// Validate `config` and build every gateway on one connection pool.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = BackendClient::new(config)?;
        Ok(Self {
            emails: EmailGateway::new(client.clone()),
            summarize: SummarizeGateway::new(client.clone()),
            agenda: AgendaGateway::new(client.clone()),
            chat: ChatGateway::new(client),
        })
    }
}
