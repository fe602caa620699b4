//! In-process gateway doubles for deterministic testing.
//!
//! Enabled for this crate's tests and, through the `mock` feature, for
//! dependent crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use digest_gateway::mock::MockSummarizer;
//! use digest_core::Summarizer;
//!
//! #[tokio::test]
//! async fn test_with_mock_summarizer() {
//!     let summarizer = MockSummarizer::new().with_response_mapping("A", "A summary");
//!     assert_eq!(summarizer.summarize("A").await.unwrap(), "A summary");
//!     assert_eq!(summarizer.call_count(), 1);
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use digest_core::{Error, Item, ItemSource, Result, Summarizer};

#[derive(Debug, Clone)]
struct MockConfig {
    responses: HashMap<String, String>,
    default_response: String,
    failing_inputs: HashSet<String>,
    fail_all: bool,
    gated: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: "Mock summary".to_string(),
            failing_inputs: HashSet::new(),
            fail_all: false,
            gated: false,
        }
    }
}

/// Summarizer double with a call log and an optional gate.
///
/// When gated, every call is recorded immediately and then blocks until the
/// test releases a permit, which keeps an enrichment attempt in flight for
/// as long as the test needs.
#[derive(Clone)]
pub struct MockSummarizer {
    config: Arc<MockConfig>,
    calls: Arc<Mutex<Vec<String>>>,
    gate: Arc<Semaphore>,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Response for inputs without a mapping.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Response for a specific input.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .responses
            .insert(input.into(), output.into());
        self
    }

    /// Fail whenever this input is summarized.
    pub fn with_failing_input(mut self, input: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config)
            .failing_inputs
            .insert(input.into());
        self
    }

    /// Fail every call.
    pub fn failing(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_all = true;
        self
    }

    /// Hold every call until [`MockSummarizer::release`] is called.
    pub fn gated(mut self) -> Self {
        Arc::make_mut(&mut self.config).gated = true;
        self
    }

    /// Let `n` held calls proceed.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Inputs of every call so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls made with exactly this input.
    pub fn calls_for(&self, input: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == input)
            .count()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, content: &str) -> Result<String> {
        self.calls.lock().unwrap().push(content.to_string());

        if self.config.gated {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| Error::Internal(format!("mock gate closed: {}", e)))?;
            permit.forget();
        }

        if self.config.fail_all || self.config.failing_inputs.contains(content) {
            return Err(Error::Summarize("Mock summarizer failure".to_string()));
        }

        Ok(self
            .config
            .responses
            .get(content)
            .cloned()
            .unwrap_or_else(|| self.config.default_response.clone()))
    }
}

/// Item source double returning a fixed collection or a fetch failure.
#[derive(Clone)]
pub struct MockItemSource {
    items: Arc<Mutex<Option<Vec<Item>>>>,
    fetches: Arc<Mutex<usize>>,
}

impl MockItemSource {
    /// Source that succeeds with `items`.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(Mutex::new(Some(items))),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    /// Source whose every fetch fails.
    pub fn failing() -> Self {
        Self {
            items: Arc::new(Mutex::new(None)),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    /// Replace what later fetches return.
    pub fn set_items(&self, items: Vec<Item>) {
        *self.items.lock().unwrap() = Some(items);
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl ItemSource for MockItemSource {
    async fn fetch_initial(&self) -> Result<Vec<Item>> {
        *self.fetches.lock().unwrap() += 1;
        self.items
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Fetch("Failed to fetch emails".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_mock_mapping_and_default() {
        let mock = MockSummarizer::new()
            .with_fixed_response("default")
            .with_response_mapping("A", "mapped");
        assert_eq!(mock.summarize("A").await.unwrap(), "mapped");
        assert_eq!(mock.summarize("B").await.unwrap(), "default");
        assert_eq!(mock.calls(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let mock = MockSummarizer::new().with_failing_input("bad");
        assert!(mock.summarize("bad").await.is_err());
        assert!(mock.summarize("good").await.is_ok());

        let all = MockSummarizer::new().failing();
        assert!(matches!(all.summarize("x").await, Err(Error::Summarize(_))));
    }

    #[tokio::test]
    async fn test_mock_gate_holds_until_release() {
        let mock = MockSummarizer::new().gated();
        let task = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.summarize("held").await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(mock.calls_for("held"), 1);
        assert!(!task.is_finished());

        mock.release(1);
        assert_eq!(task.await.unwrap().unwrap(), "Mock summary");
    }

    #[tokio::test]
    async fn test_mock_item_source() {
        let source = MockItemSource::with_items(vec![Item::new(1, "a", "s", "p", "d")]);
        assert_eq!(source.fetch_initial().await.unwrap().len(), 1);

        let failing = MockItemSource::failing();
        assert!(matches!(failing.fetch_initial().await, Err(Error::Fetch(_))));
        assert_eq!(failing.fetch_count(), 1);
    }
}
