/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds, `[target] text` per line
 * - `MockProvider::truncating(n)` - Answers only the first `n` lines of a batch
 * - `MockProvider::intermittent(n)` - Fails every `n`th request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::blank_line(i)` - Leaves line `i` of every batch blank
 *
 * Every request is recorded so tests can check how a job was batched.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// A batch the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// Lines of the batch
    pub texts: Vec<String>,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Answers only the first `keep` lines of each batch
    Truncating { keep: usize },
    /// Answers every line plus one extra string
    Overlong,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty list
    Empty,
    /// Answers every line but leaves position `index` blank, like a
    /// provider whose request for that one line failed
    BlankLine { index: usize },
    /// Simulates slow response (for ordering tests)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Requests received so far, shared between clones
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that drops the tail of every batch
    pub fn truncating(keep: usize) -> Self {
        Self::new(MockBehavior::Truncating { keep })
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns no lines
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers line `index` of each batch with ""
    pub fn blank_line(index: usize) -> Self {
        Self::new(MockBehavior::BlankLine { index })
    }

    /// Create a mock that delays each answer
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn translate_line(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> String {
        "mock".to_string()
    }

    async fn translate_texts(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(MockRequest {
            texts: texts.to_vec(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        });

        let all = || -> Vec<String> { texts.iter().map(|t| Self::translate_line(t, target_language)).collect() };

        match self.behavior {
            MockBehavior::Working => Ok(all()),

            MockBehavior::Truncating { keep } => Ok(all().into_iter().take(keep).collect()),

            MockBehavior::Overlong => {
                let mut lines = all();
                lines.push("unexpected extra line".to_string());
                Ok(lines)
            }

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(all())
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(Vec::new()),

            MockBehavior::BlankLine { index } => {
                let mut lines = all();
                if let Some(line) = lines.get_mut(index) {
                    line.clear();
                }
                Ok(lines)
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(all())
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
            _ => Ok(()),
        }
    }
}
