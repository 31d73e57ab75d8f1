//! # Mock Completion Model for Testing
//!
//! Provides a `MockCompletionModel` that implements the `CompletionModel` trait
//! for use in tests. It returns a scripted reply, or a provider error when the
//! test wants the oracle to be unavailable, without making API calls.

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    one_or_many::OneOrMany,
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(OneOrMany<AssistantContent>),
    Fail,
}

/// A mock completion model for testing purposes.
/// It returns a predefined response or error when `completion` is called.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    behavior: Arc<Mutex<Option<MockBehavior>>>,
}

impl MockCompletionModel {
    /// Creates a new mock model that will return a default empty success response.
    pub fn new() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(None)),
        }
    }

    /// Sets the response that the mock model should return.
    pub async fn set_response(&self, response: OneOrMany<AssistantContent>) {
        let mut guard = self.behavior.lock().await;
        *guard = Some(MockBehavior::Reply(response));
    }

    /// Helper to create a simple text response.
    pub async fn set_text_response(&self, text: &str) {
        let response = OneOrMany::one(AssistantContent::text(text));
        self.set_response(response).await;
    }

    /// Make every completion call fail with a provider error.
    pub async fn fail_completions(&self) {
        let mut guard = self.behavior.lock().await;
        *guard = Some(MockBehavior::Fail);
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        let behavior = {
            let guard = self.behavior.lock().await;
            guard.clone()
        };
        match behavior {
            Some(MockBehavior::Reply(result)) => Ok(CompletionResponse {
                choice: result,
                raw_response: "".to_string(),
            }),
            Some(MockBehavior::Fail) => Err(CompletionError::ProviderError(
                "mock oracle unavailable".to_string(),
            )),
            None => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text("")),
                raw_response: "".to_string(),
            }),
        }
    }
}
