//! Mock providers for testing
//!
//! These mocks enable orchestrator and runtime tests without network I/O.

use super::{GenerateRequest, GenerateResponse, LlmError, LlmService, Usage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Build a schema-conformant payload with the given reply, language and sentiment
pub fn sample_payload(reply: &str, language: &str, sentiment: &str) -> String {
    serde_json::json!({
        "reply": reply,
        "detectedLanguage": language,
        "englishTranslation": format!("{reply} (translated)"),
        "culturalNote": format!("A note about {language}."),
        "sentiment": sentiment,
        "suggestedResponses": ["Rahmat!", "Yaxshi", "Xayr"],
    })
    .to_string()
}

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Mock provider that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<GenerateResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a raw response
    pub fn queue_response(&self, response: GenerateResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a response whose text is `payload`
    pub fn queue_payload(&self, payload: &str) {
        self.queue_response(GenerateResponse {
            text: Some(payload.to_string()),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
            },
        });
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<GenerateResponse, LlmError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Delayed Mock LLM Service (for timeout and cancellation testing)
// ============================================================================

/// Mock provider with a configurable delay
pub struct DelayedMockLlmService {
    inner: MockLlmService,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockLlmService {
    pub fn new(model_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: MockLlmService::new(model_id),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_payload(&self, payload: &str) {
        self.inner.queue_payload(payload);
    }

    pub fn recorded_requests(&self) -> Vec<GenerateRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl LlmService for DelayedMockLlmService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Content, ContentRole, JSON_MIME_TYPE};

    #[tokio::test]
    async fn test_mock_llm_service() {
        let mock = MockLlmService::new("test-model");
        mock.queue_payload("{}");

        let request = GenerateRequest {
            system_instruction: String::new(),
            contents: vec![Content::text(ContentRole::User, "hi")],
            response_mime_type: JSON_MIME_TYPE.to_string(),
            response_schema: serde_json::json!({}),
        };

        let response = mock.generate(&request).await.unwrap();
        assert_eq!(response.text.as_deref(), Some("{}"));

        // Second call should fail (no more responses)
        assert!(mock.generate(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }
}
