//! Generative provider abstraction
//!
//! A single structured-generation call behind a trait, so the orchestrator
//! can be exercised against mock providers.

mod error;
mod gemini;
#[cfg(test)]
pub mod testing;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::{GeminiService, DEFAULT_BASE_URL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for generation providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make one schema-constrained generation request
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for provider services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    turns = request.contents.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    empty = response.text.is_none(),
                    "Generation request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Generation request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
