//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::config::GenerationConfig;
use crate::error::Result;

/// Trait for LLM-based text generation
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-flash)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully assembled prompt
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;

    /// Check if the provider is configured and available
    async fn health_check(&self) -> bool;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
