//! Generative model abstractions and implementations.
//!
//! This module provides a trait-based abstraction for model backends,
//! allowing easy swapping between Gemini and the mock used in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
///
/// Messages are descriptive but never contain credentials.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Model overloaded (503): {0}")]
    Overloaded(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API key not valid: {0}")]
    InvalidCredentials(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Content filtered by the model's safety settings")]
    ContentFiltered,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ProviderError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Overloaded(_) => "overloaded",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::InvalidCredentials(_) => "invalid_credentials",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::InvalidRequest(_) => "invalid_request",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::MalformedResponse(_) => "malformed_response",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}

/// One piece of a multimodal prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    /// Base64-encoded image bytes with their MIME type.
    InlineImage { mime_type: String, data: String },
}

/// Generation parameters for model requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,
}

/// A prompt whose reply must be JSON matching `response_schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub parts: Vec<PromptPart>,

    /// Schema in the provider's OpenAPI subset.
    pub response_schema: serde_json::Value,

    pub params: GenerationParams,
}

/// Trait for multimodal structured-output providers (e.g., Gemini).
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Provider name for metrics and logs.
    fn name(&self) -> &'static str;

    /// Model identifier the provider sends requests to.
    fn model(&self) -> &str;

    /// Run the prompt once and return the raw JSON text of the reply.
    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
