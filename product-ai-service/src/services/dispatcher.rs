//! Sends validated requests to the generative model.
//!
//! Every operation makes exactly one model call bounded by the configured
//! timeout. Failures come back as [`ProviderError`] untouched; turning them into
//! HTTP responses is the job of [`crate::services::error_mapper`].

use crate::models::{CatalogEntry, DataUri, GenerationResult, Recommendation};
use crate::services::metrics;
use crate::services::prompts;
use crate::services::providers::{GenerationParams, GenerativeModel, ProviderError, StructuredPrompt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What the model returns for a recommendation prompt, before filtering.
#[derive(Debug, Deserialize)]
struct RecommendationReply {
    #[serde(default)]
    recommendations: Vec<Recommendation>,
}

/// Input for a recommendation request.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationQuery<'a> {
    pub product_name: &'a str,
    pub product_description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub catalog: &'a [CatalogEntry],
    pub max_suggestions: usize,
}

#[derive(Clone)]
pub struct PromptDispatcher {
    model: Arc<dyn GenerativeModel>,
    timeout: Duration,
    params: GenerationParams,
}

impl PromptDispatcher {
    pub fn new(model: Arc<dyn GenerativeModel>, timeout: Duration, params: GenerationParams) -> Self {
        Self {
            model,
            timeout,
            params,
        }
    }

    pub fn model(&self) -> &Arc<dyn GenerativeModel> {
        &self.model
    }

    /// Generate a product name and description from a photo and the artisan's notes.
    pub async fn generate_product_details(
        &self,
        image: &DataUri,
        notes: &str,
    ) -> Result<GenerationResult, ProviderError> {
        let prompt = prompts::product_details_prompt(image, notes, self.params.clone());
        let result: GenerationResult = self.dispatch("product_details", &prompt).await?;

        result.validated().ok_or_else(|| {
            ProviderError::MalformedResponse(
                "model returned an empty name or description".to_string(),
            )
        })
    }

    /// Ask the model for complementary catalogue entries.
    pub async fn suggest_recommendations(
        &self,
        query: RecommendationQuery<'_>,
    ) -> Result<Vec<Recommendation>, ProviderError> {
        let prompt = prompts::recommendations_prompt(
            query.product_name,
            query.product_description,
            query.category,
            query.catalog,
            query.max_suggestions,
            self.params.clone(),
        );
        let reply: RecommendationReply = self.dispatch("recommendations", &prompt).await?;

        Ok(select_recommendations(
            reply.recommendations,
            query.catalog,
            query.product_name,
            query.max_suggestions,
        ))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        prompt: &StructuredPrompt,
    ) -> Result<T, ProviderError> {
        let provider = self.model.name();
        let model = self.model.model().to_string();
        let start = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.model.generate_structured(prompt)).await {
            Ok(result) => result.and_then(|text| parse_json_reply::<T>(&text)),
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        let elapsed = start.elapsed().as_secs_f64();
        metrics::record_provider_latency(provider, &model, elapsed);

        match &outcome {
            Ok(_) => {
                metrics::record_generation(operation, &model, "success");
                tracing::info!(
                    operation,
                    provider,
                    model = %model,
                    duration_secs = elapsed,
                    "Model call succeeded"
                );
            }
            Err(e) => {
                metrics::record_generation(operation, &model, "error");
                metrics::record_provider_error(provider, e.kind());
                tracing::warn!(
                    operation,
                    provider,
                    model = %model,
                    duration_secs = elapsed,
                    error_kind = e.kind(),
                    error = %e,
                    "Model call failed"
                );
            }
        }

        outcome
    }
}

/// Decode the model's JSON text, tolerating a surrounding Markdown code fence.
fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| {
        ProviderError::MalformedResponse(format!("reply did not match the expected shape: {}", e))
    })
}

/// Keep only catalogue ids, once each, never the viewed product, at most `max` entries.
fn select_recommendations(
    suggested: Vec<Recommendation>,
    catalog: &[CatalogEntry],
    product_name: &str,
    max: usize,
) -> Vec<Recommendation> {
    let viewed = product_name.trim().to_lowercase();
    let allowed: HashSet<&str> = catalog
        .iter()
        .filter(|entry| entry.name.trim().to_lowercase() != viewed)
        .map(|entry| entry.id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    let mut seen = HashSet::new();
    suggested
        .into_iter()
        .filter_map(|rec| {
            let product_id = rec.product_id.trim().to_string();
            let reason = rec.reason.trim().to_string();
            if reason.is_empty() || !allowed.contains(product_id.as_str()) {
                return None;
            }
            if !seen.insert(product_id.clone()) {
                return None;
            }
            Some(Recommendation { product_id, reason })
        })
        .take(max)
        .collect()
}
