//! HTTP handlers for product-ai-service.

pub mod health;
pub mod product_details;
pub mod recommendations;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use product_details::generate_product_details;
pub use recommendations::suggest_recommendations;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use service_core::error::AppError;

/// Bodies that are not JSON, or carry fields of the wrong type, are client errors.
pub(crate) fn json_rejection(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge("Request body is too large".to_string());
    }
    AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
}
