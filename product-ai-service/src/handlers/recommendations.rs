use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use super::json_rejection;
use crate::dtos::{RecommendationRequest, RecommendationResponse};
use crate::services::{error_mapper, RecommendationQuery};
use crate::startup::AppState;
use service_core::error::AppError;

#[tracing::instrument(skip(state, payload))]
pub async fn suggest_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate()?;

    let max_suggestions = request.max_suggestions();
    let (Some(product_name), Some(catalog)) = (request.product_name, request.catalog) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "productName and catalog are required"
        )));
    };

    let query = RecommendationQuery {
        product_name: &product_name,
        product_description: request.product_description.as_deref(),
        category: request.category.as_deref(),
        catalog: &catalog,
        max_suggestions,
    };

    let recommendations = state
        .dispatcher
        .suggest_recommendations(query)
        .await
        .map_err(error_mapper::to_app_error)?;

    tracing::info!(
        candidates = catalog.len(),
        returned = recommendations.len(),
        "Recommendations selected"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}
