use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use super::json_rejection;
use crate::dtos::GenerateProductDetailsRequest;
use crate::models::{DataUri, GenerationResult};
use crate::services::error_mapper;
use crate::startup::AppState;
use service_core::error::AppError;

/// Turn a product photo and the artisan's notes into a name and description.
#[tracing::instrument(skip(state, payload))]
pub async fn generate_product_details(
    State(state): State<AppState>,
    payload: Result<Json<GenerateProductDetailsRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate()?;

    let (Some(image_data_uri), Some(user_notes)) = (request.image_data_uri, request.user_notes)
    else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "imageDataUri and userNotes are required"
        )));
    };

    let image = DataUri::parse_image(&image_data_uri).map_err(|e| {
        AppError::invalid_field("imageDataUri", "data_uri", format!("Image data URI {}", e))
    })?;

    tracing::info!(
        mime_type = image.mime_type(),
        notes_len = user_notes.len(),
        "Generating product details"
    );

    let result = state
        .dispatcher
        .generate_product_details(&image, &user_notes)
        .await
        .map_err(error_mapper::to_app_error)?;

    Ok(Json(result))
}
