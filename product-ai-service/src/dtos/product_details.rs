use serde::Deserialize;
use validator::Validate;

/// Body of `POST /api/generate-product-details`.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported by name through validation rather than as a generic JSON error.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateProductDetailsRequest {
    #[serde(rename = "imageDataUri")]
    #[validate(
        required(message = "A product photo is required"),
        length(min = 1, message = "A product photo is required")
    )]
    pub image_data_uri: Option<String>,

    /// May be empty, but must be present.
    #[serde(rename = "userNotes")]
    #[validate(required(message = "Notes are required (an empty string is fine)"))]
    pub user_notes: Option<String>,
}
