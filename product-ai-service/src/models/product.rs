use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Generated listing copy for a handcrafted product.
///
/// Both fields are non-empty whenever a value of this type is handed to a caller;
/// see [`GenerationResult::validated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub name: String,
    pub description: String,
}

impl GenerationResult {
    /// Trim both fields and reject the pair if either ends up blank.
    pub fn validated(self) -> Option<Self> {
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty() || description.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }
}

/// A product the caller offers as a recommendation candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CatalogEntry {
    #[validate(
        custom(function = "not_blank", message = "Catalogue ids must not be blank"),
        length(max = 200, message = "Catalogue ids must be at most 200 characters")
    )]
    pub id: String,
    #[validate(
        custom(function = "not_blank", message = "Catalogue names must not be blank"),
        length(max = 200, message = "Catalogue names must be at most 200 characters")
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One suggested catalogue entry with the model's reason for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: String,
    pub reason: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
