use crate::models::{CatalogEntry, Recommendation};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_MAX_SUGGESTIONS: u8 = 4;

/// Body of `POST /api/recommendations`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[validate(
        required(message = "The viewed product's name is required"),
        length(min = 1, max = 200, message = "Product name must be 1-200 characters")
    )]
    pub product_name: Option<String>,

    #[validate(length(max = 5000, message = "Product description must be at most 5000 characters"))]
    pub product_description: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    #[validate(
        required(message = "A catalogue of candidate products is required"),
        length(min = 1, max = 50, message = "Catalogue must list between 1 and 50 products"),
        nested
    )]
    pub catalog: Option<Vec<CatalogEntry>>,

    #[validate(range(min = 1, max = 10, message = "maxSuggestions must be between 1 and 10"))]
    pub max_suggestions: Option<u8>,
}

impl RecommendationRequest {
    pub fn max_suggestions(&self) -> usize {
        usize::from(self.max_suggestions.unwrap_or(DEFAULT_MAX_SUGGESTIONS))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> RecommendationRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_max_suggestions() {
        let request = parse(json!({
            "productName": "Rustic Clay Mug",
            "catalog": [{ "id": "p-2", "name": "Walnut Serving Board" }]
        }));

        assert!(request.validate().is_ok());
        assert_eq!(request.max_suggestions(), 4);
    }

    #[test]
    fn rejects_blank_catalogue_entries() {
        let request = parse(json!({
            "productName": "Rustic Clay Mug",
            "catalog": [
                { "id": "p-2", "name": "Walnut Serving Board" },
                { "id": "  ", "name": "Linen Napkins" }
            ]
        }));

        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("catalog"));
    }

    #[test]
    fn rejects_empty_catalog_and_out_of_range_limit() {
        let request = parse(json!({
            "productName": "Rustic Clay Mug",
            "catalog": [],
            "maxSuggestions": 11
        }));

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.keys().any(|k| k.contains("catalog")));
        assert!(fields.keys().any(|k| k.contains("max_suggestions") || k.contains("maxSuggestions")));
    }
}
