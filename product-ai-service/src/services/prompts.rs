//! Fixed instruction templates and response schemas sent to the model.

use crate::models::{CatalogEntry, DataUri};
use crate::services::providers::{GenerationParams, PromptPart, StructuredPrompt};
use serde_json::{json, Value};

const PRODUCT_DETAILS_INSTRUCTIONS: &str = "\
You are a copywriter for an online marketplace of handcrafted goods made by independent artisans.

Look at the product photo and read the artisan's notes, then write:
- name: a short, evocative product name (at most 8 words) that reflects the craft, material and style.
- description: two or three warm, specific paragraphs for the product page covering materials, \
technique, how the piece can be used and what makes it handmade. Do not invent measurements, \
prices or certifications that are not visible in the photo or stated in the notes.";

const RECOMMENDATION_INSTRUCTIONS: &str = "\
You are a merchandiser for an online marketplace of handcrafted goods.

A shopper is looking at the product below. From the catalogue list, choose the products that \
complement it best (pieces that pair well, share a craft tradition, or complete a set). Only use \
ids that appear in the catalogue, never recommend the product itself, and give a one-sentence \
reason for each choice.";

/// Schema for `{ name, description }`.
pub fn product_details_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "Short, evocative product name."
            },
            "description": {
                "type": "STRING",
                "description": "Product page description."
            }
        },
        "required": ["name", "description"],
        "propertyOrdering": ["name", "description"]
    })
}

/// Schema for `{ recommendations: [{ productId, reason }] }`.
pub fn recommendations_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "productId": { "type": "STRING" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["productId", "reason"]
                }
            }
        },
        "required": ["recommendations"]
    })
}

/// Image first, then the instructions with the artisan's notes appended.
pub fn product_details_prompt(
    image: &DataUri,
    notes: &str,
    params: GenerationParams,
) -> StructuredPrompt {
    let notes = notes.trim();
    let notes = if notes.is_empty() {
        "(the artisan left no notes)"
    } else {
        notes
    };

    StructuredPrompt {
        parts: vec![
            PromptPart::InlineImage {
                mime_type: image.mime_type().to_string(),
                data: image.data().to_string(),
            },
            PromptPart::Text(format!(
                "{}\n\nArtisan's notes:\n{}",
                PRODUCT_DETAILS_INSTRUCTIONS, notes
            )),
        ],
        response_schema: product_details_schema(),
        params,
    }
}

/// Describe the viewed product and list the candidates one per line.
pub fn recommendations_prompt(
    product_name: &str,
    product_description: Option<&str>,
    category: Option<&str>,
    catalog: &[CatalogEntry],
    max_suggestions: usize,
    params: GenerationParams,
) -> StructuredPrompt {
    let mut text = format!(
        "{}\n\nReturn at most {} recommendations.\n\nViewed product:\n- name: {}\n",
        RECOMMENDATION_INSTRUCTIONS,
        max_suggestions,
        product_name.trim()
    );
    if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
        text.push_str(&format!("- category: {}\n", category));
    }
    if let Some(description) = product_description.map(str::trim).filter(|d| !d.is_empty()) {
        text.push_str(&format!("- description: {}\n", description));
    }

    text.push_str("\nCatalogue:\n");
    for entry in catalog {
        match entry.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => text.push_str(&format!(
                "- id: {} | name: {} | category: {}\n",
                entry.id.trim(),
                entry.name.trim(),
                category
            )),
            None => text.push_str(&format!(
                "- id: {} | name: {}\n",
                entry.id.trim(),
                entry.name.trim()
            )),
        }
    }

    StructuredPrompt {
        parts: vec![PromptPart::Text(text)],
        response_schema: recommendations_schema(),
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_details_prompt_embeds_image_and_notes() {
        let image = DataUri::parse_image("data:image/png;base64,AAAA").unwrap();
        let prompt =
            product_details_prompt(&image, " hand-thrown clay mug ", GenerationParams::default());

        assert_eq!(
            prompt.parts[0],
            PromptPart::InlineImage {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }
        );
        let PromptPart::Text(text) = &prompt.parts[1] else {
            panic!("expected a text part");
        };
        assert!(text.ends_with("Artisan's notes:\nhand-thrown clay mug"));
        assert_eq!(prompt.response_schema["required"], json!(["name", "description"]));
    }

    #[test]
    fn empty_notes_are_called_out() {
        let image = DataUri::parse_image("data:image/png;base64,AAAA").unwrap();
        let prompt = product_details_prompt(&image, "   ", GenerationParams::default());

        let PromptPart::Text(text) = &prompt.parts[1] else {
            panic!("expected a text part");
        };
        assert!(text.contains("(the artisan left no notes)"));
    }

    #[test]
    fn recommendations_prompt_lists_catalog() {
        let catalog = vec![
            CatalogEntry {
                id: "p-1".to_string(),
                name: "Walnut Serving Board".to_string(),
                category: Some("woodwork".to_string()),
            },
            CatalogEntry {
                id: "p-2".to_string(),
                name: "Linen Napkins".to_string(),
                category: None,
            },
        ];

        let prompt = recommendations_prompt(
            "Rustic Clay Mug",
            None,
            Some("ceramics"),
            &catalog,
            3,
            GenerationParams::default(),
        );

        let PromptPart::Text(text) = &prompt.parts[0] else {
            panic!("expected a text part");
        };
        assert!(text.contains("Return at most 3 recommendations."));
        assert!(text.contains("- category: ceramics"));
        assert!(text.contains("- id: p-1 | name: Walnut Serving Board | category: woodwork"));
        assert!(text.contains("- id: p-2 | name: Linen Napkins\n"));
        assert!(!text.contains("- description:"));
    }
}
