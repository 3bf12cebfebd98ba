mod common;

use axum::http::StatusCode;
use common::{app, json_body, post_json};
use product_ai_service::services::error_mapper::OVERLOADED_MESSAGE;
use product_ai_service::services::providers::mock::MockModel;
use product_ai_service::services::providers::ProviderError;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ENDPOINT: &str = "/api/recommendations";

fn catalog() -> Value {
    json!([
        { "id": "p-1", "name": "Rustic Clay Mug", "category": "ceramics" },
        { "id": "p-2", "name": "Walnut Serving Board", "category": "woodwork" },
        { "id": "p-3", "name": "Linen Napkins" },
        { "id": "p-4", "name": "Beeswax Candle" },
        { "id": "p-5", "name": "Stoneware Teapot", "category": "ceramics" }
    ])
}

#[tokio::test]
async fn returns_only_catalogue_products_up_to_the_limit() {
    let model = Arc::new(MockModel::replying(json!({
        "recommendations": [
            { "productId": "p-5", "reason": "Same glaze family." },
            { "productId": "p-1", "reason": "The mug itself." },
            { "productId": "p-42", "reason": "Invented." },
            { "productId": "p-5", "reason": "Duplicate." },
            { "productId": "p-2", "reason": "Serve pastries alongside." },
            { "productId": "p-3", "reason": "Over the limit." }
        ]
    })));

    let response = app(model.clone())
        .oneshot(post_json(
            ENDPOINT,
            &json!({
                "productName": "Rustic Clay Mug",
                "category": "ceramics",
                "catalog": catalog(),
                "maxSuggestions": 2
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "recommendations": [
                { "productId": "p-5", "reason": "Same glaze family." },
                { "productId": "p-2", "reason": "Serve pastries alongside." }
            ]
        })
    );
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn empty_model_reply_is_an_empty_list() {
    let model = Arc::new(MockModel::replying(json!({ "recommendations": [] })));

    let response = app(model)
        .oneshot(post_json(
            ENDPOINT,
            &json!({ "productName": "Rustic Clay Mug", "catalog": catalog() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "recommendations": [] }));
}

#[tokio::test]
async fn invalid_requests_never_reach_the_model() {
    let model = Arc::new(MockModel::replying(json!({ "recommendations": [] })));

    let response = app(model.clone())
        .oneshot(post_json(
            ENDPOINT,
            &json!({ "catalog": [], "maxSuggestions": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["details"]["productName"].is_array());
    assert!(body["details"]["catalog"].is_array());
    assert!(body["details"]["maxSuggestions"].is_array());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn catalogue_larger_than_fifty_is_rejected() {
    let model = Arc::new(MockModel::replying(json!({ "recommendations": [] })));
    let catalog: Vec<Value> = (0..51)
        .map(|i| json!({ "id": format!("p-{}", i), "name": format!("Item {}", i) }))
        .collect();

    let response = app(model.clone())
        .oneshot(post_json(
            ENDPOINT,
            &json!({ "productName": "Rustic Clay Mug", "catalog": catalog }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn model_failures_use_the_same_mapping() {
    let model = Arc::new(MockModel::failing(ProviderError::Overloaded(
        "The model is overloaded.".to_string(),
    )));

    let response = app(model)
        .oneshot(post_json(
            ENDPOINT,
            &json!({ "productName": "Rustic Clay Mug", "catalog": catalog() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["error"], OVERLOADED_MESSAGE);
}

#[tokio::test]
async fn blank_catalogue_ids_are_rejected() {
    let model = Arc::new(MockModel::replying(json!({
        "recommendations": [{ "productId": "   ", "reason": "Looks nice." }]
    })));

    let response = app(model.clone())
        .oneshot(post_json(
            ENDPOINT,
            &json!({
                "productName": "Rustic Clay Mug",
                "catalog": [
                    { "id": "p-2", "name": "Walnut Serving Board" },
                    { "id": "", "name": "Linen Napkins" }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["details"]["catalog[1].id"].is_array());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn padded_catalogue_ids_are_matched_after_trimming() {
    let model = Arc::new(MockModel::replying(json!({
        "recommendations": [{ "productId": " p-2 ", "reason": "Serve pastries alongside." }]
    })));

    let response = app(model)
        .oneshot(post_json(
            ENDPOINT,
            &json!({
                "productName": "Rustic Clay Mug",
                "catalog": [{ "id": " p-2 ", "name": "Walnut Serving Board" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "recommendations": [
                { "productId": "p-2", "reason": "Serve pastries alongside." }
            ]
        })
    );
}
