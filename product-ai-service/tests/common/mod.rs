//! Shared helpers for the in-process router tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use product_ai_service::config::{GoogleConfig, HttpConfig, ModelConfig, ProductAiConfig, ProviderKind};
use product_ai_service::services::providers::mock::MockModel;
use product_ai_service::startup::{build_router, AppState};
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config;
use std::sync::Arc;

pub fn test_config() -> ProductAiConfig {
    ProductAiConfig {
        common: Config {
            port: 0,
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
        model: ModelConfig {
            provider: ProviderKind::Mock,
            text_model: "mock-model".to_string(),
            request_timeout_secs: 5,
            temperature: None,
        },
        google: GoogleConfig {
            api_key: Secret::new(String::new()),
            api_base: "http://127.0.0.1:9".to_string(),
        },
        http: HttpConfig {
            max_body_bytes: 1024 * 1024,
            rate_limit_per_minute: 1000,
            allowed_origins: Vec::new(),
            trust_forwarded_for: false,
        },
    }
}

pub fn app_with(config: ProductAiConfig, model: Arc<MockModel>) -> Router {
    build_router(AppState::new(config, model))
}

pub fn app(model: Arc<MockModel>) -> Router {
    app_with(test_config(), model)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
