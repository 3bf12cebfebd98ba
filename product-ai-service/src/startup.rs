//! Application startup and lifecycle management.

use crate::config::{ProductAiConfig, ProviderKind};
use crate::handlers::{
    generate_product_details, health_check, metrics_endpoint, readiness_check,
    suggest_recommendations,
};
use crate::services::metrics::track_http_metrics;
use crate::services::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::services::providers::mock::MockModel;
use crate::services::providers::{GenerationParams, GenerativeModel};
use crate::services::PromptDispatcher;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    create_ip_rate_limiter, ip_rate_limit_middleware, request_id_middleware,
    security_headers_middleware, spawn_rate_limit_pruner, RateLimitState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Rate limit window for the `/api` routes.
const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// How often idle per-IP limiter entries are dropped.
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProductAiConfig,
    pub dispatcher: PromptDispatcher,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(config: ProductAiConfig, model: Arc<dyn GenerativeModel>) -> Self {
        let params = GenerationParams {
            temperature: config.model.temperature,
            max_tokens: None,
        };
        let dispatcher = PromptDispatcher::new(model, config.model.request_timeout(), params);
        let rate_limit = RateLimitState::new(
            create_ip_rate_limiter(config.http.rate_limit_per_minute, RATE_LIMIT_WINDOW_SECS),
            config.http.trust_forwarded_for,
        );

        Self {
            config,
            dispatcher,
            rate_limit,
        }
    }
}

/// Instantiate the model backend selected by `GENAI_PROVIDER`.
pub fn build_model(config: &ProductAiConfig) -> Result<Arc<dyn GenerativeModel>, AppError> {
    match config.model.provider {
        ProviderKind::Gemini => {
            let provider = GeminiProvider::new(GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: config.model.text_model.clone(),
                api_base: config.google.api_base.clone(),
                timeout: config.model.request_timeout(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

            tracing::info!(
                model = %config.model.text_model,
                "Initialized Gemini provider"
            );
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            tracing::warn!("GENAI_PROVIDER=mock, replies are canned");
            Ok(Arc::new(MockModel::demo()))
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the full HTTP router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/generate-product-details",
            post(generate_product_details),
        )
        .route("/api/recommendations", post(suggest_recommendations))
        .route_layer(from_fn_with_state(
            state.rate_limit.clone(),
            ip_rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .merge(api_routes)
        .route_layer(from_fn(track_http_metrics))
        .layer(DefaultBodyLimit::max(state.config.http.max_body_bytes))
        .layer(cors_layer(&state.config.http.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the configured model backend.
    pub async fn build(config: ProductAiConfig) -> Result<Self, AppError> {
        let model = build_model(&config)?;
        Self::build_with_model(config, model).await
    }

    /// Build the application around an existing model, e.g. a mock in tests.
    pub async fn build_with_model(
        config: ProductAiConfig,
        model: Arc<dyn GenerativeModel>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random port for testing
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(
            port = http_port,
            provider = model.name(),
            model = model.model(),
            "Product AI service listening"
        );

        Ok(Self {
            http_port,
            http_listener,
            state: AppState::new(config, model),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let pruner = spawn_rate_limit_pruner(
            self.state.rate_limit.limiter.clone(),
            RATE_LIMIT_PRUNE_INTERVAL,
        );
        let router = build_router(self.state);

        let result = axum::serve(
            self.http_listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        pruner.abort();
        result.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            e
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
