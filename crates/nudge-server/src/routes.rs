//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use nudge_model::{ModelStats, TrainingReport};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::telemetry;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/messages/autocomplete", post(autocomplete))
        .route("/model/stats", get(model_stats))
        .route("/model/retrain", post(retrain));

    let prefix = state.config.normalized_api_prefix();
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics));
    let router = if prefix.is_empty() {
        router.merge(api_routes)
    } else {
        router.nest(&prefix, api_routes)
    };

    let config = Arc::clone(&state.config);
    with_middleware(router.fallback(fallback), &config).with_state(state)
}

/// Wrap `router` in request tracing, CORS and the per-request timeout
pub fn with_middleware<S>(router: Router<S>, config: &ServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .layer(TimeoutLayer::new(config.request_timeout()));

    router.layer(middleware)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

async fn fallback() -> impl IntoResponse {
    (axum::http::StatusCode::NOT_FOUND, "Not found")
}

/// Autocomplete request from the message composer
#[derive(Debug, Serialize, Deserialize)]
pub struct AutocompleteRequest {
    /// Text typed so far
    pub text: String,

    /// 0 = positive, 1 = neutral, 2 = negative
    #[serde(default = "default_slider_state")]
    pub slider_state: i64,
}

fn default_slider_state() -> i64 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub suggestion: Option<String>,
}

/// Return a single-word suggestion for the current text and slider state
async fn autocomplete(
    State(state): State<AppState>,
    payload: Result<Json<AutocompleteRequest>, JsonRejection>,
) -> Result<Json<AutocompleteResponse>, AppError> {
    let Json(req) = payload?;

    let start = Instant::now();
    let prediction = state.predictor.predict(&req.text, req.slider_state);
    telemetry::record_suggestion(prediction.as_ref().map(|p| p.source), start.elapsed());

    if let Some(p) = &prediction {
        debug!("Suggested '{}' from {} ({})", p.token, p.bucket, p.source.as_str());
    }

    Ok(Json(AutocompleteResponse {
        suggestion: prediction.map(|p| p.token.into()),
    }))
}

async fn model_stats(State(state): State<AppState>) -> Json<ModelStats> {
    Json(state.model.stats())
}

#[derive(Debug, Serialize)]
pub struct RetrainResponse {
    pub trained: bool,
    pub report: Option<TrainingReport>,
}

/// Rebuild the model from the configured corpus and swap it in.
/// Answers 409 while another retrain is running.
async fn retrain(State(state): State<AppState>) -> Result<Json<RetrainResponse>, AppError> {
    let report = state.retrain().await?;
    Ok(Json(RetrainResponse {
        trained: report.is_some(),
        report,
    }))
}
