//! # HTTP API
//!
//! axum router for the crop recommendation service.
//!
//! | Route                  | Method | Rate limited |
//! |------------------------|--------|--------------|
//! | `/`                    | GET    | no           |
//! | `/predict`             | POST   | yes          |
//! | `/download_report`     | POST   | yes          |
//! | `/health`              | GET    | no           |
//! | `/api/model-info`      | GET    | no           |
//! | `/api/predict`         | POST   | yes          |
//!
//! Anything else gets a JSON 404.

mod error;
mod handlers;
mod rate_limit;

pub use error::{ApiError, ErrorBody};
pub use handlers::HealthResponse;
pub use rate_limit::build_limiter;

use axum::Router;
use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use croprec_core::ModelArtifact;
use governor::DefaultDirectRateLimiter;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    pub(crate) model: Option<Arc<ModelArtifact>>,
    pub(crate) limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// State without rate limiting. `None` runs the server unloaded
    /// (health reports degraded, prediction returns 500).
    pub fn new(model: Option<ModelArtifact>) -> Self {
        Self {
            model: model.map(Arc::new),
            limiter: None,
        }
    }

    /// Limit the POST routes to `per_second` requests per second (0 disables).
    #[must_use]
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = build_limiter(per_second);
        self
    }

    /// Whether an artifact is available for prediction.
    #[must_use]
    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub(crate) fn model(&self) -> Result<&ModelArtifact, ApiError> {
        self.model.as_deref().ok_or(ApiError::ModelNotLoaded)
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/predict", post(handlers::predict))
        .route("/download_report", post(handlers::download_report))
        .route("/api/predict", post(handlers::api_predict))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/model-info", get(handlers::model_info))
        .merge(limited)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers(Any),
            ),
        )
}
