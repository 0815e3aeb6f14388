//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! code matching its class. Internal causes are logged, never echoed.

use crate::report::RenderError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use croprec_core::{InferenceError, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad request - Invalid input data")]
    BadRequest(String),

    #[error("Models not loaded properly. Please check model files.")]
    ModelNotLoaded,

    #[error("Prediction failed. Please try again.")]
    Inference(#[from] InferenceError),

    #[error("Failed to generate PDF report")]
    Render(#[from] RenderError),

    #[error("Endpoint not found")]
    NotFound,

    #[error("Rate limit exceeded")]
    RateLimited,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// HTTP status for this error class.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ModelNotLoaded | Self::Inference(_) | Self::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(err) => warn!(field = err.key(), "validation error: {err}"),
            Self::BadRequest(detail) => warn!("rejected request body: {detail}"),
            Self::ModelNotLoaded => error!("request needs a model but none is loaded"),
            Self::Inference(err) => error!("prediction error: {err}"),
            Self::Render(err) => error!("PDF generation error: {err}"),
            Self::NotFound | Self::RateLimited => {}
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
