//! Route handlers.

use super::{ApiError, AppState};
use crate::report::{Report, render_pdf, render_result_page};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Json, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::{Local, SecondsFormat, Utc};
use croprec_core::sample::{MAX_TEXT_LEN, require_all, required, sanitize_text};
use croprec_core::{Field, ModelInfo, PredictionResult, SoilReadings, SoilSample};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

type FormBody = Result<Form<BTreeMap<String, String>>, FormRejection>;

fn form_fields(body: FormBody) -> Result<BTreeMap<String, String>, ApiError> {
    body.map(|Form(form)| form)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET / - input form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /predict - form in, HTML result page out
pub async fn predict(
    State(state): State<AppState>,
    body: FormBody,
) -> Result<Html<String>, ApiError> {
    let form = form_fields(body)?;
    require_all(&form, &Field::ALL.map(Field::key))?;
    let model = state.model()?;

    let sample = SoilSample::from_form(&form)?;
    let result = model.predict(&sample)?;
    info!(
        crop = %result.crop,
        confidence = result.confidence_percent,
        "prediction served"
    );

    Ok(Html(render_result_page(&result)))
}

/// POST /download_report - form plus `crop` in, PDF attachment out
pub async fn download_report(body: FormBody) -> Result<Response, ApiError> {
    let form = form_fields(body)?;
    let crop = sanitize_text(required(&form, "crop")?, MAX_TEXT_LEN);
    require_all(&form, &Field::ALL.map(Field::key))?;
    let sample = SoilSample::from_form(&form)?;

    let report = Report::new(crop, sample, Local::now().naive_local());
    let bytes = render_pdf(&report)?;
    let filename = report.filename();
    info!(%filename, size = bytes.len(), "report generated");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models_loaded: bool,
    pub timestamp: String,
    pub version: &'static str,
}

/// GET /health - 200 when the artifact is loaded, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let loaded = state.model_loaded();
    let (code, status) = if loaded {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            models_loaded: loaded,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// GET /api/model-info
pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    Ok(Json(state.model()?.info()))
}

/// POST /api/predict - JSON readings in, JSON prediction out
pub async fn api_predict(
    State(state): State<AppState>,
    body: Result<Json<SoilReadings>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(readings) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let model = state.model()?;

    let sample = SoilSample::try_from(readings)?;
    let result = model.predict(&sample)?;
    info!(
        crop = %result.crop,
        confidence = result.confidence_percent,
        "api prediction served"
    );

    Ok(Json(result))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
