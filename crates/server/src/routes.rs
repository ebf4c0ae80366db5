//! API route handlers

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use model_facade::dataset::{decoder_for_filename, CsvDecoder, DatasetError, Table, TableDecoder};
use model_facade::{ForecastResult, Metric, ModelError, ModelSummary, Prediction};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the dataset.
const FILE_FIELD: &str = "file";

struct Upload {
    file_name: String,
    bytes: Bytes,
}

fn no_file() -> ApiError {
    ApiError::BadRequest("No file provided".to_string())
}

/// First `file` field of a multipart body, if any.
async fn read_upload(mut multipart: Multipart) -> ApiResult<Option<Upload>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        info!(file = %file_name, bytes = bytes.len(), "Received dataset");
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}

// ============================================================================
// Health
// ============================================================================

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - which model slots are populated?
pub async fn readiness(State(state): State<AppState>) -> Json<Value> {
    let registry = state.service.registry();
    let models: serde_json::Map<String, Value> = Metric::ALL
        .iter()
        .map(|metric| (metric.as_str().to_string(), Value::Bool(registry.contains(*metric))))
        .collect();

    Json(json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
        "models": models
    }))
}

/// Fitted short-horizon models and their training statistics.
pub async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelSummary>> {
    Json(state.service.model_summaries())
}

// ============================================================================
// Model lifecycle
// ============================================================================

/// `POST /fit-model`: fit short-horizon models from an uploaded csv / json
/// file and publish them to the registry.
///
/// A dataset without recognised metric columns is answered with `200` and
/// an `error` field rather than a failure status.
pub async fn fit_model(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let upload = read_upload(multipart).await?.ok_or_else(no_file)?;
    let table = decoder_for_filename(&upload.file_name)?.decode(&upload.bytes)?;

    // Publish only after the deadline check so a timed-out fit leaves the
    // registry untouched
    match state.run_blocking(move |service| service.fit_models(&table)).await {
        Ok((group, models)) => {
            let report = state.service.publish(group, models);
            Ok(Json(report).into_response())
        }
        Err(ApiError::Model(ModelError::Validation(DatasetError::NoRecognizedMetrics))) => {
            info!("Dataset has no recognised metric columns");
            let body = json!({ "error": DatasetError::NoRecognizedMetrics.to_string() });
            Ok(Json(body).into_response())
        }
        Err(err) => Err(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub timestamp: Option<String>,
}

/// `GET /predict?type=resource|requests&timestamp=...`
pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> ApiResult<Json<Prediction>> {
    let prediction = state
        .service
        .predict(query.kind.as_deref(), query.timestamp.as_deref())?;
    Ok(Json(prediction))
}

/// `POST /forecast`: one seasonal step for every metric group present.
///
/// Accepts a JSON body (records or columns, millisecond timestamps) or a
/// multipart `file` upload.
pub async fn forecast(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<ForecastResult>> {
    let table = read_forecast_table(&state, request).await?;
    let result = state
        .run_blocking(move |service| service.forecast_table(&table))
        .await?;
    Ok(Json(result))
}

async fn read_forecast_table(state: &AppState, request: Request) -> ApiResult<Table> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let bytes = axum::body::to_bytes(request.into_body(), state.max_upload_bytes)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;
        return Ok(model_facade::dataset::JsonDecoder.decode(&bytes)?);
    }

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        let upload = read_upload(multipart).await?.ok_or_else(no_file)?;
        // Uploads without a known extension are read as CSV
        let decoder: Box<dyn TableDecoder> =
            decoder_for_filename(&upload.file_name).unwrap_or_else(|_| Box::new(CsvDecoder));
        return Ok(decoder.decode(&upload.bytes)?);
    }

    Err(no_file())
}
