//! API error responses
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! derived from the error kind.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use model_facade::dataset::DatasetError;
use model_facade::ModelError;
use thiserror::Error;
use tracing::{error, warn};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<DatasetError> for ApiError {
    fn from(err: DatasetError) -> Self {
        ApiError::Model(ModelError::Validation(err))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Model(err) => match err {
                ModelError::ModelNotLoaded(_) => StatusCode::CONFLICT,
                ModelError::NonConvergent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ModelError::FitTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ModelError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
                err if err.is_client_error() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(DatasetError::MissingTimestampColumn), StatusCode::BAD_REQUEST),
            (ApiError::from(DatasetError::InvalidTimestamp("x".into())), StatusCode::BAD_REQUEST),
            (
                ApiError::from(DatasetError::UnsupportedFileType("xls".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ModelError::InvalidPredictionType("x".into()).into(), StatusCode::BAD_REQUEST),
            (
                ModelError::InsufficientData {
                    required: 5,
                    actual: 2,
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ModelError::InsufficientHistory {
                    required: 16,
                    actual: 2,
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ModelError::IncompatibleSamplingInterval {
                    expected_minutes: 15,
                    observed_minutes: 60,
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (ModelError::ModelNotLoaded("x".into()).into(), StatusCode::CONFLICT),
            (ModelError::NonConvergent { iterations: 9 }.into(), StatusCode::UNPROCESSABLE_ENTITY),
            (ModelError::FitTimeout { seconds: 30 }.into(), StatusCode::GATEWAY_TIMEOUT),
            (ModelError::NumericalError("x".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::BadRequest("No file provided".into()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("join".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{}", error);
        }
    }

    #[test]
    fn test_message_passthrough() {
        let error = ApiError::from(ModelError::ModelNotLoaded(
            "Requests model is not loaded".to_string(),
        ));
        assert_eq!(error.to_string(), "Requests model is not loaded");
    }
}
