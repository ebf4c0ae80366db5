//! Shared application state

use model_facade::{ModelError, ModelService, Result as ModelResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::error::{ApiError, ApiResult};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ModelService>,
    pub fit_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(service: ModelService, fit_timeout: Duration, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            fit_timeout,
            max_upload_bytes,
        }
    }

    /// Run CPU-bound model work on the blocking pool under the fit deadline.
    ///
    /// On timeout the caller gets [`ModelError::FitTimeout`]; the blocking
    /// task runs to completion in the background and its result is dropped.
    /// `work` must not publish anything itself, or a timed-out request
    /// would still take effect.
    pub async fn run_blocking<T, F>(&self, work: F) -> ApiResult<T>
    where
        F: FnOnce(&ModelService) -> ModelResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let task = tokio::task::spawn_blocking(move || work(&service));

        match tokio::time::timeout(self.fit_timeout, task).await {
            Ok(Ok(result)) => result.map_err(ApiError::from),
            Ok(Err(join_error)) => {
                error!(error = %join_error, "Model task failed");
                Err(ApiError::Internal("Model task failed".to_string()))
            }
            Err(_) => Err(ModelError::FitTimeout {
                seconds: self.fit_timeout.as_secs(),
            }
            .into()),
        }
    }
}
