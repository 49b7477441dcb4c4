use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::detection::{NewsDetectionModel, NewsDetectionPipeline};
use crate::error::DetectorError;
use crate::export::{PredictionRecord, EXPORT_FILE_NAME};

const BANNER_PATH: &str = "assets/banner.png";

/// Shared application state: the loaded pipeline plus the most recent
/// prediction, held until it is downloaded or replaced.
pub struct AppState<M: NewsDetectionModel> {
    pipeline: Arc<NewsDetectionPipeline<M>>,
    last_prediction: Arc<RwLock<Option<PredictionRecord>>>,
    banner_path: Arc<PathBuf>,
}

// Manual impl: deriving Clone would needlessly require M: Clone.
impl<M: NewsDetectionModel> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            last_prediction: self.last_prediction.clone(),
            banner_path: self.banner_path.clone(),
        }
    }
}

impl<M: NewsDetectionModel> AppState<M> {
    /// Wraps a built pipeline into shareable state.
    pub fn new(pipeline: NewsDetectionPipeline<M>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            last_prediction: Arc::new(RwLock::new(None)),
            banner_path: Arc::new(PathBuf::from(BANNER_PATH)),
        }
    }

    /// Overrides where the banner image is read from
    /// (default `assets/banner.png`, relative to the working directory).
    pub fn with_banner_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.banner_path = Arc::new(path.into());
        self
    }
}

/// Request body for `POST /api/predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// The news text to classify.
    pub text: String,
}

/// Successful response from `POST /api/predict`.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// "Fake" or "Real".
    pub label: String,
    /// Visual marker for the label.
    pub marker: String,
    /// Confidence percentage with one decimal place, e.g. `"97.3%"`.
    pub confidence: String,
}

/// Error payload for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// User-facing message.
    pub error: String,
}

struct ApiError(DetectorError);

impl From<DetectorError> for ApiError {
    fn from(value: DetectorError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DetectorError::EmptyInput => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Please enter some text first.".to_string(),
            ),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Builds the demo router over the given state.
pub fn create_router<M>(state: AppState<M>) -> Router
where
    M: NewsDetectionModel + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/banner.png", get(banner_handler::<M>))
        .route("/api/predict", post(predict_handler::<M>))
        .route("/api/download", get(download_handler::<M>))
        .with_state(state)
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

async fn banner_handler<M>(State(state): State<AppState<M>>) -> Response
where
    M: NewsDetectionModel + Send + Sync + 'static,
{
    match tokio::fs::read(state.banner_path.as_path()).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn predict_handler<M>(
    State(state): State<AppState<M>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError>
where
    M: NewsDetectionModel + Send + Sync + 'static,
{
    let pipeline = state.pipeline.clone();
    let text = request.text;

    // The forward pass is CPU-bound; keep it off the async workers.
    let joined = tokio::task::spawn_blocking(move || {
        let output = pipeline.run(&text)?;
        Ok::<_, DetectorError>((output, text))
    })
    .await
    .map_err(|e| ApiError(DetectorError::Unexpected(format!("inference task failed: {e}"))))?;

    let (output, text) = joined?;
    let prediction = &output.prediction;

    tracing::debug!(
        label = %prediction.label,
        elapsed_ms = output.stats.total_time.as_millis() as u64,
        "prediction served"
    );

    // The response reuses the record's strings so the page and the CSV export
    // always show the same label and confidence.
    let record = PredictionRecord::new(&text, prediction);
    let response = PredictResponse {
        label: record.prediction.clone(),
        marker: prediction.label.marker().to_string(),
        confidence: record.confidence.clone(),
    };
    *state.last_prediction.write().await = Some(record);

    Ok(Json(response))
}

// Serving the record consumes it: only the most recent prediction is ever
// available for export.
async fn download_handler<M>(State(state): State<AppState<M>>) -> Response
where
    M: NewsDetectionModel + Send + Sync + 'static,
{
    let record = state.last_prediction.write().await.take();
    match record {
        Some(record) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "text/csv; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            record.to_csv(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no prediction to download".to_string(),
            }),
        )
            .into_response(),
    }
}
