//! HTTP surface: `POST /predict` and `GET /labels`.

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use tokio::net::TcpListener;

use crate::service::{EmotionService, ServiceError};

/// Body of `POST /predict`. A missing `text` field means empty text.
///
/// Only a JSON object is a request; arrays and scalars fail to deserialize.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PredictRequest {
    pub text: String,
}

impl<'de> Deserialize<'de> for PredictRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            #[serde(default)]
            text: String,
        }

        // Derived struct impls also accept sequences, so `[]` would pass as `{}`
        let object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let fields: Fields =
            serde_json::from_value(serde_json::Value::Object(object)).map_err(D::Error::custom)?;
        Ok(PredictRequest { text: fields.text })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub emotion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be read as a predict request
    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },
    /// Well-formed JSON whose shape does not match a predict request
    #[error("request body has the wrong shape: {0}")]
    MalformedBody(String),
    #[error("prediction failed: {0}")]
    Prediction(#[from] ServiceError),
    #[error("inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::MalformedBody(e.body_text()),
            other => ApiError::InvalidRequest {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest { status, message } => {
                debug!("Rejected request body: {}", message);
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            // Wrong-typed bodies are reported like any other server fault
            other => {
                error!("{}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error: "internal server error".to_string() }),
                )
                    .into_response()
            }
        }
    }
}

/// Create the application router
pub fn create_router(service: Arc<EmotionService>) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/labels", get(labels_handler))
        .with_state(service)
}

async fn predict_handler(
    State(service): State<Arc<EmotionService>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;

    // Inference is CPU bound; keep it off the async workers
    let emotion = tokio::task::spawn_blocking(move || service.predict(&request.text)).await??;
    debug!("Predicted emotion: {}", emotion);

    Ok(Json(PredictResponse { emotion }))
}

async fn labels_handler(State(service): State<Arc<EmotionService>>) -> Json<LabelsResponse> {
    Json(LabelsResponse { labels: service.labels() })
}

/// Serves the API on `addr` until Ctrl-C is received.
pub async fn serve(addr: &str, service: EmotionService) -> std::io::Result<()> {
    let app = create_router(Arc::new(service));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_missing_text() {
        let request: PredictRequest = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert_eq!(request.text, "");
    }

    #[test]
    fn test_request_must_be_an_object() {
        for body in ["[]", r#"["hi"]"#, "null", "42", r#""hi""#, r#"{"text": null}"#] {
            let err = serde_json::from_str::<PredictRequest>(body).unwrap_err();
            assert!(err.is_data(), "{}: {}", body, err);
        }
    }
}
