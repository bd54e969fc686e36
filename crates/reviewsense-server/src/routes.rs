//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reviewsense_core::{
    BatchRequest, BatchSentimentResponse, Error, ErrorKind, ReviewRequest, SentimentResponse,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::state::AppState;

const SERVICE_NAME: &str = "Review Sentiment Analysis API";

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.cors_allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let api_routes = Router::new()
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .route("/health", get(health_check));

    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .route("/metrics", get(metrics))
        .nest(&config.api_prefix, api_routes)
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "docs_url": "/docs",
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Machine-readable index of the endpoints
async fn docs(State(state): State<AppState>) -> Json<Value> {
    let prefix = &state.config.api_prefix;

    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": state.analyzer.classifier_name(),
        "max_words": state.analyzer.policy().max_words(),
        "max_batch_size": reviewsense_core::MAX_BATCH_SIZE,
        "endpoints": [
            {
                "method": "POST",
                "path": format!("{}/analyze", prefix),
                "summary": "Analyze the sentiment of a single review",
                "request": {
                    "text": "string, required, at least 1 character",
                    "review_id": "string, optional",
                    "source": "string, optional",
                    "truncate": "boolean, default true",
                },
            },
            {
                "method": "POST",
                "path": format!("{}/analyze/batch", prefix),
                "summary": "Analyze the sentiment of up to 100 reviews",
                "request": {
                    "reviews": "array of review objects, 1 to 100 items",
                    "truncate": "boolean, default true, applies to reviews without their own flag",
                },
            },
            {
                "method": "GET",
                "path": format!("{}/health", prefix),
                "summary": "Liveness check",
            },
            {
                "method": "GET",
                "path": "/metrics",
                "summary": "Prometheus metrics",
            },
        ],
    }))
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}

#[tracing::instrument(
    name = "analyze",
    skip_all,
    fields(request_id = %uuid::Uuid::new_v4())
)]
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<SentimentResponse>, ApiError> {
    metrics::counter!("reviewsense_requests_total", "endpoint" => "analyze").increment(1);

    let Json(review) = payload?;
    info!(
        review_id = review.review_id.as_deref().unwrap_or("-"),
        "Analyzing review"
    );

    let response = state
        .analyzer
        .analyze(&review)
        .await
        .map_err(|e| ApiError::from_analysis(e, "Error analyzing sentiment"))?;

    Ok(Json(response))
}

#[tracing::instrument(
    name = "analyze_batch",
    skip_all,
    fields(request_id = %uuid::Uuid::new_v4())
)]
async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchSentimentResponse>, ApiError> {
    metrics::counter!("reviewsense_requests_total", "endpoint" => "analyze_batch").increment(1);

    let Json(batch) = payload?;
    info!(reviews = batch.len(), "Analyzing review batch");

    let response = state
        .analyzer
        .analyze_batch(&batch)
        .await
        .map_err(|e| ApiError::from_analysis(e, "Error analyzing batch sentiment"))?;

    Ok(Json(response))
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}

/// Error handling
#[derive(Debug)]
pub enum ApiError {
    /// Body is not valid JSON or violates the request schema
    InvalidRequest(String),
    /// Text too long with truncation disabled
    PolicyViolation(String),
    /// Classifier or other server-side failure
    AnalysisFailed { kind: ErrorKind, message: String },
    /// Body could not be read at all (too large, aborted)
    Rejected { status: StatusCode, message: String },
    NotFound,
}

impl ApiError {
    /// Map an analysis error, prefixing server-side failures with `context`
    pub fn from_analysis(err: Error, context: &str) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::InvalidRequest(err.to_string()),
            ErrorKind::LengthPolicy => Self::PolicyViolation(err.to_string()),
            kind => Self::AnalysisFailed {
                kind,
                message: format!("{}: {}", context, err),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PolicyViolation(_) => StatusCode::BAD_REQUEST,
            Self::AnalysisFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => ErrorKind::Validation.as_str(),
            Self::PolicyViolation(_) => ErrorKind::LengthPolicy.as_str(),
            Self::AnalysisFailed { kind, .. } => kind.as_str(),
            Self::Rejected { .. } => "request_error",
            Self::NotFound => "not_found",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                Self::InvalidRequest(rejection.body_text())
            }
            other => Self::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();

        if status.is_server_error() {
            warn!(error_type, "Request failed: {:?}", self);
        }
        if status != StatusCode::NOT_FOUND {
            metrics::counter!("reviewsense_errors_total", "type" => error_type).increment(1);
        }

        let detail = match self {
            Self::InvalidRequest(msg) | Self::PolicyViolation(msg) => msg,
            Self::AnalysisFailed { message, .. } | Self::Rejected { message, .. } => message,
            Self::NotFound => "Not Found".to_string(),
        };

        let body = json!({
            "detail": detail,
            "type": error_type,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from_analysis(Error::validation("bad"), "ctx");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from_analysis(Error::length_policy("Text exceeds"), "ctx");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from_analysis(Error::classifier("boom"), "Error analyzing sentiment");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            ApiError::AnalysisFailed { kind, message } => {
                assert_eq!(kind, ErrorKind::Classifier);
                assert_eq!(message, "Error analyzing sentiment: classifier error: boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_internal_errors_are_server_errors() {
        let err = ApiError::from_analysis(Error::internal("oops"), "ctx");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "internal_error");
    }
}
