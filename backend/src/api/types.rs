//! REST API types.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{BuildError, RenderError, RequestError};
use crate::report::{Document, ReportRequest};

/// Response of `POST /api/document`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    /// Unique job identifier
    pub job_id: String,
    /// Filename a rendered artifact would get, without extension
    pub basename: String,
    pub document: Document,
}

impl DocumentResponse {
    pub fn new(request: &ReportRequest, document: Document) -> Self {
        let filename = request.filename("");
        Self {
            job_id: Uuid::new_v4().to_string(),
            basename: filename.trim_end_matches('.').to_string(),
            document,
        }
    }
}

/// Error tuple returned by handlers.
pub type ApiError = (StatusCode, Json<Value>);

/// Build a JSON error body.
pub fn error_response(message: &str) -> Value {
    json!({
        "status": "error",
        "error": message
    })
}

/// Same as [`error_response`], with the list of validation messages.
pub fn validation_error_response(message: &str, errors: &[String]) -> Value {
    json!({
        "status": "error",
        "error": message,
        "errors": errors
    })
}

pub fn request_error(err: RequestError) -> ApiError {
    let body = match &err {
        RequestError::Schema { errors } => validation_error_response("Invalid report request", errors),
        other => error_response(&other.to_string()),
    };
    (StatusCode::BAD_REQUEST, Json(body))
}

pub fn build_error(err: BuildError) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response(&err.to_string())))
}

pub fn render_error(err: RenderError) -> ApiError {
    let status = match err {
        RenderError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(error_response(&err.to_string())))
}

/// MIME type for an artifact extension.
pub fn content_type(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "md" => "text/markdown; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "html" => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
