//! Error types for the school report pipeline.
//!
//! This module defines one error type per concern:
//!
//! - [`InputError`] - the raw export cannot be read at all (fatal input)
//! - [`RequestError`] - a document request fails validation
//! - [`BuildError`] - the document builder rejects inconsistent data
//! - [`RenderError`] - the rendering collaborator failed or timed out
//! - [`StoreError`] - the flat JSON dataset cannot be read or written
//! - [`ConfigError`] - an environment setting is malformed
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Per-row discards are not errors: they are counted by the normalizer
//! (see [`crate::normalize::DiscardReason`]).
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Input Errors (fatal)
// =============================================================================

/// Errors while reading the raw assessment export.
///
/// Any of these aborts the whole import run.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read the file.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes could not be decoded.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// Invalid CSV structure.
    #[error("Invalid CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    /// Invalid JSON export.
    #[error("Invalid JSON export: {0}")]
    Json(#[from] serde_json::Error),

    /// Unreadable spreadsheet workbook.
    #[error("Invalid workbook: {0}")]
    Workbook(String),

    /// The export holds no data rows.
    #[error("Input is empty")]
    Empty,

    /// No header line found.
    #[error("No headers found in input")]
    NoHeaders,
}

// =============================================================================
// Request Errors
// =============================================================================

/// A document request that cannot be honoured.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request does not match the request schema.
    #[error("Invalid report request: {}", errors.join("; "))]
    Schema { errors: Vec<String> },

    /// A field is present but semantically wrong.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// The request body is not valid JSON for the contract.
    #[error("Malformed report request: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Build Errors
// =============================================================================

/// Errors raised by the report document builder.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An observation belongs to another school.
    #[error("Observation for school '{found}' passed to report of school '{expected}'")]
    ForeignObservation { expected: String, found: String },

    /// The aggregates belong to another school.
    #[error("Aggregates for school '{found}' passed to report of school '{expected}'")]
    ForeignAggregates { expected: String, found: String },
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors from the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer refused or crashed.
    #[error("Renderer failed: {0}")]
    Failed(String),

    /// HTTP transport error.
    #[error("Renderer request failed: {0}")]
    Http(String),

    /// The renderer answered with a non-success status.
    #[error("Renderer returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The renderer produced no bytes.
    #[error("Renderer returned an empty document")]
    EmptyOutput,

    /// No answer within the per-school budget.
    #[error("Render timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        RenderError::Http(err.to_string())
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the flat-file dataset store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("Dataset IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON error.
    #[error("Dataset JSON error in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value '{value}' for {name}: {message}")]
    InvalidValue {
        name: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::pipeline::import_file`] and
/// the CLI commands. It wraps all lower-level errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fatal input error.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Request validation error.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Document builder error.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Dataset store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// No school matches the requested code.
    #[error("Unknown school code: {0}")]
    UnknownSchool(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input reading.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for request validation.
pub type RequestResult<T> = Result<T, RequestError>;

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for dataset store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // InputError -> PipelineError
        let input_err = InputError::Empty;
        let pipeline_err: PipelineError = input_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // BuildError -> PipelineError
        let build_err = BuildError::ForeignObservation {
            expected: "101".into(),
            found: "202".into(),
        };
        let pipeline_err: PipelineError = build_err.into();
        assert!(pipeline_err.to_string().contains("202"));
    }

    #[test]
    fn test_schema_error_lists_all_messages() {
        let err = RequestError::Schema {
            errors: vec!["\"school_code\" is a required property".into(), "bad lang".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("school_code"));
        assert!(msg.contains("bad lang"));
    }

    #[test]
    fn test_timeout_message() {
        let err = RenderError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("30s"));
    }
}
