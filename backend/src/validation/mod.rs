//! JSON Schema validation for report requests.
//!
//! The request schema is embedded at compile time from
//! `schemas/report-request.json` and compiled once (Draft 7).
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use schoolreport::validation::validate_report_request;
//!
//! let request = json!({
//!     "school": { "school_code": "101", "school_name": "GPS Banar" },
//!     "lang": "hi",
//!     "reportType": "grade",
//!     "gradeLevel": 7
//! });
//! assert!(validate_report_request(&request).is_ok());
//! ```

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

const REPORT_REQUEST_SCHEMA: &str = include_str!("../../schemas/report-request.json");

static REPORT_REQUEST_VALIDATOR: Lazy<Result<Validator, String>> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(REPORT_REQUEST_SCHEMA)
        .map_err(|e| format!("Invalid embedded schema: {}", e))?;
    jsonschema::draft7::new(&schema).map_err(|e| format!("Invalid embedded schema: {}", e))
});

/// Validate a document request against the embedded request schema.
///
/// Returns every validation message, not only the first.
pub fn validate_report_request(data: &Value) -> Result<(), Vec<String>> {
    match REPORT_REQUEST_VALIDATOR.as_ref() {
        Ok(validator) => collect_errors(validator, data),
        Err(e) => Err(vec![e.clone()]),
    }
}

fn collect_errors(validator: &Validator, data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
