//! # School Report - assessment exports to per-school report cards
//!
//! Turns a raw competency-score export (one row per school, grade, subject
//! and competency) into per-school averages and localized report documents,
//! then renders them one school at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌────────────┐   ┌───────────┐   ┌──────────┐
//! │  Export   │──▶│  Parser  │──▶│ Normalizer │──▶│ Aggregator│──▶│  Dataset │
//! │ CSV/XLSX  │   │(auto-enc)│   │ (discards) │   │  (means)  │   │  (JSON)  │
//! └───────────┘   └──────────┘   └────────────┘   └───────────┘   └────┬─────┘
//!                                                                      │
//!                 ┌──────────┐   ┌────────────┐   ┌───────────┐        │
//!                 │ Artifact │◀──│  Renderer  │◀──│  Document │◀───────┘
//!                 │ md / pdf │   │ text/http  │   │  Builder  │  (i18n)
//!                 └──────────┘   └────────────┘   └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use schoolreport::{import_file, run_batch, BatchOptions, ImportOptions, TextRenderer};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let imported = import_file(Path::new("scores.csv"), ImportOptions::default()).unwrap();
//!     let report = run_batch(&imported.dataset, &TextRenderer::new(), &BatchOptions::default()).await;
//!     println!("{} reports, {} failures", report.succeeded, report.failed);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`models`] - Domain models (School, Observation, Aggregates, PriorityBand)
//! - [`parser`] - CSV / JSON / XLSX parsing with auto-detection
//! - [`normalize`] - Raw rows to validated observations
//! - [`aggregate`] - Per-school averages
//! - [`i18n`] - Label and competency translations
//! - [`validation`] - Request schema validation
//! - [`report`] - Request contract, document model and builder
//! - [`render`] - Renderers (text, HTTP)
//! - [`store`] - Flat JSON dataset files
//! - [`pipeline`] - Import orchestration
//! - [`batch`] - Sequential per-school rendering
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP API server and log streaming

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Reference data
pub mod i18n;

// Import
pub mod aggregate;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod store;

// Reports
pub mod batch;
pub mod render;
pub mod report;
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BuildError, ConfigError, InputError, PipelineError, RenderError, RequestError, ServerError,
    StoreError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Aggregates, GradeLevel, Lang, Observation, PriorityBand, ReportScope, School, Subject};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::AppConfig;

// =============================================================================
// Re-exports - Parsing & normalization
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto, parse_xlsx,
    ParseResult, RawRecord,
};

pub use normalize::{normalize_records, DiscardReason, NormalizeSummary, RowNormalizer};

pub use aggregate::{aggregate, aggregate_all, mean};

// =============================================================================
// Re-exports - Pipeline & store
// =============================================================================

pub use pipeline::{import_bytes, import_file, import_records, report_request, ImportOptions, ImportResult};

pub use store::{Dataset, DatasetStore};

// =============================================================================
// Re-exports - Reports & rendering
// =============================================================================

pub use report::{build_document, Block, Cell, Document, Page, ReportRequest, Table};

pub use render::{AnyRenderer, HttpRenderer, Renderer, TextRenderer};

pub use batch::{run_batch, Artifact, BatchFailure, BatchOptions, BatchReport, Pacing};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
