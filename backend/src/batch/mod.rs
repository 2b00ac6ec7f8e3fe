//! Batch report generation.
//!
//! Schools are processed one after another, in dataset order. Each school
//! gets its own render budget; a failure or timeout is recorded and the batch
//! moves on. Dropping the future returned by [`run_batch`] cancels the whole
//! batch.
//!
//! With an output directory set, each artifact is written as soon as it is
//! rendered and only its path is kept in memory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::logs::{log_error_indent, log_info, log_success, log_success_indent, log_warning};
use crate::error::RenderError;
use crate::models::{Lang, ReportScope, School};
use crate::pipeline::report_request;
use crate::render::Renderer;
use crate::store::Dataset;

/// Delay policy between two schools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    #[default]
    None,
    Fixed(Duration),
}

impl Pacing {
    /// `Fixed` for a non-zero delay, `None` otherwise.
    pub fn from_delay(delay: Duration) -> Self {
        if delay.is_zero() {
            Pacing::None
        } else {
            Pacing::Fixed(delay)
        }
    }

    async fn wait(self) {
        if let Pacing::Fixed(delay) = self {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Options for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub lang: Lang,
    pub scope: ReportScope,
    /// Render budget per school
    pub timeout: Duration,
    pub pacing: Pacing,
    /// Write each artifact here as it is rendered
    pub output_dir: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            lang: Lang::En,
            scope: ReportScope::Full,
            timeout: Duration::from_secs(crate::config::DEFAULT_RENDER_TIMEOUT_SECS),
            pacing: Pacing::None,
            output_dir: None,
        }
    }
}

/// One rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub school_code: String,
    pub filename: String,
    /// Empty once the artifact has been written to `path`
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// One school that produced no artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub school_code: String,
    pub school_name: String,
    pub reason: String,
}

/// Final tally of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<BatchFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Render one report per school of `dataset`.
pub async fn run_batch<R: Renderer>(dataset: &Dataset, renderer: &R, options: &BatchOptions) -> BatchReport {
    let batch_id = Uuid::new_v4();
    let started_at = Utc::now();
    let total = dataset.schools.len();

    log_info(format!("📦 Batch {}: {} schools ({}, {})", batch_id, total, options.lang, options.scope.slug()));

    let mut artifacts = Vec::new();
    let mut failures = Vec::new();

    for (i, school) in dataset.schools.iter().enumerate() {
        if i > 0 {
            options.pacing.wait().await;
        }
        log_info(format!("[{}/{}] {} ({})", i + 1, total, school.school_name, school.school_code));

        match render_school(dataset, school, renderer, options).await {
            Ok(artifact) => {
                log_success_indent(format!("{} ({} bytes)", artifact.filename, artifact.size), 1);
                artifacts.push(artifact);
            }
            Err(reason) => {
                log_error_indent(reason.clone(), 1);
                failures.push(BatchFailure {
                    school_code: school.school_code.clone(),
                    school_name: school.school_name.clone(),
                    reason,
                });
            }
        }
    }

    let report = BatchReport {
        batch_id,
        total,
        succeeded: artifacts.len(),
        failed: failures.len(),
        artifacts,
        failures,
        started_at,
        finished_at: Utc::now(),
    };

    if report.failed == 0 {
        log_success(format!("Batch complete: {}/{} reports", report.succeeded, report.total));
    } else {
        log_warning(format!(
            "Batch complete: {}/{} reports, {} failed",
            report.succeeded, report.total, report.failed
        ));
    }
    report
}

async fn render_school<R: Renderer>(
    dataset: &Dataset,
    school: &School,
    renderer: &R,
    options: &BatchOptions,
) -> Result<Artifact, String> {
    let request = report_request(dataset, &school.school_code, options.lang, options.scope)
        .map_err(|e| e.to_string())?;
    let document = request.build().map_err(|e| e.to_string())?;

    let bytes = match tokio::time::timeout(options.timeout, renderer.render(&request, &document)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => return Err(e.to_string()),
        Err(_) => return Err(RenderError::Timeout(options.timeout).to_string()),
    };
    if bytes.is_empty() {
        return Err(RenderError::EmptyOutput.to_string());
    }

    let filename = request.filename(renderer.extension());
    let size = bytes.len();
    let (bytes, path) = match options.output_dir {
        Some(ref dir) => {
            let path = dir.join(&filename);
            write_artifact(&path, &bytes)
                .await
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            (Vec::new(), Some(path))
        }
        None => (bytes, None),
    };

    Ok(Artifact { school_code: school.school_code.clone(), filename, bytes, size, path })
}

async fn write_artifact(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}
