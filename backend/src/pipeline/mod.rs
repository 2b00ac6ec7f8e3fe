//! High-level import API: raw export -> normalized, aggregated dataset.
//!
//! Combines parsing, row normalization and aggregation, and optionally
//! writes the result to a [`DatasetStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use schoolreport::pipeline::{import_file, ImportOptions};
//! use std::path::Path;
//!
//! let result = import_file(Path::new("Schoolwise_Skill_Scores.csv"), ImportOptions::default())?;
//! println!("{} schools, {} observations", result.dataset.schools.len(), result.dataset.observations.len());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::aggregate::aggregate_all;
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{Lang, ReportScope};
use crate::normalize::{normalize_records, DiscardReason, NormalizeSummary};
use crate::parser::{parse_bytes_auto, parse_file_auto, ParseResult, RawRecord, WORKBOOK_ENCODING};
use crate::report::ReportRequest;
use crate::store::{Dataset, DatasetStore};

/// Options for an import run
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Write the dataset here when set
    pub output_dir: Option<PathBuf>,
}

/// Input file information
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    pub encoding: String,
    /// `None` for JSON and workbook input
    pub delimiter: Option<char>,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of an import run
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub dataset: Dataset,
    pub summary: NormalizeSummary,
    pub input: InputInfo,
}

/// Import an export file (CSV, JSON rows or XLSX).
pub fn import_file(path: &Path, options: ImportOptions) -> PipelineResult<ImportResult> {
    log_info(format!("📖 Reading {}...", path.display()));
    let parsed = parse_file_auto(path)?;
    import_parsed(parsed, options)
}

/// Import raw bytes (CSV, JSON rows or XLSX).
pub fn import_bytes(bytes: &[u8], options: ImportOptions) -> PipelineResult<ImportResult> {
    let parsed = parse_bytes_auto(bytes)?;
    import_parsed(parsed, options)
}

/// Import already-parsed records.
pub fn import_records(records: Vec<RawRecord>, options: ImportOptions) -> PipelineResult<ImportResult> {
    let parsed = ParseResult {
        headers: records.first().map(|r| r.keys().cloned().collect()).unwrap_or_default(),
        records,
        encoding: "utf-8".to_string(),
        delimiter: None,
    };
    import_parsed(parsed, options)
}

fn import_parsed(parsed: ParseResult, options: ImportOptions) -> PipelineResult<ImportResult> {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    match parsed.delimiter {
        Some(d) => log_success(format!("Detected separator: '{}'", format_delimiter(d))),
        None if parsed.encoding == WORKBOOK_ENCODING => log_success("Detected XLSX workbook (first sheet)"),
        None => log_success("Detected JSON rows"),
    }
    log_success(format!("Read {} rows, {} columns", parsed.records.len(), parsed.headers.len()));

    let input = InputInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.headers.clone(),
        row_count: parsed.records.len(),
    };

    log_info("🔎 Normalizing rows...");
    let normalized = normalize_records(&parsed.records);
    print_summary(&normalized.summary);

    if normalized.summary.accepted == 0 {
        log_warning(format!("No usable rows among {}, the dataset is empty", normalized.summary.total));
    }

    log_info("📊 Aggregating...");
    let aggregates = aggregate_all(&normalized.observations);
    log_success(format!("{} schools aggregated", aggregates.len()));

    let dataset = Dataset {
        schools: normalized.schools,
        observations: normalized.observations,
        aggregates,
    };

    if let Some(ref dir) = options.output_dir {
        let store = DatasetStore::with_dir(dir);
        store.save(&dataset)?;
        log_success(format!("Dataset written to {}", store.dir().display()));
    }

    Ok(ImportResult { dataset, summary: normalized.summary, input })
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

fn print_summary(summary: &NormalizeSummary) {
    log_success(format!("Accepted {} of {} rows", summary.accepted, summary.total));
    if summary.defaulted_scores > 0 {
        log_warning(format!("{} rows had no usable score (counted as 0.0)", summary.defaulted_scores));
    }
    if summary.discarded == 0 {
        return;
    }
    log_warning(format!("{} rows discarded", summary.discarded));

    let mut rows_by_reason: HashMap<DiscardReason, Vec<usize>> = HashMap::new();
    for sample in &summary.samples {
        rows_by_reason.entry(sample.reason).or_default().push(sample.row);
    }
    for (reason, count) in &summary.discarded_by_reason {
        let rows: Vec<String> = rows_by_reason
            .get(reason)
            .map(|r| r.iter().take(5).map(|n| n.to_string()).collect())
            .unwrap_or_default();
        log_info_indent(format!("• {}: {} (rows: {})", reason.describe(), count, rows.join(", ")), 1);
    }
}

/// Assemble the document request for one school of a dataset.
pub fn report_request(
    dataset: &Dataset,
    school_code: &str,
    lang: Lang,
    scope: ReportScope,
) -> PipelineResult<ReportRequest> {
    let school = dataset
        .school(school_code)
        .ok_or_else(|| PipelineError::UnknownSchool(school_code.to_string()))?;
    Ok(ReportRequest::new(
        school.clone(),
        dataset.aggregates_for(school_code).cloned(),
        dataset.observations_for(school_code),
        lang,
        scope,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GradeLevel, Subject};
    use tempfile::tempdir;

    const CSV: &str = "SchoolName;Grade;Subject;SkillName;10 Point Score\n\
GPS Banar (101);6;Mathematics;Lines and Angles;3\n\
GPS Banar (101);6;Mathematics;Perimeter and Area;7\n\
GUPS Mandore (202);8;English;Vocabulary;8.5\n\
Unknown School;6;English;Vocabulary;5\n\
GPS Banar (101);6;Hindi;Vocabulary;5\n";

    #[test]
    fn test_import_bytes() {
        let result = import_bytes(CSV.as_bytes(), ImportOptions::default()).unwrap();

        assert_eq!(result.input.delimiter, Some(';'));
        assert_eq!(result.input.row_count, 5);
        assert_eq!(result.summary.accepted, 3);
        assert_eq!(result.summary.discarded, 2);
        assert_eq!(result.dataset.schools.len(), 2);

        let agg = result.dataset.aggregates_for("101").unwrap();
        assert_eq!(agg.subject_avg(Subject::Mathematics), Some(5.0));
        assert_eq!(agg.grade_avg(GradeLevel::SEVEN), None);
    }

    #[test]
    fn test_import_writes_dataset() {
        let dir = tempdir().unwrap();
        let options = ImportOptions { output_dir: Some(dir.path().to_path_buf()) };
        let result = import_bytes(CSV.as_bytes(), options).unwrap();

        let loaded = DatasetStore::with_dir(dir.path()).load().unwrap();
        assert_eq!(loaded, result.dataset);
    }

    #[test]
    fn test_all_rows_discarded_still_summarized() {
        let dir = tempdir().unwrap();
        let csv = "SchoolName;Grade;Subject;SkillName;10 Point Score\nGPS Banar (101);9;English;Vocabulary;5\n";
        let options = ImportOptions { output_dir: Some(dir.path().to_path_buf()) };
        let result = import_bytes(csv.as_bytes(), options).unwrap();

        assert_eq!(result.summary.total, 1);
        assert_eq!(result.summary.accepted, 0);
        assert_eq!(result.summary.discarded_by_reason.get(&DiscardReason::InvalidGrade), Some(&1));
        assert!(result.dataset.schools.is_empty());

        // Empty files are still written
        let loaded = DatasetStore::with_dir(dir.path()).load().unwrap();
        assert_eq!(loaded, Dataset::default());
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let err = import_bytes(b"", ImportOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));
    }

    #[test]
    fn test_report_request_for_school() {
        let result = import_bytes(CSV.as_bytes(), ImportOptions::default()).unwrap();
        let request = report_request(&result.dataset, "101", Lang::En, ReportScope::Full).unwrap();
        assert_eq!(request.competencies.len(), 2);
        assert!(request.aggregates.is_some());

        let err = report_request(&result.dataset, "999", Lang::En, ReportScope::Full).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownSchool(_)));
    }
}
