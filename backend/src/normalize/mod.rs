//! Row normalizer: raw export record -> validated [`Observation`].
//!
//! Each raw record is read through an ordered list of column aliases per
//! field. A row that cannot identify its school, grade or subject is
//! discarded and counted; everything else is kept, with a defaulted score
//! when the score cell is unusable.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::models::{GradeLevel, Observation, School, Subject};
use crate::parser::RawRecord;

// =============================================================================
// Column aliases
// =============================================================================

/// Columns holding `"<school name> (<code>)"`.
pub const SCHOOL_ALIASES: &[&str] = &["SchoolName", "School Name"];
/// Columns holding the grade.
pub const GRADE_ALIASES: &[&str] = &["Grade", "Grade Level", "AsmtGradeLevel"];
/// Columns holding the subject.
pub const SUBJECT_ALIASES: &[&str] = &["Subject", "SubjectName", "AsmtSubject"];
/// Columns holding the competency name.
pub const COMPETENCY_ALIASES: &[&str] = &["SkillName", "Competency Name", "Competency"];
/// Columns holding the 10-point score.
pub const SCORE_ALIASES: &[&str] = &["10 Point Score", "10-Point Score", "10Point Score"];

/// How many discarded rows are kept as diagnostics samples.
pub const MAX_DISCARD_SAMPLES: usize = 20;

static SCHOOL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\(").expect("valid school name regex"));
static SCHOOL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)\)").expect("valid school code regex"));
static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid grade regex"));

// =============================================================================
// Discards & summary
// =============================================================================

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiscardReason {
    MissingSchoolCode,
    InvalidGrade,
    InvalidSubject,
}

impl DiscardReason {
    pub fn describe(self) -> &'static str {
        match self {
            DiscardReason::MissingSchoolCode => "no school code in school name",
            DiscardReason::InvalidGrade => "grade is not 6, 7 or 8",
            DiscardReason::InvalidSubject => "subject is not one of the four canonical subjects",
        }
    }
}

/// A discarded row kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscardSample {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub reason: DiscardReason,
}

/// Counters for one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeSummary {
    pub total: usize,
    pub accepted: usize,
    pub discarded: usize,
    pub discarded_by_reason: BTreeMap<DiscardReason, usize>,
    /// Rows kept with a score defaulted to 0.0
    pub defaulted_scores: usize,
    pub samples: Vec<DiscardSample>,
}

/// Output of [`normalize_records`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutput {
    /// Schools in first-seen order
    pub schools: Vec<School>,
    pub observations: Vec<Observation>,
    pub summary: NormalizeSummary,
}

/// Outcome for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted {
        school: School,
        observation: Observation,
        score_defaulted: bool,
    },
    Discarded(DiscardReason),
}

// =============================================================================
// Normalizer
// =============================================================================

/// Stateful normalizer: accumulates schools, observations and counters.
#[derive(Debug, Default)]
pub struct RowNormalizer {
    schools: Vec<School>,
    school_index: HashMap<String, usize>,
    observations: Vec<Observation>,
    summary: NormalizeSummary,
}

impl RowNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one record. `row` is its 1-based position, used in samples.
    pub fn push(&mut self, row: usize, record: &RawRecord) -> Option<DiscardReason> {
        self.summary.total += 1;
        match normalize_row(record) {
            RowOutcome::Accepted { school, observation, score_defaulted } => {
                self.summary.accepted += 1;
                if score_defaulted {
                    self.summary.defaulted_scores += 1;
                }
                self.upsert_school(school);
                self.observations.push(observation);
                None
            }
            RowOutcome::Discarded(reason) => {
                self.summary.discarded += 1;
                *self.summary.discarded_by_reason.entry(reason).or_insert(0) += 1;
                if self.summary.samples.len() < MAX_DISCARD_SAMPLES {
                    self.summary.samples.push(DiscardSample { row, reason });
                }
                Some(reason)
            }
        }
    }

    /// First name seen for a code wins.
    fn upsert_school(&mut self, school: School) {
        if !self.school_index.contains_key(&school.school_code) {
            self.school_index.insert(school.school_code.clone(), self.schools.len());
            self.schools.push(school);
        }
    }

    pub fn summary(&self) -> &NormalizeSummary {
        &self.summary
    }

    pub fn finish(self) -> NormalizeOutput {
        NormalizeOutput {
            schools: self.schools,
            observations: self.observations,
            summary: self.summary,
        }
    }
}

/// Normalize a whole record set.
pub fn normalize_records(records: &[RawRecord]) -> NormalizeOutput {
    let mut normalizer = RowNormalizer::new();
    for (i, record) in records.iter().enumerate() {
        normalizer.push(i + 1, record);
    }
    normalizer.finish()
}

/// Normalize a single record without touching any counters.
pub fn normalize_row(record: &RawRecord) -> RowOutcome {
    let raw_school = field_text(record, SCHOOL_ALIASES).unwrap_or_default();
    let school = match extract_school(&raw_school) {
        Some(school) => school,
        None => return RowOutcome::Discarded(DiscardReason::MissingSchoolCode),
    };

    let grade = match field(record, GRADE_ALIASES).and_then(parse_grade) {
        Some(grade) => grade,
        None => return RowOutcome::Discarded(DiscardReason::InvalidGrade),
    };

    let subject = match field_text(record, SUBJECT_ALIASES).and_then(|s| Subject::from_exact(&s)) {
        Some(subject) => subject,
        None => return RowOutcome::Discarded(DiscardReason::InvalidSubject),
    };

    let competency = field_text(record, COMPETENCY_ALIASES).unwrap_or_default();

    let (score, score_defaulted) = match field(record, SCORE_ALIASES).and_then(parse_score) {
        Some(score) => (score, false),
        None => (0.0, true),
    };

    let observation = Observation::new(school.school_code.clone(), grade, subject, competency, score);
    RowOutcome::Accepted { school, observation, score_defaulted }
}

// =============================================================================
// Field helpers
// =============================================================================

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// First alias holding a non-empty value.
fn field<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| record.get(*alias))
        .find(|value| !is_blank(value))
}

/// Same as [`field`], as trimmed text.
fn field_text(record: &RawRecord, aliases: &[&str]) -> Option<String> {
    field(record, aliases).map(|value| match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    })
}

/// Split `"GPS Banar (101)"` into name and digit code.
pub fn extract_school(raw: &str) -> Option<School> {
    let raw = raw.trim();
    let code = SCHOOL_CODE_RE.captures(raw)?.get(1)?.as_str().to_string();
    let name = SCHOOL_NAME_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| raw.to_string());
    Some(School { school_code: code, school_name: name })
}

/// Leading integer of a number or string, restricted to 6..=8.
pub fn parse_grade(value: &Value) -> Option<GradeLevel> {
    let n = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => LEADING_INT_RE.captures(s)?.get(1)?.as_str().parse::<i64>().ok()?,
        _ => return None,
    };
    GradeLevel::new(n)
}

/// Finite float from a number or numeric string.
pub fn parse_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score.is_finite().then_some(score)
}
