//! Domain models for the school report pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`School`] - School identity extracted from the raw export
//! - [`Observation`] - One validated competency score
//! - [`Aggregates`] - Per-school averages along four dimensions
//! - [`Subject`] / [`GradeLevel`] - The fixed assessment vocabulary
//! - [`PriorityBand`] - Priority classification of a score
//! - [`Lang`] / [`ReportScope`] - Report options

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::i18n::Label;

// =============================================================================
// Subject
// =============================================================================

/// One of the four assessed subjects.
///
/// Serialized with the exact display name used by the raw export
/// (`"Social Science"` keeps its space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    English,
    Mathematics,
    Science,
    #[serde(rename = "Social Science")]
    SocialScience,
}

impl Subject {
    /// All subjects, in canonical report order.
    pub const ALL: [Subject; 4] = [
        Subject::English,
        Subject::Mathematics,
        Subject::Science,
        Subject::SocialScience,
    ];

    /// Canonical name as it appears in the export.
    pub fn name(self) -> &'static str {
        match self {
            Subject::English => "English",
            Subject::Mathematics => "Mathematics",
            Subject::Science => "Science",
            Subject::SocialScience => "Social Science",
        }
    }

    /// Exact, case-sensitive match against the canonical names.
    pub fn from_exact(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == value)
    }

    /// UI label for this subject.
    pub fn label(self) -> Label {
        match self {
            Subject::English => Label::English,
            Subject::Mathematics => Label::Mathematics,
            Subject::Science => Label::Science,
            Subject::SocialScience => Label::SocialScience,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Grade Level
// =============================================================================

/// An assessed grade: 6, 7 or 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GradeLevel(u8);

impl GradeLevel {
    pub const SIX: GradeLevel = GradeLevel(6);
    pub const SEVEN: GradeLevel = GradeLevel(7);
    pub const EIGHT: GradeLevel = GradeLevel(8);

    /// All grades, ascending.
    pub const ALL: [GradeLevel; 3] = [GradeLevel::SIX, GradeLevel::SEVEN, GradeLevel::EIGHT];

    /// Accept only 6, 7 and 8.
    pub fn new(value: i64) -> Option<Self> {
        match value {
            6..=8 => Some(GradeLevel(value as u8)),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// UI label ("Grade 6", ...).
    pub fn label(self) -> Label {
        match self.0 {
            6 => Label::Grade6,
            7 => Label::Grade7,
            _ => Label::Grade8,
        }
    }
}

impl TryFrom<u8> for GradeLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GradeLevel::new(i64::from(value)).ok_or_else(|| format!("grade {} is not one of 6, 7, 8", value))
    }
}

impl From<GradeLevel> for u8 {
    fn from(grade: GradeLevel) -> Self {
        grade.0
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Priority Band
// =============================================================================

/// Intervention priority derived from a 10-point score.
///
/// Inversely related to performance: a low score means high priority.
/// Boundaries are half-open: `[.., 5)` High, `[5, 7)` Medium, `[7, ..]` Low.
/// The default is the band of a 0.0 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PriorityBand {
    #[default]
    High,
    Medium,
    Low,
}

impl PriorityBand {
    /// Lower bound of the Medium band.
    pub const MEDIUM_FROM: f64 = 5.0;
    /// Lower bound of the Low band.
    pub const LOW_FROM: f64 = 7.0;

    /// Classify a score. Total over all `f64`: NaN falls into High.
    pub fn classify(score: f64) -> Self {
        if score >= Self::LOW_FROM {
            PriorityBand::Low
        } else if score >= Self::MEDIUM_FROM {
            PriorityBand::Medium
        } else {
            PriorityBand::High
        }
    }

    /// Sort rank: High=1, Medium=2, Low=3.
    pub fn rank(self) -> u8 {
        match self {
            PriorityBand::High => 1,
            PriorityBand::Medium => 2,
            PriorityBand::Low => 3,
        }
    }

    /// One-letter column marker used in the distribution grids.
    pub fn marker(self) -> &'static str {
        match self {
            PriorityBand::High => "H",
            PriorityBand::Medium => "M",
            PriorityBand::Low => "L",
        }
    }

    /// Short UI label ("High").
    pub fn label(self) -> Label {
        match self {
            PriorityBand::High => Label::High,
            PriorityBand::Medium => Label::Medium,
            PriorityBand::Low => Label::Low,
        }
    }

    /// Legend label with the score range.
    pub fn legend_label(self) -> Label {
        match self {
            PriorityBand::High => Label::HighPriority,
            PriorityBand::Medium => Label::MediumPriority,
            PriorityBand::Low => Label::LowPriority,
        }
    }

    pub const ALL: [PriorityBand; 3] = [PriorityBand::High, PriorityBand::Medium, PriorityBand::Low];
}

// =============================================================================
// School & Observation
// =============================================================================

/// A school, identified by the digit code found in the raw name field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub school_code: String,
    pub school_name: String,
}

/// One validated competency score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub school_code: String,
    pub grade_level: GradeLevel,
    pub subject: Subject,
    pub competency_name: String,
    #[serde(alias = "score_10")]
    pub score: f64,
    #[serde(default)]
    pub priority_band: PriorityBand,
}

impl Observation {
    /// Create an observation; the band is derived from the score.
    pub fn new(
        school_code: impl Into<String>,
        grade_level: GradeLevel,
        subject: Subject,
        competency_name: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            school_code: school_code.into(),
            grade_level,
            subject,
            competency_name: competency_name.into(),
            score,
            priority_band: PriorityBand::classify(score),
        }
    }

    /// Re-derive the band, for observations that came from outside.
    pub fn reclassified(mut self) -> Self {
        self.priority_band = PriorityBand::classify(self.score);
        self
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Per-school averages. `None` means "no data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub school_code: String,
    pub overall_avg: Option<f64>,
    pub subject_avg_map: BTreeMap<Subject, Option<f64>>,
    #[serde(default)]
    pub grade_avg_map: BTreeMap<GradeLevel, Option<f64>>,
    #[serde(default)]
    pub grade_subject_avg_map: BTreeMap<GradeLevel, BTreeMap<Subject, Option<f64>>>,
}

impl Aggregates {
    pub fn subject_avg(&self, subject: Subject) -> Option<f64> {
        self.subject_avg_map.get(&subject).copied().flatten()
    }

    pub fn grade_avg(&self, grade: GradeLevel) -> Option<f64> {
        self.grade_avg_map.get(&grade).copied().flatten()
    }

    pub fn grade_subject_avg(&self, grade: GradeLevel, subject: Subject) -> Option<f64> {
        self.grade_subject_avg_map
            .get(&grade)
            .and_then(|m| m.get(&subject))
            .copied()
            .flatten()
    }
}

// =============================================================================
// Report Options
// =============================================================================

/// Report language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Hi,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Hi => "hi",
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "hi" => Ok(Lang::Hi),
            other => Err(format!("unsupported language '{}' (expected en or hi)", other)),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "grade", rename_all = "lowercase")]
pub enum ReportScope {
    /// All three grades.
    #[default]
    Full,
    /// A single grade.
    Grade(GradeLevel),
}

impl ReportScope {
    /// Grades covered by this scope.
    pub fn grades(self) -> Vec<GradeLevel> {
        match self {
            ReportScope::Full => GradeLevel::ALL.to_vec(),
            ReportScope::Grade(g) => vec![g],
        }
    }

    /// Filename fragment: `full` or `grade7`.
    pub fn slug(self) -> String {
        match self {
            ReportScope::Full => "full".to_string(),
            ReportScope::Grade(g) => format!("grade{}", g),
        }
    }
}
