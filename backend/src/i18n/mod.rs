//! Localization of report labels and competency names.
//!
//! Two read-only catalogs are built once per process:
//!
//! - UI labels, addressed through [`Label`]
//! - competency names, keyed by the English name found in the export
//!
//! Every lookup follows the same chain: requested language, then English,
//! then the key itself. Lookups never fail.
//!
//! ```rust,ignore
//! use schoolreport::i18n::{label, competency, Label};
//! use schoolreport::Lang;
//!
//! assert_eq!(label(Lang::Hi, Label::Score), "अंक");
//! assert_eq!(competency(Lang::Hi, "Vocabulary"), "शब्दावली");
//! assert_eq!(competency(Lang::Hi, "Unknown Skill"), "Unknown Skill");
//! ```

mod competencies;
mod labels;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::Lang;

/// A per-language string table.
pub struct Catalog {
    en: HashMap<&'static str, &'static str>,
    hi: HashMap<&'static str, &'static str>,
}

impl Catalog {
    fn from_pairs(en: &[(&'static str, &'static str)], hi: &[(&'static str, &'static str)]) -> Self {
        Self {
            en: en.iter().copied().collect(),
            hi: hi.iter().copied().collect(),
        }
    }

    fn table(&self, lang: Lang) -> &HashMap<&'static str, &'static str> {
        match lang {
            Lang::En => &self.en,
            Lang::Hi => &self.hi,
        }
    }

    /// Resolve `key` for `lang`, falling back to English, then to the key.
    pub fn resolve<'a>(&self, lang: Lang, key: &'a str) -> &'a str {
        let found = self.table(lang).get(key).or_else(|| self.en.get(key)).copied();
        match found {
            Some(text) if !text.is_empty() => text,
            _ => key,
        }
    }

    /// Keys of the English table.
    pub fn english_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.en.keys().copied()
    }
}

/// UI label catalog.
pub static LABELS: Lazy<Catalog> =
    Lazy::new(|| Catalog::from_pairs(labels::EN, labels::HI));

/// Competency name catalog.
pub static COMPETENCIES: Lazy<Catalog> =
    Lazy::new(|| Catalog::from_pairs(competencies::EN, competencies::HI));

/// Resolve a UI label key.
pub fn resolve<'a>(lang: Lang, key: &'a str) -> &'a str {
    LABELS.resolve(lang, key)
}

/// Resolve a UI label.
pub fn label(lang: Lang, label: Label) -> &'static str {
    LABELS.resolve(lang, label.key())
}

/// Resolve a competency name.
pub fn competency<'a>(lang: Lang, name: &'a str) -> &'a str {
    COMPETENCIES.resolve(lang, name)
}

/// Closed set of UI labels used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    ReportTitle,
    SchoolName,
    SchoolCode,
    OverallAverage,
    English,
    Mathematics,
    Science,
    SocialScience,
    NoData,
    SubjectwiseAverages,
    PriorityDistribution,
    Subject,
    AverageScore,
    HighPriority,
    MediumPriority,
    LowPriority,
    High,
    Medium,
    Low,
    Grade,
    Grade6,
    Grade7,
    Grade8,
    DetailedReport,
    Competency,
    Score,
    Priority,
}

impl Label {
    pub const ALL: [Label; 27] = [
        Label::ReportTitle,
        Label::SchoolName,
        Label::SchoolCode,
        Label::OverallAverage,
        Label::English,
        Label::Mathematics,
        Label::Science,
        Label::SocialScience,
        Label::NoData,
        Label::SubjectwiseAverages,
        Label::PriorityDistribution,
        Label::Subject,
        Label::AverageScore,
        Label::HighPriority,
        Label::MediumPriority,
        Label::LowPriority,
        Label::High,
        Label::Medium,
        Label::Low,
        Label::Grade,
        Label::Grade6,
        Label::Grade7,
        Label::Grade8,
        Label::DetailedReport,
        Label::Competency,
        Label::Score,
        Label::Priority,
    ];

    /// Catalog key.
    pub fn key(self) -> &'static str {
        match self {
            Label::ReportTitle => "report_title",
            Label::SchoolName => "school_name",
            Label::SchoolCode => "school_code",
            Label::OverallAverage => "overall_average",
            Label::English => "english",
            Label::Mathematics => "mathematics",
            Label::Science => "science",
            Label::SocialScience => "social_science",
            Label::NoData => "no_data",
            Label::SubjectwiseAverages => "subjectwise_averages",
            Label::PriorityDistribution => "priority_distribution",
            Label::Subject => "subject",
            Label::AverageScore => "average_score",
            Label::HighPriority => "high_priority",
            Label::MediumPriority => "medium_priority",
            Label::LowPriority => "low_priority",
            Label::High => "high",
            Label::Medium => "medium",
            Label::Low => "low",
            Label::Grade => "grade",
            Label::Grade6 => "grade_6",
            Label::Grade7 => "grade_7",
            Label::Grade8 => "grade_8",
            Label::DetailedReport => "detailed_report",
            Label::Competency => "competency",
            Label::Score => "score",
            Label::Priority => "priority",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_resolves_per_language() {
        assert_eq!(label(Lang::En, Label::Score), "Score");
        assert_eq!(label(Lang::Hi, Label::Score), "अंक");
        assert_eq!(label(Lang::Hi, Label::SocialScience), "सामाजिक विज्ञान");
    }

    #[test]
    fn test_every_label_exists_in_both_languages() {
        for l in Label::ALL {
            assert!(LABELS.en.contains_key(l.key()), "missing en label {}", l.key());
            assert!(LABELS.hi.contains_key(l.key()), "missing hi label {}", l.key());
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(resolve(Lang::Hi, "not_a_label"), "not_a_label");
        assert_eq!(competency(Lang::Hi, "Juggling"), "Juggling");
        assert_eq!(competency(Lang::En, ""), "");
    }

    #[test]
    fn test_english_only_competency_falls_back_to_english() {
        // Present in the English vocabulary, absent from Hindi.
        assert!(COMPETENCIES.en.contains_key("Understanding Democratic Governance"));
        assert!(!COMPETENCIES.hi.contains_key("Understanding Democratic Governance"));
        assert_eq!(
            competency(Lang::Hi, "Understanding Democratic Governance"),
            "Understanding Democratic Governance"
        );
    }

    #[test]
    fn test_resolution_is_total_and_non_empty() {
        for lang in [Lang::En, Lang::Hi] {
            for key in LABELS.english_keys() {
                assert!(!resolve(lang, key).is_empty(), "{} / {}", lang, key);
            }
            for key in COMPETENCIES.english_keys() {
                assert!(!competency(lang, key).is_empty(), "{} / {}", lang, key);
            }
        }
    }

    #[test]
    fn test_hindi_competency() {
        assert_eq!(competency(Lang::Hi, "Vocabulary"), "शब्दावली");
        assert_eq!(competency(Lang::En, "Vocabulary"), "Vocabulary");
    }
}
