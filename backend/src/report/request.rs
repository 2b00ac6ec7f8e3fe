//! Typed document request.
//!
//! The wire shape is the one the rendering service has always accepted:
//!
//! ```json
//! {
//!   "school": { "school_code": "101", "school_name": "GPS Banar" },
//!   "aggregates": { "school_code": "101", "overall_avg": 5.3, ... },
//!   "competencies": [ { "school_code": "101", "grade_level": 6, ... } ],
//!   "lang": "hi",
//!   "reportType": "grade",
//!   "gradeLevel": 7
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BuildError, RequestError, RequestResult};
use crate::models::{Aggregates, GradeLevel, Lang, Observation, ReportScope, School};
use crate::validation::validate_report_request;

use super::builder::build_document;
use super::document::Document;

/// `reportType` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Full,
    Grade,
}

/// A validated request for one school report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub school: School,
    #[serde(default)]
    pub aggregates: Option<Aggregates>,
    #[serde(default)]
    pub competencies: Vec<Observation>,
    #[serde(default)]
    pub lang: Lang,
    #[serde(default)]
    pub report_type: ReportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<GradeLevel>,
}

impl ReportRequest {
    /// Assemble a request from already validated parts. Bands are
    /// recomputed from the scores.
    pub fn new(
        school: School,
        aggregates: Option<Aggregates>,
        competencies: Vec<Observation>,
        lang: Lang,
        scope: ReportScope,
    ) -> Self {
        let (report_type, grade_level) = match scope {
            ReportScope::Full => (ReportType::Full, None),
            ReportScope::Grade(g) => (ReportType::Grade, Some(g)),
        };
        let competencies = competencies.into_iter().map(Observation::reclassified).collect();
        Self { school, aggregates, competencies, lang, report_type, grade_level }
    }

    /// Validate a JSON value and convert it.
    ///
    /// Schema messages are all collected. Bands carried by incoming
    /// observations are recomputed from their scores.
    pub fn from_value(value: Value) -> RequestResult<Self> {
        validate_report_request(&value).map_err(|errors| RequestError::Schema { errors })?;
        let mut request: ReportRequest = serde_json::from_value(value)?;
        request.school.school_code = request.school.school_code.trim().to_string();
        request.school.school_name = request.school.school_name.trim().to_string();
        request.competencies = request
            .competencies
            .into_iter()
            .map(Observation::reclassified)
            .collect();
        request.scope()?;
        Ok(request)
    }

    /// Parse and validate a JSON body.
    pub fn from_json(body: &str) -> RequestResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Scope implied by `reportType` and `gradeLevel`.
    pub fn scope(&self) -> RequestResult<ReportScope> {
        match (self.report_type, self.grade_level) {
            (ReportType::Full, _) => Ok(ReportScope::Full),
            (ReportType::Grade, Some(g)) => Ok(ReportScope::Grade(g)),
            (ReportType::Grade, None) => Err(RequestError::InvalidValue {
                field: "gradeLevel".to_string(),
                message: "required when reportType is 'grade'".to_string(),
            }),
        }
    }

    /// `<school_code>_<scope>_<lang>.<ext>`
    pub fn filename(&self, extension: &str) -> String {
        let scope = self.scope().unwrap_or_default();
        format!("{}_{}_{}.{}", self.school.school_code, scope.slug(), self.lang, extension)
    }

    /// Build the document this request describes.
    pub fn build(&self) -> Result<Document, BuildError> {
        let scope = self.scope().unwrap_or_default();
        build_document(
            &self.school,
            &self.competencies,
            self.aggregates.as_ref(),
            self.lang,
            scope,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriorityBand, Subject};
    use serde_json::json;

    fn body() -> Value {
        json!({
            "school": { "school_code": " 101 ", "school_name": "GPS Banar" },
            "aggregates": null,
            "competencies": [
                {
                    "school_code": "101",
                    "grade_level": 7,
                    "subject": "Mathematics",
                    "competency_name": "Lines and Angles",
                    "score": 3.0,
                    "priority_band": "Low"
                }
            ],
            "lang": "hi",
            "reportType": "grade",
            "gradeLevel": 7
        })
    }

    #[test]
    fn test_new_reclassifies_bands() {
        let mut stale = Observation::new("101", GradeLevel::SIX, Subject::English, "Vocabulary", 6.5);
        stale.priority_band = PriorityBand::High;
        let school = School { school_code: "101".into(), school_name: "GPS Banar".into() };

        let request = ReportRequest::new(school, None, vec![stale], Lang::En, ReportScope::Full);
        assert_eq!(request.competencies[0].priority_band, PriorityBand::Medium);
    }

    #[test]
    fn test_valid_request() {
        let request = ReportRequest::from_value(body()).unwrap();
        assert_eq!(request.school.school_code, "101");
        assert_eq!(request.lang, Lang::Hi);
        assert_eq!(request.scope().unwrap(), ReportScope::Grade(GradeLevel::SEVEN));
        assert_eq!(request.competencies[0].subject, Subject::Mathematics);
        // Band recomputed from the score
        assert_eq!(request.competencies[0].priority_band, PriorityBand::High);
        assert_eq!(request.filename("pdf"), "101_grade7_hi.pdf");
    }

    #[test]
    fn test_missing_school_code_is_validation_error() {
        let mut value = body();
        value["school"] = json!({ "school_name": "GPS Banar" });
        let err = ReportRequest::from_value(value).unwrap_err();
        match err {
            RequestError::Schema { errors } => assert!(errors.iter().any(|e| e.contains("school_code"))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_lang_rejected() {
        let mut value = body();
        value["lang"] = json!("fr");
        assert!(matches!(ReportRequest::from_value(value), Err(RequestError::Schema { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(ReportRequest::from_json("{ not json"), Err(RequestError::Json(_))));
    }

    #[test]
    fn test_full_is_default_scope() {
        let value = json!({
            "school": { "school_code": "101", "school_name": "GPS Banar" },
            "lang": "en"
        });
        let request = ReportRequest::from_value(value).unwrap();
        assert_eq!(request.scope().unwrap(), ReportScope::Full);
        assert_eq!(request.filename("txt"), "101_full_en.txt");
        assert_eq!(request.build().unwrap().pages.len(), 4);
    }

    #[test]
    fn test_serialized_shape_round_trips() {
        let request = ReportRequest::new(
            School { school_code: "9".into(), school_name: "X".into() },
            None,
            Vec::new(),
            Lang::En,
            ReportScope::Grade(GradeLevel::EIGHT),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["reportType"], "grade");
        assert_eq!(value["gradeLevel"], 8);
        assert_eq!(ReportRequest::from_value(value).unwrap(), request);
    }

    #[test]
    fn test_build_rejects_foreign_competency() {
        let mut value = body();
        value["competencies"][0]["school_code"] = json!("202");
        let request = ReportRequest::from_value(value).unwrap();
        assert!(matches!(request.build(), Err(BuildError::ForeignObservation { .. })));
    }
}
