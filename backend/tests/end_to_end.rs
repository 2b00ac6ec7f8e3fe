//! Export -> dataset -> documents -> batch, through the public API.

use std::time::Duration;

use schoolreport::{
    import_bytes, import_file, report_request, run_batch, Block, BatchOptions, DatasetStore, GradeLevel, ImportOptions,
    Lang, Pacing, PriorityBand, Renderer, ReportRequest, ReportScope, Subject, TextRenderer,
};

const EXPORT: &str = "\
SchoolName,Grade,Subject,SkillName,10 Point Score
\"GPS Banar (101)\",6,Mathematics,Lines and Angles,3
\"GPS Banar (101)\",6,Mathematics,Perimeter and Area,7
\"GPS Banar (101)\",6,English,Vocabulary,5.5
\"GPS Banar (101)\",8,Science,Measuring Physical Properties,9
\"GUPS Mandore (202)\",7,Social Science,Understanding Local governance,4
\"GUPS Mandore (202)\",7,Social Science,Understanding Early Civilizations,
\"Unknown School\",7,English,Vocabulary,8
\"GSSS Osian (303)\",9,English,Vocabulary,8
\"GSSS Osian (303)\",8,English,Vocabulary,6.2
";

#[test]
fn import_normalizes_and_aggregates() {
    let result = import_bytes(EXPORT.as_bytes(), ImportOptions::default()).unwrap();

    assert_eq!(result.summary.total, 9);
    assert_eq!(result.summary.accepted, 7);
    assert_eq!(result.summary.discarded, 2);
    assert_eq!(result.summary.defaulted_scores, 1);

    let codes: Vec<&str> = result.dataset.schools.iter().map(|s| s.school_code.as_str()).collect();
    assert_eq!(codes, vec!["101", "202", "303"]);

    let banar = result.dataset.aggregates_for("101").unwrap();
    assert_eq!(banar.subject_avg(Subject::Mathematics), Some(5.0));
    assert_eq!(banar.grade_avg(GradeLevel::SEVEN), None);

    let mandore = result.dataset.aggregates_for("202").unwrap();
    assert_eq!(mandore.subject_avg(Subject::SocialScience), Some(2.0));
}

#[test]
fn workbook_export_imports() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scores.xlsx");
    let result = import_file(&path, ImportOptions::default()).unwrap();

    assert_eq!(result.input.encoding, "xlsx");
    assert_eq!(result.summary.accepted, 3);
    assert_eq!(result.summary.defaulted_scores, 1);
    let banar = result.dataset.aggregates_for("101").unwrap();
    assert_eq!(banar.subject_avg(Subject::Mathematics), Some(5.25));
}

#[test]
fn dataset_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let options = ImportOptions { output_dir: Some(dir.path().to_path_buf()) };
    let result = import_bytes(EXPORT.as_bytes(), options).unwrap();

    let loaded = DatasetStore::with_dir(dir.path()).load().unwrap();
    assert_eq!(loaded, result.dataset);
}

#[test]
fn full_report_for_school_without_grade_7() {
    let result = import_bytes(EXPORT.as_bytes(), ImportOptions::default()).unwrap();
    let request = report_request(&result.dataset, "101", Lang::En, ReportScope::Full).unwrap();
    let document = request.build().unwrap();

    assert_eq!(document.pages.len(), 4);

    // Grade 7 page: every subject table is a single "No data" row
    let grade7 = &document.pages[2];
    let no_data_rows = grade7
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
        .filter(|t| t.rows.len() == 1 && t.rows[0][0].text == "No data")
        .count();
    assert_eq!(no_data_rows, 4);

    // Grade 6 Mathematics: High (3.0) before Low (7.0)
    let math = document.pages[1]
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
        .nth(1)
        .unwrap();
    assert_eq!(math.rows[0][1].tone, Some(PriorityBand::High));
    assert_eq!(math.rows[1][1].tone, Some(PriorityBand::Low));
}

#[test]
fn request_json_round_trip_goes_through_validation() {
    let result = import_bytes(EXPORT.as_bytes(), ImportOptions::default()).unwrap();
    let request = report_request(&result.dataset, "202", Lang::Hi, ReportScope::Grade(GradeLevel::SEVEN)).unwrap();

    let body = serde_json::to_string(&request).unwrap();
    let parsed = ReportRequest::from_json(&body).unwrap();
    assert_eq!(parsed, request);
    assert_eq!(parsed.filename("pdf"), "202_grade7_hi.pdf");
}

#[tokio::test]
async fn batch_renders_every_school() {
    let result = import_bytes(EXPORT.as_bytes(), ImportOptions::default()).unwrap();
    let options = BatchOptions {
        lang: Lang::Hi,
        scope: ReportScope::Full,
        timeout: Duration::from_secs(5),
        pacing: Pacing::Fixed(Duration::from_millis(1)),
        output_dir: None,
    };

    let report = run_batch(&result.dataset, &TextRenderer::new(), &options).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 3);
    let names: Vec<&str> = report.artifacts.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(names, vec!["101_full_hi.md", "202_full_hi.md", "303_full_hi.md"]);

    let text = String::from_utf8(report.artifacts[0].bytes.clone()).unwrap();
    assert!(text.contains("स्कूल मूल्यांकन रिपोर्ट कार्ड"));
    assert!(text.contains("रेखाएँ और कोण"));
}

#[tokio::test]
async fn text_renderer_is_a_renderer() {
    let renderer = TextRenderer::new();
    assert_eq!(renderer.extension(), "md");

    let result = import_bytes(EXPORT.as_bytes(), ImportOptions::default()).unwrap();
    let request = report_request(&result.dataset, "303", Lang::En, ReportScope::Grade(GradeLevel::EIGHT)).unwrap();
    let document = request.build().unwrap();
    let bytes = renderer.render(&request, &document).await.unwrap();
    assert!(String::from_utf8(bytes).unwrap().contains("Grade 8 - Detailed Competency Report"));
}
