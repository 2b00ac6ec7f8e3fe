//! Builds a [`Document`] from one school's data.
//!
//! Layout of a full report:
//!
//! ```text
//! page 1   header | subject averages | priority distribution (2 grids)
//! page 2   Grade 6 detail: one competency table per subject
//! page 3   Grade 7 detail
//! page 4   Grade 8 detail
//! ```
//!
//! A grade report is a single page: header plus that grade's detail.

use std::cmp::Ordering;

use crate::error::BuildError;
use crate::i18n::{self, Label};
use crate::models::{Aggregates, GradeLevel, Lang, Observation, PriorityBand, ReportScope, School, Subject};

use super::document::{Block, Cell, Document, Page, Table};

/// Placeholder for a missing number.
pub const MISSING: &str = "-";

/// Subject pairs shown side by side in the distribution grids.
const GRID_PAIRS: [[Subject; 2]; 2] = [
    [Subject::English, Subject::Mathematics],
    [Subject::Science, Subject::SocialScience],
];

/// Build the document for one school.
///
/// Fails when an observation or the aggregates belong to another school.
pub fn build_document(
    school: &School,
    observations: &[Observation],
    aggregates: Option<&Aggregates>,
    lang: Lang,
    scope: ReportScope,
) -> Result<Document, BuildError> {
    if let Some(foreign) = observations.iter().find(|o| o.school_code != school.school_code) {
        return Err(BuildError::ForeignObservation {
            expected: school.school_code.clone(),
            found: foreign.school_code.clone(),
        });
    }
    if let Some(agg) = aggregates.filter(|a| a.school_code != school.school_code) {
        return Err(BuildError::ForeignAggregates {
            expected: school.school_code.clone(),
            found: agg.school_code.clone(),
        });
    }

    let builder = DocumentBuilder { school, observations, aggregates, lang };
    let pages = match scope {
        ReportScope::Full => {
            let mut summary = Page::default();
            builder.header(&mut summary);
            builder.subject_averages(&mut summary);
            builder.priority_distribution(&mut summary);

            let mut pages = vec![summary];
            for grade in GradeLevel::ALL {
                let mut page = Page::default();
                builder.grade_detail(&mut page, grade);
                pages.push(page);
            }
            pages
        }
        ReportScope::Grade(grade) => {
            let mut page = Page::default();
            builder.header(&mut page);
            builder.grade_detail(&mut page, grade);
            vec![page]
        }
    };

    Ok(Document { lang, scope, pages })
}

/// Format an average with one decimal, or the placeholder.
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format_score(v),
        _ => MISSING.to_string(),
    }
}

/// One decimal, truncated rather than rounded: the printed value always
/// falls in the same band as the score (4.96 prints as "4.9", not "5.0").
pub fn format_score(score: f64) -> String {
    // The epsilon absorbs binary representation error (4.3 * 10 = 42.999...)
    format!("{:.1}", (score * 10.0 + 1e-9).floor() / 10.0)
}

/// Detail-table order: priority rank, then score, then name.
pub fn detail_order(a: &Observation, b: &Observation) -> Ordering {
    a.priority_band
        .rank()
        .cmp(&b.priority_band.rank())
        .then_with(|| a.score.total_cmp(&b.score))
        .then_with(|| a.competency_name.cmp(&b.competency_name))
}

struct DocumentBuilder<'a> {
    school: &'a School,
    observations: &'a [Observation],
    aggregates: Option<&'a Aggregates>,
    lang: Lang,
}

impl DocumentBuilder<'_> {
    fn t(&self, label: Label) -> &'static str {
        i18n::label(self.lang, label)
    }

    fn header(&self, page: &mut Page) {
        page.push(Block::heading(1, self.t(Label::ReportTitle)));
        page.push(Block::heading(2, self.school.school_name.clone()));
        page.push(Block::paragraph(format!(
            "{}: {}",
            self.t(Label::SchoolCode),
            self.school.school_code
        )));
    }

    fn subject_averages(&self, page: &mut Page) {
        page.push(Block::heading(2, self.t(Label::SubjectwiseAverages)));

        let overall = self.aggregates.and_then(|a| a.overall_avg);
        let mut rows = vec![average_row(self.t(Label::OverallAverage), overall)];
        for subject in Subject::ALL {
            let avg = self.aggregates.and_then(|a| a.subject_avg(subject));
            rows.push(average_row(self.t(subject.label()), avg));
        }

        page.push(Block::Table(Table {
            header_rows: vec![vec![
                Cell::new(self.t(Label::Subject)),
                Cell::new(self.t(Label::AverageScore)),
            ]],
            rows,
        }));
    }

    fn priority_distribution(&self, page: &mut Page) {
        page.push(Block::heading(2, self.t(Label::PriorityDistribution)));

        let legend: Vec<String> = PriorityBand::ALL
            .into_iter()
            .map(|band| format!("{} = {}", band.marker(), self.t(band.legend_label())))
            .chain(std::iter::once(format!("{} = {}", MISSING, self.t(Label::NoData))))
            .collect();
        page.push(Block::paragraph(legend.join(" | ")));

        for pair in GRID_PAIRS {
            page.push(Block::Table(self.distribution_grid(pair)));
        }
    }

    fn distribution_grid(&self, subjects: [Subject; 2]) -> Table {
        let mut top = vec![Cell::new("")];
        let mut bands = vec![Cell::new(self.t(Label::Grade))];
        for subject in subjects {
            top.push(Cell::new(self.t(subject.label())).spanning(3));
            for band in PriorityBand::ALL {
                bands.push(Cell::toned(band.marker(), band));
            }
        }

        let rows = GradeLevel::ALL
            .into_iter()
            .map(|grade| {
                let mut row = vec![Cell::new(grade.to_string())];
                for subject in subjects {
                    let cell: Vec<&Observation> = self
                        .observations
                        .iter()
                        .filter(|o| o.grade_level == grade && o.subject == subject)
                        .collect();
                    for band in PriorityBand::ALL {
                        if cell.is_empty() {
                            row.push(Cell::new(MISSING));
                        } else {
                            let count = cell.iter().filter(|o| o.priority_band == band).count();
                            row.push(Cell::toned(count.to_string(), band));
                        }
                    }
                }
                row
            })
            .collect();

        Table { header_rows: vec![top, bands], rows }
    }

    fn grade_detail(&self, page: &mut Page, grade: GradeLevel) {
        page.push(Block::heading(
            1,
            format!("{} - {}", self.t(grade.label()), self.t(Label::DetailedReport)),
        ));

        for subject in Subject::ALL {
            page.push(Block::heading(2, self.t(subject.label())));

            let mut items: Vec<&Observation> = self
                .observations
                .iter()
                .filter(|o| o.grade_level == grade && o.subject == subject)
                .collect();
            items.sort_by(|a, b| detail_order(a, b));

            let rows = if items.is_empty() {
                vec![vec![Cell::new(self.t(Label::NoData)), Cell::new(MISSING), Cell::new(MISSING)]]
            } else {
                items
                    .into_iter()
                    .map(|o| {
                        vec![
                            Cell::new(i18n::competency(self.lang, &o.competency_name)),
                            Cell::toned(format_score(o.score), o.priority_band),
                            Cell::toned(self.t(o.priority_band.label()), o.priority_band),
                        ]
                    })
                    .collect()
            };

            page.push(Block::Table(Table {
                header_rows: vec![vec![
                    Cell::new(self.t(Label::Competency)),
                    Cell::new(self.t(Label::Score)),
                    Cell::new(self.t(Label::Priority)),
                ]],
                rows,
            }));
        }
    }
}

fn average_row(label: &str, avg: Option<f64>) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(format_average(avg)).with_tone(avg.map(PriorityBand::classify)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;

    fn school() -> School {
        School { school_code: "101".into(), school_name: "GPS Banar".into() }
    }

    fn obs(grade: GradeLevel, subject: Subject, name: &str, score: f64) -> Observation {
        Observation::new("101", grade, subject, name, score)
    }

    fn sample() -> Vec<Observation> {
        vec![
            obs(GradeLevel::SIX, Subject::Mathematics, "Perimeter and Area", 7.5),
            obs(GradeLevel::SIX, Subject::Mathematics, "Lines and Angles", 3.0),
            obs(GradeLevel::SIX, Subject::Mathematics, "Working with Fractions and Decimals", 5.5),
            obs(GradeLevel::SIX, Subject::Mathematics, "Solving Problems with Numbers", 2.0),
            obs(GradeLevel::SIX, Subject::English, "Vocabulary", 6.0),
            obs(GradeLevel::EIGHT, Subject::Science, "Measuring Physical Properties", 8.0),
        ]
    }

    fn build(scope: ReportScope, lang: Lang) -> Document {
        let observations = sample();
        let agg = aggregate("101", &observations);
        build_document(&school(), &observations, Some(&agg), lang, scope).unwrap()
    }

    fn texts(table: &Table, col: usize) -> Vec<String> {
        table.rows.iter().map(|r| r[col].text.clone()).collect()
    }

    #[test]
    fn test_full_report_has_four_pages() {
        let doc = build(ReportScope::Full, Lang::En);
        assert_eq!(doc.pages.len(), 4);
        assert_eq!(doc.pages[0].blocks[0], Block::heading(1, "School Assessment Report Card"));
        assert_eq!(doc.pages[0].blocks[2], Block::paragraph("School Code: 101"));
        assert_eq!(doc.pages[1].blocks[0], Block::heading(1, "Grade 6 - Detailed Competency Report"));
        assert_eq!(doc.pages[3].blocks[0], Block::heading(1, "Grade 8 - Detailed Competency Report"));
    }

    #[test]
    fn test_subject_average_table() {
        let doc = build(ReportScope::Full, Lang::En);
        let table = doc.tables().next().unwrap();

        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0][0].text, "Overall School Average");
        // English 6.0, Mathematics mean(7.5, 3, 5.5, 2) = 4.5, Science 8.0, Social Science none
        assert_eq!(texts(table, 1), vec!["5.3", "6.0", "4.5", "8.0", "-"]);
        assert_eq!(table.rows[2][1].tone, Some(PriorityBand::High));
        assert_eq!(table.rows[4][1].tone, None);
    }

    #[test]
    fn test_missing_aggregates_render_placeholders() {
        let doc = build_document(&school(), &[], None, Lang::En, ReportScope::Full).unwrap();
        let table = doc.tables().next().unwrap();
        assert!(texts(table, 1).iter().all(|t| t == MISSING));
    }

    #[test]
    fn test_legend_paragraph() {
        let doc = build(ReportScope::Full, Lang::En);
        let legend = doc.pages[0]
            .blocks
            .iter()
            .filter_map(Block::text)
            .find(|t| t.starts_with("H = "))
            .unwrap();
        assert_eq!(
            legend,
            "H = High Priority (0-4.9) | M = Medium Priority (5.0-6.9) | L = Low Priority (7.0+) | - = No data"
        );
    }

    #[test]
    fn test_distribution_counts_and_placeholders() {
        let doc = build(ReportScope::Full, Lang::En);
        let grids: Vec<&Table> = doc.pages[0].blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        }).skip(1).collect();
        assert_eq!(grids.len(), 2);

        let first = grids[0];
        assert_eq!(first.header_rows.len(), 2);
        assert_eq!(first.header_rows[0][1].text, "English");
        assert_eq!(first.header_rows[0][1].span, 3);
        assert_eq!(first.width(), 7);

        // Grade 6: English H/M/L = 0/1/0, Mathematics = 2/1/1
        let row6: Vec<&str> = first.rows[0].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(row6, vec!["6", "0", "1", "0", "2", "1", "1"]);

        // Grade 7 has no observations at all
        let row7: Vec<&str> = first.rows[1].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(row7, vec!["7", "-", "-", "-", "-", "-", "-"]);

        // Grade 8 Science: one Low
        let row8: Vec<&str> = grids[1].rows[2].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(row8, vec!["8", "0", "0", "1", "-", "-", "-"]);
    }

    #[test]
    fn test_detail_sorted_by_rank_then_score() {
        let doc = build(ReportScope::Grade(GradeLevel::SIX), Lang::En);
        let tables: Vec<&Table> = doc.tables().collect();
        assert_eq!(tables.len(), 4);

        let math = tables[1];
        assert_eq!(
            texts(math, 0),
            vec![
                "Solving Problems with Numbers",
                "Lines and Angles",
                "Working with Fractions and Decimals",
                "Perimeter and Area",
            ]
        );
        assert_eq!(texts(math, 1), vec!["2.0", "3.0", "5.5", "7.5"]);
        assert_eq!(texts(math, 2), vec!["High", "High", "Medium", "Low"]);

        for pair in math.rows.windows(2) {
            let (a, b) = (pair[0][1].tone.unwrap(), pair[1][1].tone.unwrap());
            assert!(a.rank() <= b.rank());
        }
    }

    #[test]
    fn test_empty_grade_renders_no_data_rows() {
        let doc = build(ReportScope::Full, Lang::En);
        let grade7 = &doc.pages[2];
        let tables: Vec<&Table> = grade7.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        }).collect();

        assert_eq!(tables.len(), 4);
        for table in tables {
            assert_eq!(table.header_rows[0].len(), 3);
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0][0].text, "No data");
        }
    }

    #[test]
    fn test_grade_scope_single_page() {
        let doc = build(ReportScope::Grade(GradeLevel::EIGHT), Lang::En);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].blocks[0], Block::heading(1, "School Assessment Report Card"));
        assert_eq!(doc.pages[0].blocks[3], Block::heading(1, "Grade 8 - Detailed Competency Report"));
    }

    #[test]
    fn test_hindi_labels_and_competencies() {
        let doc = build(ReportScope::Grade(GradeLevel::SIX), Lang::Hi);
        assert_eq!(doc.lang, Lang::Hi);
        assert_eq!(doc.pages[0].blocks[0], Block::heading(1, "स्कूल मूल्यांकन रिपोर्ट कार्ड"));
        let english = doc.tables().next().unwrap();
        assert_eq!(english.rows[0][0].text, "शब्दावली");
        assert_eq!(english.rows[0][2].text, "मध्यम");
    }

    #[test]
    fn test_foreign_data_rejected() {
        let foreign = vec![Observation::new("202", GradeLevel::SIX, Subject::English, "Vocabulary", 4.0)];
        let err = build_document(&school(), &foreign, None, Lang::En, ReportScope::Full).unwrap_err();
        assert!(matches!(err, BuildError::ForeignObservation { ref found, .. } if found == "202"));

        let agg = aggregate("202", &foreign);
        let err = build_document(&school(), &[], Some(&agg), Lang::En, ReportScope::Full).unwrap_err();
        assert!(matches!(err, BuildError::ForeignAggregates { .. }));
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(4.26)), "4.2");
        assert_eq!(format_average(Some(5.0)), "5.0");
        assert_eq!(format_average(None), "-");
        assert_eq!(format_average(Some(f64::NAN)), "-");
    }

    #[test]
    fn test_printed_score_stays_in_its_band() {
        assert_eq!(format_score(4.96), "4.9");
        assert_eq!(format_score(6.99), "6.9");
        assert_eq!(format_score(4.3), "4.3");
        assert_eq!(format_score(7.0), "7.0");

        let doc = build_document(
            &school(),
            &[obs(GradeLevel::SIX, Subject::English, "Vocabulary", 4.96)],
            None,
            Lang::En,
            ReportScope::Grade(GradeLevel::SIX),
        )
        .unwrap();
        let cell = doc
            .tables()
            .find_map(|t| t.rows.iter().find(|r| r[0].text == "Vocabulary"))
            .map(|r| r[1].clone())
            .unwrap();
        assert_eq!(cell.text, "4.9");
        assert_eq!(cell.tone, Some(PriorityBand::High));
    }
}
