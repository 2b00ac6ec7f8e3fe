//! Markdown renderer built on `tabled`.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::{RenderError, RenderResult};
use crate::report::{Block, Cell, Document, ReportRequest, Table};

use super::Renderer;

/// Page separator in the text output.
const PAGE_BREAK: &str = "\n---\n\n";

/// Renders documents as Markdown: headings, paragraphs and pipe tables.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render to a string.
    pub fn render_to_string(&self, document: &Document) -> String {
        document
            .pages
            .iter()
            .map(|page| {
                page.blocks
                    .iter()
                    .map(render_block)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join(PAGE_BREAK)
    }
}

impl Renderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    async fn render(&self, _request: &ReportRequest, document: &Document) -> RenderResult<Vec<u8>> {
        if document.pages.is_empty() {
            return Err(RenderError::Failed("document has no pages".to_string()));
        }
        Ok(self.render_to_string(document).into_bytes())
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => {
            let hashes = "#".repeat((*level).clamp(1, 6) as usize);
            format!("{} {}\n", hashes, text)
        }
        Block::Paragraph { text } => format!("{}\n", text),
        Block::Table(table) => format!("{}\n", render_table(table)),
    }
}

/// Spanning cells are written once, followed by empty cells.
fn flatten(row: &[Cell]) -> Vec<String> {
    row.iter()
        .flat_map(|cell| {
            std::iter::once(cell.text.clone()).chain(std::iter::repeat(String::new()).take(cell.span.saturating_sub(1) as usize))
        })
        .collect()
}

fn render_table(table: &Table) -> String {
    let width = table.width();
    let mut builder = Builder::default();
    for row in table.header_rows.iter().chain(table.rows.iter()) {
        let mut cells = flatten(row);
        cells.resize(width, String::new());
        builder.push_record(cells);
    }
    builder.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::{GradeLevel, Lang, Observation, ReportScope, School, Subject};
    use crate::report::build_document;

    fn request_and_document() -> (ReportRequest, Document) {
        let school = School { school_code: "101".into(), school_name: "GPS Banar".into() };
        let observations = vec![
            Observation::new("101", GradeLevel::SIX, Subject::English, "Vocabulary", 4.0),
            Observation::new("101", GradeLevel::SEVEN, Subject::Science, "Measuring Physical Properties", 7.5),
        ];
        let agg = aggregate("101", &observations);
        let document = build_document(&school, &observations, Some(&agg), Lang::En, ReportScope::Full).unwrap();
        let request = ReportRequest::new(school, Some(agg), observations, Lang::En, ReportScope::Full);
        (request, document)
    }

    #[test]
    fn test_flatten_spans() {
        let row = vec![Cell::new("Grade"), Cell::new("English").spanning(3)];
        assert_eq!(flatten(&row), vec!["Grade", "English", "", ""]);
    }

    #[test]
    fn test_render_contains_sections() {
        let (_, document) = request_and_document();
        let text = TextRenderer::new().render_to_string(&document);

        assert!(text.starts_with("# School Assessment Report Card"));
        assert!(text.contains("## GPS Banar"));
        assert!(text.contains("School Code: 101"));
        assert!(text.contains("# Grade 7 - Detailed Competency Report"));
        assert!(text.contains("Measuring Physical Properties"));
        assert!(text.contains("| Competency"));
        assert_eq!(text.matches(PAGE_BREAK).count(), 3);
    }

    #[tokio::test]
    async fn test_render_bytes() {
        let (request, document) = request_and_document();
        let bytes = TextRenderer::new().render(&request, &document).await.unwrap();
        assert!(!bytes.is_empty());
        assert!(String::from_utf8(bytes).unwrap().contains("Vocabulary"));
    }

    #[tokio::test]
    async fn test_empty_document_fails() {
        let (request, mut document) = request_and_document();
        document.pages.clear();
        let err = TextRenderer::new().render(&request, &document).await.unwrap_err();
        assert!(matches!(err, RenderError::Failed(_)));
    }
}
