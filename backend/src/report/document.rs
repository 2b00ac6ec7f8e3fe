//! Language-neutral document description.
//!
//! A [`Document`] is an ordered list of pages, each an ordered list of
//! [`Block`]s. Every string is already localized and formatted; renderers
//! only lay it out.

use serde::{Deserialize, Serialize};

use crate::models::{Lang, PriorityBand, ReportScope};

/// A fully resolved report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub lang: Lang,
    pub scope: ReportScope,
    pub pages: Vec<Page>,
}

impl Document {
    /// All blocks of all pages, in reading order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// All tables, in reading order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks().filter_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Table(Table),
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading { level, text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Text of a heading or paragraph.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text } => Some(text),
            Block::Table(_) => None,
        }
    }
}

/// A table with one or more header rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header_rows: Vec<Vec<Cell>>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Number of grid columns, counting spans.
    pub fn width(&self) -> usize {
        self.header_rows
            .iter()
            .chain(self.rows.iter())
            .map(|row| row.iter().map(|c| c.span as usize).sum::<usize>())
            .max()
            .unwrap_or(0)
    }
}

fn default_span() -> u8 {
    1
}

fn is_single(span: &u8) -> bool {
    *span == 1
}

/// One table cell. `tone` tells renderers which priority colour applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<PriorityBand>,
    #[serde(default = "default_span", skip_serializing_if = "is_single")]
    pub span: u8,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: None, span: 1 }
    }

    pub fn toned(text: impl Into<String>, tone: PriorityBand) -> Self {
        Self { text: text.into(), tone: Some(tone), span: 1 }
    }

    pub fn with_tone(mut self, tone: Option<PriorityBand>) -> Self {
        self.tone = tone;
        self
    }

    pub fn spanning(mut self, span: u8) -> Self {
        self.span = span.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_json_shape() {
        let block = Block::heading(2, "Science");
        assert_eq!(serde_json::to_value(&block).unwrap(), json!({ "kind": "heading", "level": 2, "text": "Science" }));

        let table = Block::Table(Table {
            header_rows: vec![vec![Cell::new("English").spanning(3)]],
            rows: vec![vec![Cell::toned("2", PriorityBand::High)]],
        });
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["kind"], "table");
        assert_eq!(value["header_rows"][0][0]["span"], 3);
        assert_eq!(value["rows"][0][0]["tone"], "High");
        assert!(value["rows"][0][0].get("span").is_none());
    }

    #[test]
    fn test_cell_defaults_on_read() {
        let cell: Cell = serde_json::from_value(json!({ "text": "-" })).unwrap();
        assert_eq!(cell, Cell::new("-"));
    }

    #[test]
    fn test_table_width_counts_spans() {
        let table = Table {
            header_rows: vec![vec![Cell::new(""), Cell::new("A").spanning(3), Cell::new("B").spanning(3)]],
            rows: vec![vec![Cell::new("6"); 7]],
        };
        assert_eq!(table.width(), 7);
    }
}
