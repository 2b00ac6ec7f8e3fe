//! Report documents: request contract, document model and builder.
//!
//! - [`request`] - the JSON request accepted by the server and the batch
//! - [`document`] - the page/block structure handed to renderers
//! - [`builder`] - turns one school's data into a [`Document`]

pub mod builder;
pub mod document;
pub mod request;

pub use builder::{build_document, detail_order, format_average, format_score, MISSING};
pub use document::{Block, Cell, Document, Page, Table};
pub use request::{ReportRequest, ReportType};
