//! Rendering collaborators.
//!
//! A [`Renderer`] turns a [`Document`] into output bytes. Two implementations
//! ship with the crate:
//!
//! - [`TextRenderer`] - local Markdown tables, no network
//! - [`HttpRenderer`] - delegates layout (PDF) to an external service
//!
//! [`AnyRenderer`] picks one at runtime from configuration.

pub mod http;
pub mod text;

use std::future::Future;

use crate::error::RenderResult;
use crate::report::{Document, ReportRequest};

pub use http::HttpRenderer;
pub use text::TextRenderer;

/// Turns a document description into bytes.
pub trait Renderer: Send + Sync {
    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &'static str;

    /// Render one document. `request` is passed along for renderers that
    /// need the raw data (charts, custom layouts).
    fn render(
        &self,
        request: &ReportRequest,
        document: &Document,
    ) -> impl Future<Output = RenderResult<Vec<u8>>> + Send;
}

/// Runtime choice between the bundled renderers.
#[derive(Debug, Clone)]
pub enum AnyRenderer {
    Text(TextRenderer),
    Http(HttpRenderer),
}

impl AnyRenderer {
    /// HTTP renderer when a URL is configured, text renderer otherwise.
    pub fn from_url(url: Option<&str>) -> Self {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => AnyRenderer::Http(HttpRenderer::new(url)),
            None => AnyRenderer::Text(TextRenderer::new()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            AnyRenderer::Text(_) => "text (markdown)".to_string(),
            AnyRenderer::Http(r) => format!("http ({})", r.url()),
        }
    }
}

impl Renderer for AnyRenderer {
    fn extension(&self) -> &'static str {
        match self {
            AnyRenderer::Text(r) => r.extension(),
            AnyRenderer::Http(r) => r.extension(),
        }
    }

    async fn render(&self, request: &ReportRequest, document: &Document) -> RenderResult<Vec<u8>> {
        match self {
            AnyRenderer::Text(r) => r.render(request, document).await,
            AnyRenderer::Http(r) => r.render(request, document).await,
        }
    }
}
