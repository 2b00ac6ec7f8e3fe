//! HTTP server for the report API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                              |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/health`         | Health check                             |
//! | POST   | `/api/document`   | Report request -> document description   |
//! | POST   | `/api/report`     | Report request -> rendered artifact      |
//! | GET    | `/api/logs`       | SSE stream for real-time logs            |

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::types::{build_error, content_type, error_response, render_error, request_error, ApiError, DocumentResponse};
use crate::config::AppConfig;
use crate::error::{RenderError, ServerResult};
use crate::render::{AnyRenderer, Renderer};
use crate::report::ReportRequest;

/// Shared handler state
pub struct AppState {
    pub renderer: AnyRenderer,
    pub render_timeout: Duration,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            renderer: AnyRenderer::from_url(config.renderer_url.as_deref()),
            render_timeout: config.render_timeout,
        }
    }
}

/// Build the router (exposed for tests and embedding)
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/document", post(document))
        .route("/api/report", post(report))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> ServerResult<()> {
    let state = Arc::new(AppState::from_config(&config));
    let renderer = state.renderer.describe();
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 School report server running on http://localhost:{}", config.port);
    println!("   POST /api/document - Build a report document");
    println!("   POST /api/report   - Render a report");
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");
    println!();
    println!("🖨️  Renderer: {}", renderer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "schoolreport",
        "version": env!("CARGO_PKG_VERSION"),
        "renderer": state.renderer.describe(),
        "endpoints": {
            "document": "POST /api/document",
            "report": "POST /api/report",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn parse_request(body: Value) -> Result<ReportRequest, ApiError> {
    ReportRequest::from_value(body).map_err(|e| {
        log_error(format!("Rejected report request: {}", e));
        request_error(e)
    })
}

/// Document description endpoint
async fn document(Json(body): Json<Value>) -> Result<Json<DocumentResponse>, ApiError> {
    let request = parse_request(body)?;
    let document = request.build().map_err(build_error)?;
    Ok(Json(DocumentResponse::new(&request, document)))
}

/// Rendered report endpoint
async fn report(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Result<Response, ApiError> {
    let request = parse_request(body)?;
    let document = request.build().map_err(build_error)?;
    let filename = request.filename(state.renderer.extension());

    log_info(format!("🖨️  Rendering {}...", filename));
    let bytes = match tokio::time::timeout(state.render_timeout, state.renderer.render(&request, &document)).await {
        Ok(Ok(bytes)) if !bytes.is_empty() => bytes,
        Ok(Ok(_)) => return Err(render_error(RenderError::EmptyOutput)),
        Ok(Err(e)) => {
            log_error(format!("Render failed for {}: {}", filename, e));
            return Err(render_error(e));
        }
        Err(_) => return Err(render_error(RenderError::Timeout(state.render_timeout))),
    };
    log_success(format!("{} ({} bytes)", filename, bytes.len()));

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| (axum::http::StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string()))))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type(state.renderer.extension()))),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
