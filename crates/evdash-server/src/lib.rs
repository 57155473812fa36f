//! # evdash-server
//!
//! The evdash backend. Serves report artifacts from a [`ReportStore`]:
//!
//! - JSON API: `/api/projects`, `/api/reports/{vendor}/{project}`,
//!   `/api/report_json/{vendor}/{project}/{file}`, `/api/scripts`
//! - `POST /api/generate_report` (multipart) returning the report as an
//!   attachment
//! - static artifacts under `/reports`, with generated directory listings,
//!   plus `/data/projects.json` and `/summary.html`
//! - server-rendered pages: `/`, `/dashboard/{vendor}/{project}`, `/generate`

mod api;
mod error;
mod listing;
pub mod pages;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{MethodRouter, get, post};
use evdash_config::EvdashConfig;
use evdash_render::RenderOptions;
use evdash_store::ReportStore;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub use error::ServerError;

/// Upper bound on a generator request body.
const UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ReportStore,
    pub options: RenderOptions,
}

impl AppState {
    #[must_use]
    pub fn new(config: &EvdashConfig) -> Self {
        Self {
            store: ReportStore::new(&config.server),
            options: RenderOptions::from(&config.ui),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let listing: MethodRouter = get(listing::directory_listing).with_state(state.clone());
    let reports = ServeDir::new(state.store.reports_dir()).fallback(listing);

    Router::new()
        .route("/", get(pages::home))
        .route("/dashboard/{vendor}/{project}", get(pages::dashboard))
        .route("/generate", get(pages::generate))
        .route("/theme/toggle", post(pages::toggle_theme))
        .route("/healthz", get(api::healthz))
        .route("/api/projects", get(api::projects))
        .route("/api/reports/{vendor}/{project}", get(api::report_list))
        .route(
            "/api/report_json/{vendor}/{project}/{file}",
            get(api::report_json),
        )
        .route("/api/scripts", get(api::scripts))
        .route(
            "/api/generate_report",
            post(api::generate_report).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route_service(
            "/data/projects.json",
            ServeFile::new(state.store.projects_file()),
        )
        .route_service("/summary.html", ServeFile::new(state.store.summary_file()))
        .nest_service("/reports", reports)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound, or
/// [`ServerError::Io`] if the server fails while running.
pub async fn serve(config: &EvdashConfig) -> Result<(), ServerError> {
    let state = AppState::new(config);
    let app = build_router(state);
    let addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %addr,
        root = %config.server.root.display(),
        "evdash backend listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    tracing::info!("evdash backend stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            tracing::warn!("signal handlers unavailable, falling back to ctrl-c");
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
