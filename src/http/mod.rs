//! # Response Endpoint
//!
//! The HTTP surface recipients' clicks land on. Runs as its own process
//! (`server` binary) against the same store files as the campaign engine.
//! Internal faults never surface as error status codes here: a recipient
//! clicking a link always gets the redirect or the thank-you page, and the
//! fault goes to the log instead.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod routes;

use anyhow::Result;
use axum::{routing::get, Router};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::core::Config;
use crate::store::Store;

/// Shared state for the response-endpoint handlers
pub struct AppContext {
    pub store: Store,
    pub config: Config,
}

/// Bind and serve the response endpoint until the process is stopped
pub async fn start_server(ctx: Arc<AppContext>) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", ctx.config.app_port).parse()?;
    let router = build_router(ctx);

    info!("🌐 Response endpoint listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/interested/:id", get(routes::interested))
        .route("/not-interested/:id", get(routes::not_interested))
        .route("/stats", get(routes::stats))
        .route("/contacts", get(routes::contacts))
        .with_state(ctx)
}
