//! Liveness endpoint
//!
//! Minimal HTTP surface for the hosting platform's health probe.

use crate::error::Result;
use axum::{routing::get, Router};

pub async fn start_health_server(port: u16) -> Result<()> {
    let app = Router::new().route("/", get(|| async { "Bot is running" }));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Health endpoint listening on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
