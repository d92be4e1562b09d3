//! Tiny HTTP endpoint for hosts that expect a bound port.

use std::future::Future;
use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(health))
}

async fn alive() -> &'static str {
    "alive"
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

/// Serves [`router`] on `addr` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve<F>(addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "keep-alive endpoint listening");
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
