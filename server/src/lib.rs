//! HTTP hosting for the transaction screen.
//!
//! One route, GET or POST, parameters in the query string. Every request
//! gets a 200 with a JSON report; input problems are coerced, never rejected.

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use txscreen_core::{config::ServerConfig, Report, RuleEvaluator};

/// Build the router serving `route`.
pub fn router(evaluator: RuleEvaluator, route: &str) -> Router {
    Router::new()
        .route(route, get(transaction_report).post(transaction_report))
        .with_state(evaluator)
}

/// Screen the transaction described by the query string.
///
/// Query pairs are taken raw so that repeated or unknown keys never turn
/// into a 400.
pub async fn transaction_report(
    State(evaluator): State<RuleEvaluator>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Report> {
    log::info!("TestTransaction processing a request ({} query params)", pairs.len());
    Json(evaluator.evaluate_query(&pairs))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, evaluator: RuleEvaluator) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    log::info!("Listening on http://{}{}", addr, config.route);

    axum::serve(listener, router(evaluator, &config.route))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
