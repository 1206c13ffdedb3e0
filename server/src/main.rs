//! txscreen-server: HTTP endpoint screening single transactions.
//!
//! Usage:
//!   txscreen-server
//!   txscreen-server --bind 127.0.0.1 --port 8080
//!   txscreen-server --config server.json
//!
//! Log level follows RUST_LOG (default: info).

use anyhow::{Context, Result};
use std::env;
use txscreen_core::{config::ServerConfig, RuleEvaluator};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_args(&args).context("Failed to load server config")?;

    log::info!(
        "txscreen-server {} bind={} port={} route={}",
        env!("CARGO_PKG_VERSION"),
        config.bind_addr,
        config.port,
        config.route
    );

    txscreen_server::serve(&config, RuleEvaluator::system()).await
}
