//! Stacks Node Mock Server
//!
//! A lightweight stand-in for the Stacks core API, scoped to the endpoints
//! the savings-pool interaction scripts use. Designed for local testing
//! without a funded testnet wallet.

use std::env;

use anyhow::{Context, Result};
use stacks_node_mock::{run_server, PoolState};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Stacks node mock...");

    let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("SERVER_PORT")
        .unwrap_or_else(|_| "3999".to_string())
        .parse()
        .context("Invalid SERVER_PORT")?;

    run_server(PoolState::new(), host, port)
        .await
        .context("Server error")?;

    Ok(())
}
