// ABOUTME: Server binary exposing the recipe relay over HTTP
// ABOUTME: Loads environment configuration, builds shared resources, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Relay Server Binary
//!
//! Serves `/api/spoonacular/info`, `/api/spoonacular/search`, `/health` and `/ready`.

use anyhow::{Context, Result};
use clap::Parser;
use recipe_relay::{
    config::ServerConfig, logging, resources::ServerResources, routes::build_router,
};
use recipe_relay_upstream::initialize_shared_client;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "recipe-relay-server")]
#[command(about = "Recipe Relay - caching proxy for recipe information and search")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    info!("{}", config.summary());

    initialize_shared_client(
        config.upstream.timeout_secs,
        config.upstream.connect_timeout_secs,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let resources = Arc::new(ServerResources::new(config));
    let router = build_router(resources);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Recipe relay listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Recipe relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
