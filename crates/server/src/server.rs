// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP server plumbing.
//!
//! Routing only; every decision lives in [`crate::handler`].

use std::net::SocketAddr;

use axum::routing::post;
use axum::Router;
use tracing::info;

use crate::handler;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/hook/{target}", post(handler::hook))
        .with_state(state)
}

/// Run the HTTP server on the given address.
pub async fn run(addr: SocketAddr, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
