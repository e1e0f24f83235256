mod api;
mod config;
mod dto;
mod state;

use crate::{config::Config, state::AppState};
use axum::routing::{get, post};
use std::{sync::Arc, time::Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting server...");
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    info!("Loading feed from {}...", config.feed_path.display());
    let now = Instant::now();
    let state = match AppState::load(config.feed_path, config.clock) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            error!("Failed to load feed: {err}");
            std::process::exit(1);
        }
    };
    info!("Loading feed took {:?}", now.elapsed());

    let app = axum::Router::new()
        .route("/trains/live", get(api::live))
        .route("/trains/{id}/live", get(api::train_live))
        .route("/trains/{id}/timeline", get(api::timeline))
        .route("/stations/{key}", get(api::station))
        .route("/feed/reload", post(api::reload))
        .with_state(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {}: {err}", config.port);
            std::process::exit(1);
        }
    };
    info!("Listening to port {}", config.port);
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
