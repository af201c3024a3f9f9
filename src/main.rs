//! Archery log backend binary entrypoint wiring REST routes and the MongoDB
//! round store.

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod identity;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::round_store::mongodb::{MongoConfig, MongoRoundStore};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let mongo_db = env::var("MONGO_DB").ok();

    let app_state = AppState::new(AppConfig::load());

    tokio::spawn(run_storage_supervisor(app_state.clone(), mongo_uri, mongo_db));
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Supervises the round store connection by retrying in the background and
/// toggling degraded mode when connectivity changes.
async fn run_storage_supervisor(state: SharedState, uri: String, db_name: Option<String>) {
    let initial_delay = Duration::from_millis(1000);
    let mut delay = initial_delay;
    let max_delay = Duration::from_secs(10);

    loop {
        if let Some(store) = state.round_store().await {
            match store.health_check().await {
                Ok(_) => {
                    // Healthy connection: reset the retry backoff and avoid
                    // hammering the database with pings.
                    delay = initial_delay;
                    sleep(Duration::from_secs(5)).await;
                }
                Err(err) => {
                    // Existing connection failed: try one reconnect in place;
                    // on failure drop the store and flip to degraded mode.
                    warn!(error = %err, "storage health check failed");
                    if let Err(err) = store.try_reconnect().await {
                        warn!(error = %err, "storage reconnect failed; entering degraded mode");
                        state.clear_round_store().await;
                    }
                    sleep(delay).await;
                    delay = (delay * 2).min(max_delay);
                }
            }
            continue;
        }

        match MongoConfig::from_uri(&uri, db_name.as_deref()).await {
            Ok(config) => match MongoRoundStore::connect(config).await {
                Ok(store) => {
                    // Fresh connection with indexes ready: install it and
                    // leave degraded mode.
                    info!("connected to MongoDB; leaving degraded mode");
                    state.install_round_store(Arc::new(store)).await;
                    delay = initial_delay;
                }
                Err(err) => {
                    warn!(error = %err, "MongoDB connection attempt failed");
                    sleep(delay).await;
                    delay = (delay * 2).min(max_delay);
                }
            },
            Err(err) => {
                warn!(error = %err, "invalid MongoDB configuration");
                sleep(delay).await;
                delay = (delay * 2).min(max_delay);
            }
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
