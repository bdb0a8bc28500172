//! Headless generator: signs in as one user and turns their groups'
//! `pending` visions into images.

use std::sync::Arc;

use anyhow::Context;
use sharedvisions_events::EventLogger;
use sharedvisions_pipeline::{AppConfig, AppContext};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod poller;

use config::WorkerConfig;
use poller::Poller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sharedvisions_worker=debug,sharedvisions_pipeline=debug,sharedvisions_events=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_config = AppConfig::from_env().context("Failed to load backend/model configuration")?;
    let worker_config = WorkerConfig::from_env().context("Failed to load worker configuration")?;

    let ctx = AppContext::new(&app_config).context("Failed to build clients")?;
    tracing::info!(backend = ctx.backend.base_url(), "Clients initialised");

    // Subscribe before any operation so sign-in events are logged too.
    let logger = tokio::spawn(EventLogger::run(ctx.bus.subscribe()));

    ctx.auth
        .sign_in(&worker_config.email, &worker_config.password)
        .await
        .context("Sign-in failed")?;
    let actor = ctx.auth.current_actor().await.context("No profile for signed-in user")?;
    tracing::info!(user_id = %actor.user_id, name = %actor.display_name, "Signed in");

    let cancel = CancellationToken::new();
    let poller = Poller::new(
        Arc::clone(&ctx.visions),
        actor,
        worker_config.style,
        worker_config.poll_interval,
    );
    let poller_cancel = cancel.clone();
    let poller = tokio::spawn(async move { poller.run(poller_cancel).await });

    shutdown_signal().await;
    cancel.cancel();
    if let Err(e) = poller.await {
        tracing::error!(error = %e, "Vision poller task panicked");
    }

    if let Err(e) = ctx.auth.sign_out().await {
        tracing::warn!(error = %e, "Sign-out failed");
    }

    logger.abort();
    tracing::info!("Worker stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
