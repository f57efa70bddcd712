mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use genvisor_core::Supervisor;
use genvisor_exec::ProcGenerator;
use genvisor_observe::{LogConfig, init_logger};

use crate::config::Config;

/// How long a stopping HTTP server may keep draining requests.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(&LogConfig::from_env())?;

    let cfg = Config::from_env()?;
    std::fs::create_dir_all(&cfg.base_dir)
        .with_context(|| format!("creating base directory {}", cfg.base_dir.display()))?;

    let generator = Arc::new(ProcGenerator::new(cfg.generator.clone()));
    let supervisor = Supervisor::start(cfg.instances.clone(), &cfg.assets_dir, generator);
    info!(instances = supervisor.instances().len(), "supervisor started");

    let app = genvisor_api::router(supervisor.instances().clone());
    let listener = TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .with_context(|| format!("binding port {}", cfg.port))?;
    info!(port = cfg.port, "http server listening");

    let stop = CancellationToken::new();
    let mut server = tokio::spawn({
        let stop = stop.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(stop.cancelled_owned())
                .await
        }
    });

    tokio::select! {
        signal = shutdown_signal() => {
            signal.context("installing signal handlers")?;
            info!("termination signal received, shutting down");
        }
        result = &mut server => {
            return Err(match result {
                Ok(Err(e)) => anyhow!(e).context("http server failed"),
                Ok(Ok(())) => anyhow!("http server exited unexpectedly"),
                Err(e) => anyhow!(e).context("http server task panicked"),
            });
        }
    }

    // Stop scheduling further generation runs. Loop tasks are not joined and
    // a run already in flight is left to finish on its own.
    supervisor.shutdown();

    stop.cancel();
    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(Ok(Ok(()))) => info!("shutdown complete"),
        Ok(Ok(Err(e))) => error!(error = %e, "http server error during shutdown"),
        Ok(Err(e)) => error!(error = %e, "http server task panicked during shutdown"),
        Err(_) => warn!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "http server did not stop within the grace period"
        ),
    }

    Ok(())
}

/// Resolve when the process is asked to stop (SIGINT or SIGTERM).
#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
