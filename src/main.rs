use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use vidtube::logging::{init_tracing, shutdown_tracer};
use vidtube::metrics::{self, init_metrics, metrics_app};
use vidtube::router::init_router;
use vidtube::state::init_app_state;
use vidtube_config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    metrics::configure(config.observability.metrics_enabled);
    init_tracing(&config.observability).context("Failed to initialize logging")?;

    let port = config.server.port;
    let metrics_port = config.server.metrics_port;

    let state = init_app_state(config).await?;
    let app = init_router(state);

    if let Some(handle) = init_metrics().context("Failed to install metrics recorder")? {
        let addr = SocketAddr::from(([0, 0, 0, 0], metrics_port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind metrics port {metrics_port}"))?;
        tracing::info!(%addr, "Metrics endpoint listening");

        tokio::spawn(async move {
            let served = axum::serve(listener, metrics_app(handle))
                .with_graceful_shutdown(shutdown_signal())
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    tracing::info!("Server running on http://localhost:{port}");
    tracing::info!("Swagger UI available at http://localhost:{port}/swagger-ui");
    tracing::info!("Scalar UI available at http://localhost:{port}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
