use anyhow::Context;
use dotenvy::dotenv;
use shelfwise::logging::{init_tracing, shutdown_tracer};
use shelfwise::metrics::{init_metrics, metrics_app, set_observability_enabled};
use shelfwise::modules::seed::Seeder;
use shelfwise::router::init_router;
use shelfwise::state::init_app_state;
use shelfwise_config::{ObservabilityConfig, ServerConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let observability = ObservabilityConfig::from_env();
    set_observability_enabled(observability.enabled);
    init_tracing(&observability).context("Failed to initialize logging")?;

    let server = ServerConfig::from_env();
    let state = init_app_state(&server).await?;

    if state.seed_config.on_startup {
        let seeder = Seeder::from_state(&state);
        tokio::spawn(async move {
            if let Err(e) = seeder.run().await {
                error!(error = %e, "Startup dataset import failed");
            }
        });
    }

    match init_metrics() {
        Ok(Some(handle)) => {
            let metrics_addr = server.metrics_addr();
            let listener = tokio::net::TcpListener::bind(&metrics_addr)
                .await
                .with_context(|| format!("Failed to bind metrics listener on {metrics_addr}"))?;
            info!(addr = %metrics_addr, "Metrics available at /metrics");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                    error!(error = %e, "Metrics server stopped");
                }
            });
        }
        Ok(None) => info!("Observability disabled, metrics exporter not started"),
        Err(e) => warn!(error = %e, "Failed to install metrics exporter"),
    }

    let app = init_router(state);

    let addr = server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server running");
    info!("Swagger UI available at http://{addr}/swagger-ui");
    info!("Scalar UI available at http://{addr}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
