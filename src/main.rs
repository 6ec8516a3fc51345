use anyhow::Context;
use dotenvy::dotenv;
use edutrack::edutrack_config::AppConfig;
use edutrack::edutrack_db::seed::{ensure_superadmin, seed_default_classes};
use edutrack::edutrack_db::{init_db_pool, run_migrations};
use edutrack::logging::init_tracing;
use edutrack::metrics::{init_metrics, metrics_app};
use edutrack::router::init_router;
use edutrack::state::AppState;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.observability.log_dir)?;

    let db = init_db_pool(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&db).await?;
    }

    if config.bootstrap.seed_classes {
        seed_default_classes(&db).await?;
    }
    match config.bootstrap.superadmin_credentials() {
        Some((email, password)) => {
            ensure_superadmin(&db, email, password, &config.bootstrap.admin_name).await?;
        }
        None => warn!("ADMIN_EMAIL/ADMIN_PASS not set, no superadmin bootstrapped"),
    }

    let state = AppState::from_config(&config, db);
    let mut app = init_router(state);

    if config.observability.metrics_enabled {
        app = app.merge(metrics_app(init_metrics()?));
        info!("Prometheus metrics enabled at /metrics");
    }

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
