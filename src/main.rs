use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use rollcall::logging::init_tracing;
use rollcall::metrics::{init_metrics, metrics_app};
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
use rollcall_db::{init_db_pool, run_migrations};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config.log_dir);

    if let Err(e) = run(server_config).await {
        tracing::error!(error = ?e, "Server exited with error");
        std::process::exit(1);
    }
}

async fn run(server_config: ServerConfig) -> anyhow::Result<()> {
    let database_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;

    let db = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;

    if database_config.run_migrations {
        run_migrations(&db)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let state = AppState::new(db, JwtConfig::from_env(), CorsConfig::from_env());
    let app = init_router(state);

    if server_config.metrics_enabled
        && let Some(handle) = init_metrics()
    {
        let metrics_address = server_config.metrics_address();
        let listener = TcpListener::bind(&metrics_address)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {metrics_address}"))?;
        tracing::info!(address = %metrics_address, "Metrics endpoint listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(address = %address, "Server running");
    tracing::info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
