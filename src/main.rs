use std::sync::Arc;

use flavorfit_api::{
    config::Config,
    db::{self, postgres::run_migrations, Cache, PgCatalog},
    create_router,
    error::AppError,
    services::ModelHandle,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flavorfit_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "Loaded configuration");

    let pool = db::create_pool(&config.database_url)?;
    if config.run_migrations {
        if let Err(e) = run_migrations(&pool).await {
            tracing::warn!(error = %e, "Migrations failed, continuing without them");
        }
    }

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_handle) = Cache::new(redis_client);

    let catalog = PgCatalog::new(pool, cache, config.catalog_cache_ttl);

    let model = match config.model_settings() {
        Ok(settings) => {
            tracing::info!(
                model_name = %settings.model_name,
                model_version = %settings.model_version,
                "Scoring model will load on first request"
            );
            ModelHandle::lazy(settings)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Scoring model not configured, recommendations will fail");
            let reason = match e {
                AppError::ModelUnavailable(reason) => reason,
                other => other.to_string(),
            };
            ModelHandle::unconfigured(reason)
        }
    };

    let state = Arc::new(AppState::new(Arc::new(catalog), model));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        _ = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Starting graceful shutdown");
}
