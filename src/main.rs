use envelope_budget::config::Config;
use envelope_budget::{BudgetState, BudgetStorage, HttpIdentityProvider, budget_router};
use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        app_name = %cfg.app_name,
        environment = %cfg.environment,
        database_url = %cfg.database_url,
        verify_url = %cfg.identity.verify_url,
        loglevel = %cfg.loglevel
    );

    let storage = BudgetStorage::connect(&cfg.database_url).await?;
    let identity = HttpIdentityProvider::new(&cfg.identity)?;

    let state = BudgetState::new(
        storage,
        Arc::new(identity),
        cfg.app_name.as_str(),
        cfg.environment.as_str(),
    );
    let app = budget_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
