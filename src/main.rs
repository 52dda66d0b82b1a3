#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use anyhow::Context;
use dm_server::adapters::database::{self, PgChatRepository};
use dm_server::config::{Command, Config};
use dm_server::services::import_service::{ImportSummary, UserImportService};
use dm_server::{api, telemetry};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    dm_server::setup_panic_hook();

    let result = match config.command() {
        Command::Serve => serve(&config).await,
        Command::Migrate => migrate(&config).await,
        Command::ImportUsers { path } => import_users(&config, &path).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = ?e, "Command failed");
    }

    telemetry_guard.shutdown();
    result
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app, pool) = async {
        // Connect eagerly so an unreachable database aborts startup.
        let pool = database::init_pool(&config.database).await.context("failed to connect to database")?;
        let repo = Arc::new(PgChatRepository::new(pool.clone()));

        let (app_state, mgmt_state) = dm_server::build_states(repo, config.health.clone());
        let app_router = api::app_router(app_state);
        let mgmt_app = api::mgmt_router(mgmt_state);

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        Ok::<_, anyhow::Error>((api_listener, mgmt_listener, app_router, mgmt_app, pool))
    }
    .instrument(boot_span)
    .await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    dm_server::spawn_signal_handler(shutdown_tx);

    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router).with_graceful_shutdown(async move {
        let _ = api_rx.wait_for(|&s| s).await;
    });

    let mut mgmt_rx = shutdown_rx;
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app).with_graceful_shutdown(async move {
        let _ = mgmt_rx.wait_for(|&s| s).await;
    });

    if let Err(e) = tokio::try_join!(api_server, mgmt_server) {
        tracing::error!(error = %e, "Server error");
    }

    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    if tokio::time::timeout(timeout, pool.close()).await.is_err() {
        tracing::warn!("Timeout waiting for database connections to close.");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    let pool = database::init_pool(&config.database).await.context("failed to connect to database")?;
    database::run_migrations(&pool).await.context("failed to run migrations")?;
    tracing::info!("Migrations applied");
    pool.close().await;
    Ok(())
}

async fn import_users(config: &Config, path: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pool = database::init_pool(&config.database).await.context("failed to connect to database")?;
    let service = UserImportService::new(Arc::new(PgChatRepository::new(pool.clone())));

    match service.import(&contents).await? {
        ImportSummary::TableNotEmpty { existing } => {
            tracing::info!(existing, "Users table already populated, nothing imported");
        }
        ImportSummary::Completed(report) => {
            tracing::info!(
                path = %path.display(),
                imported = report.imported,
                skipped = report.skipped,
                failed = report.failed.len(),
                "Users imported"
            );
        }
    }

    pool.close().await;
    Ok(())
}
