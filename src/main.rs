use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{body::Body, http::Request, ServiceExt};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};

use stockroom as app;

#[derive(Parser)]
#[command(name = "stockroom", about = "Inventory catalogue of products and suppliers", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Default)]
enum Command {
    /// Serve the web application (default)
    #[default]
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Insert a small sample catalogue
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = app::config::load_config().context("failed to load configuration")?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json || cfg.is_production());

    let db_pool = app::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;

    match cli.command.unwrap_or_default() {
        Command::Migrate => {
            app::db::run_migrations(&db_pool).await?;
            app::db::close_pool(db_pool).await?;
        }
        Command::Seed => {
            let created = app::seed::seed_database(db_pool).await?;
            println!("Seeded {} products", created);
        }
        Command::Serve => serve(cfg, db_pool).await?,
    }

    Ok(())
}

async fn serve(cfg: app::config::AppConfig, db_pool: app::db::DbPool) -> anyhow::Result<()> {
    if cfg.auto_migrate {
        app::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let db = Arc::new(db_pool);
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    let environment = cfg.environment.clone();

    let state = app::AppState::new(db.clone(), cfg)?;
    let service = app::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, %environment, "Stockroom listening");

    axum::serve(
        listener,
        ServiceExt::<Request<Body>>::into_make_service(service),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped, closing database pool");
    match Arc::try_unwrap(db) {
        Ok(pool) => app::db::close_pool(pool).await?,
        Err(_) => info!("Database pool still shared at shutdown; leaving it to drop"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
