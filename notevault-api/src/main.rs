//! # NoteVault API Server
//!
//! Multi-tenant note API: users register and log in, then manage their own
//! notes. Admins see every note.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) STORE_BACKEND=memory cargo run -p notevault-api
//! ```

use anyhow::Context;
use notevault_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use notevault_shared::{
    db::{
        migrations::{migration_status, run_migrations},
        pool::{close_pool, create_pool, PoolConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "notevault_api=debug,notevault_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "NoteVault API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;
    let bind_address = config.bind_address();

    let (state, pool) = match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .clone()
                .context("DATABASE_URL environment variable is required")?;

            let pool = create_pool(PoolConfig {
                url,
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await
            .context("Failed to connect to database")?;

            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            let status = migration_status(&pool).await?;
            tracing::info!(
                applied = status.applied_migrations,
                latest = ?status.latest_version,
                up_to_date = status.is_up_to_date,
                "Migration status"
            );

            let store = Arc::new(PgStore::new(pool.clone()));
            (AppState::new(store, config), Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            (AppState::new(Arc::new(MemoryStore::new()), config), None)
        }
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections...");
}
