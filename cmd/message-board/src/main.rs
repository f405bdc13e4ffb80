//! # message-board
//!
//! Assembles the board from configuration: picks a store, wires the
//! services and serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{router, AppState};
use auth_adapters::Argon2Guard;
use configs::{LogFormat, LogSettings, Settings, StorageBackend, StorageSettings};
use domains::{ReplyRepository, ThreadRepository};
use services::{ReplyService, ThreadService};
use storage_adapters::MemoryStore;
use tracing_subscriber::EnvFilter;

type Stores = (Arc<dyn ThreadRepository>, Arc<dyn ReplyRepository>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_tracing(&settings.log);

    let (threads, replies) = open_stores(&settings.storage).await?;
    let guard = Arc::new(Argon2Guard::new());

    let state = AppState::new(
        ThreadService::new(threads.clone(), replies.clone(), guard.clone()),
        ReplyService::new(threads, replies, guard),
    );
    let app = router(state, &settings.cors.allowed_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, backend = ?settings.storage.backend, "message board listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("message board stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_stores(storage: &StorageSettings) -> anyhow::Result<Stores> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; posts are lost on restart");
            let store = Arc::new(MemoryStore::new());
            let threads: Arc<dyn ThreadRepository> = store.clone();
            let replies: Arc<dyn ReplyRepository> = store;
            Ok((threads, replies))
        }
        #[cfg(feature = "db-postgres")]
        StorageBackend::Postgres => {
            use secrecy::ExposeSecret;

            let url = storage
                .database_url
                .as_ref()
                .context("storage.database_url is required for postgres")?;
            let store = storage_adapters::PgStore::connect(
                url.expose_secret(),
                storage.max_connections,
            )
            .await
            .context("failed to connect to postgres")?;
            let store = Arc::new(store);
            let threads: Arc<dyn ThreadRepository> = store.clone();
            let replies: Arc<dyn ReplyRepository> = store;
            Ok((threads, replies))
        }
        #[cfg(not(feature = "db-postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("postgres storage requested but this build lacks the db-postgres feature")
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
