use pet_diary::{router, AppState, Change, Config, DiaryStore, FileStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let backend = FileStore::open(&config.data_dir)?;
    let mut store = DiaryStore::open(Arc::new(backend));
    store.subscribe(log_change);
    info!(
        "loaded {} records for {} from {}",
        store.len(),
        config.pet_name,
        config.data_dir.display()
    );

    let state = AppState::new(config.pet_name.clone(), store);
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn log_change(change: &Change) {
    match change {
        Change::RecordAdded(record) => info!("added record {} for {}", record.id, record.date),
        Change::RecordDeleted(record) => info!("deleted record {} for {}", record.id, record.date),
        Change::AvatarChanged => info!("avatar updated"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
