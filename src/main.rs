use std::sync::Arc;

use follidoc_api::{
    AppState, app,
    config::Config,
    fomo::rotator,
    store::{EnquiryStore, FomoStore, LocationStore, memory::MemStore, sqlite::SqliteStore},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let (enquiries, locations, fomo): (
        Arc<dyn EnquiryStore>,
        Arc<dyn LocationStore>,
        Arc<dyn FomoStore>,
    ) = match &config.database_url {
        Some(url) => {
            info!(%url, "using sqlite store");
            let store = Arc::new(SqliteStore::connect(url).await?);
            (store.clone(), store.clone(), store)
        }
        None => {
            info!(latency = config.mock_latency, "using in-memory mock store");
            let store = Arc::new(MemStore::seeded(config.mock_latency)?);
            (store.clone(), store.clone(), store)
        }
    };

    let rotator = rotator::spawn(fomo.clone(), config.rotator.clone());
    let state = AppState {
        enquiries,
        locations,
        fomo,
        rotator,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
