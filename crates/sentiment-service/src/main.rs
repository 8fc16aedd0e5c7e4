use std::sync::Arc;

use anyhow::Context;
use sentiment_model::ArtifactStore;
use sentiment_service::{router, Config, State};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting review sentiment service");

    let config = Config::from_env()?;
    let store = ArtifactStore::new(&config.artifact_dir);
    let model = store
        .load()
        .with_context(|| format!("cannot load model artifacts from {}", store.dir().display()))?;

    let app = router(Arc::new(State::new(model)));

    let addr = config.addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
