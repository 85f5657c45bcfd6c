use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service::datasource::JsonStore;
use catalog_service::errors::InternalError;
use catalog_service::state::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), InternalError> {
    // initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let state = AppState::new(JsonStore::new(config.data_dir.clone()));
    catalog_service::serve(state, config.port).await
}
