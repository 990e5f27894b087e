// src/main.rs
use std::sync::Arc;

use dotenvy::dotenv;
use quiz_api::{
    config::Config,
    db::PgConnector,
    routes::{self, AppState},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok(); // Load environment variables from .env file

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quiz_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL is not set, every request except OPTIONS will fail");
    }

    let addr = config.bind_address().parse()?;
    let state = AppState {
        config: Arc::new(config),
        connector: Arc::new(PgConnector),
    };
    let app = routes::create_routes(state);

    tracing::info!("Server running on: {}", addr);
    axum_server::bind(addr).serve(app.into_make_service()).await?;

    Ok(())
}
