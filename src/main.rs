use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nutrition_tracker_server::{
    config::Config, create_app, database::Database, handlers::AppState,
};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutrition_tracker_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loads .env first so RUST_LOG can come from it.
    let config = Config::from_env()?;
    init_tracing();

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    tracing::info!("Database ready at {}", config.database_url);

    let address = config.bind_address();
    let state = AppState::new(config, database)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
