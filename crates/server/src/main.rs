//! Speaking feedback server binary

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use speakscore_config::load_settings;
use speakscore_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("SPEAKSCORE_CONFIG").ok();
    let settings = load_settings(Some(
        config_path.as_deref().unwrap_or("speakscore.toml"),
    ))?;

    let addr = settings.server.bind_addr();
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "speakscore server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
