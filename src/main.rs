use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use page_extract::{
    config::Config,
    api::routes::create_router,
    service::Extractor,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let server_addr = config.server_addr;
    info!(
        timeout_ms = config.extract.timeout_ms,
        min_paragraph_length = config.extract.min_paragraph_length,
        "starting extraction service"
    );

    let app_state = AppState::new(Extractor::new(config.extract)?);
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!(%server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
