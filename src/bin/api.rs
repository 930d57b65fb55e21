use anyhow::Context;
use media_brief::{app_state::AppState, config::Config, logging, routes};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    logging::init(config.log_format());

    for (service, configured) in config.credential_status() {
        let status = if configured { "configured" } else { "missing" };
        info!(service, status, "api credential");
    }
    info!(
        model = %config.analysis().model,
        profile = ?config.analysis().profile,
        "analysis settings"
    );

    let state = AppState::new(&config).context("Failed to build HTTP clients")?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
