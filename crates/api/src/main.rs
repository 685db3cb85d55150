use std::sync::Arc;

use anyhow::Context;

use estate_api::app::{build_app, services::AppServices};
use estate_auth::TokenService;
use estate_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Refuse to start without a signing secret, before anything is bound.
    let secret = config.signing_secret()?;
    let tokens = Arc::new(TokenService::new(secret));

    estate_observability::init(&config.logger.level);
    tracing::info!(level = %config.logger.level, "estate service starting");

    let services = AppServices::from_config(&config, tokens)
        .await
        .context("failed to initialize stores")?;
    let app = build_app(Arc::new(services), config.request_timeout());

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
