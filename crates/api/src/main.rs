use anyhow::Context;

use stockroom_infra::StockroomConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StockroomConfig::from_env().context("failed to load configuration")?;
    stockroom_observability::init(config.log_format);

    if config.uses_default_credentials {
        tracing::warn!("STOCKROOM_USERNAME/STOCKROOM_PASSWORD not set; using insecure dev default");
    }

    let app = stockroom_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        catalog = %config.catalog_path.display(),
        log = %config.log_path.display(),
        read_only = config.read_only,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
