//--------------------------------------------------------------------------------------------------
// Starts the registry and the HTTP adapter (SPEC_FULL.md §6). Grounded on the source's
// `bin/api_server.rs` wiring: load config, install the tracing subscriber once, bind, serve.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use ultimate_matching::api::{router, AppState};
use ultimate_matching::{Config, LoggingSinkFactory, Registry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter.clone()))
        .init();

    let registry = Registry::new(Arc::new(LoggingSinkFactory));
    let state = Arc::new(AppState { registry });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.http_bind_addr).await?;
    tracing::info!(instance_id = %config.instance_id, addr = %config.http_bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
