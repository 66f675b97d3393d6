//! `beaconpost run`: start the proxy server.
//!
//! Resolves and validates the configuration before anything is bound,
//! then serves the router until Ctrl+C / SIGTERM. An invalid
//! configuration ends the process without opening a listening socket.

use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), ProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = Arc::new(ProxyConfig::from_args(&args.proxy)?);

    let state = Arc::new(AppState::new(
        Arc::clone(&config),
        server::build_http_client(),
    ));
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_address.as_str()).await?;

    tracing::info!(
        addr = %config.listen_address,
        script_url = %config.script_url.as_template(),
        api_url = %config.api_url,
        cors = config.cors_origins.is_some(),
        "beaconpost started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("beaconpost stopped");
    Ok(())
}
