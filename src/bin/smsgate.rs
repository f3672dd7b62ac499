// ABOUTME: Gateway server: binds the SMPP session, connects the cache and serves the HTTP API
// ABOUTME: Any startup failure exits before the listener opens; ctrl-c drains requests then unbinds

use anyhow::{Context, Result};
use smsgate::client::SmppSession;
use smsgate::gateway::{router, FileRegistry, GatewayConfig, MessageService, RedisCache};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        smsc = %config.smsc_address,
        id_policy = ?config.id_policy,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting smsgate"
    );

    let session = SmppSession::establish(
        config.smsc_address.as_str(),
        &config.credentials,
        config.session_options(),
    )
    .await
    .with_context(|| format!("binding to SMSC at {}", config.smsc_address))?;

    let cache = RedisCache::connect(&config.redis_url)
        .await
        .with_context(|| format!("connecting to redis at {}", config.redis_url))?;

    let service = Arc::new(MessageService::new(
        session.clone(),
        FileRegistry::new(&config.clients_file),
        cache,
        config.service_settings(),
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    session.shutdown().await;
    info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
