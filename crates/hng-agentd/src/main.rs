mod config;
mod server;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use hng_api::TranslatorAdapter;
use hng_core::{CredentialStore, JsonFileStore, RequestThrottler, StoreHandle, ThrottlerContext};
use hng_groq::{ChatClient, Translator};
use hng_observe::{init_local_offset, init_logger};
use hng_prometheus::PrometheusMetrics;

use crate::config::AgentConfig;

fn main() -> anyhow::Result<()> {
    // Local offset must be read while the process is still single-threaded.
    init_local_offset();

    let cfg = AgentConfig::from_env()?;
    init_logger(&cfg.logger)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    // 1) storage
    let store: StoreHandle = Arc::new(JsonFileStore::open(cfg.store_path()).await?);
    info!(path = %cfg.store_path().display(), "storage opened");

    // 2) metrics + throttler
    let metrics = PrometheusMetrics::new()?;
    let ctx = ThrottlerContext::new(store.clone(), Arc::new(metrics.clone()));
    let throttler = RequestThrottler::load(cfg.throttle.clone(), ctx).await?;
    info!(
        calls = throttler.call_count(),
        placement = ?cfg.throttle.placement,
        "throttler ready"
    );

    // 3) translator
    let client = ChatClient::new(cfg.chat.clone())?;
    let credentials = CredentialStore::with_memory_session(store.clone());
    let translator = Translator::new(client, throttler.clone(), credentials, store)
        .with_group_size(cfg.group_size);

    // 4) http
    let app = server::router(Arc::new(TranslatorAdapter::new(translator)), metrics);
    let listener = tokio::net::TcpListener::bind(cfg.listen)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen))?;
    info!(addr = %cfg.listen, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .context("http server error")?;

    throttler.shutdown();
    info!("stopped");
    Ok(())
}
