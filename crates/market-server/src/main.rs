//! market-server binary

use anyhow::Context;
use clap::Parser;
use market_llm::providers::TogetherProvider;
use market_ner::EntityExtractor;
use market_scripts::PythonScripts;
use market_server::{AppState, ServerArgs, router};
use market_utils::AppInfo;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = market_utils::load_dotenv();
    market_utils::init_tracing();

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let args = ServerArgs::parse();
    let app_info = AppInfo::new("market-server").with_env_environment();
    info!("Starting {} ({:?})", app_info.app_name, app_info.environment);

    let provider =
        TogetherProvider::from_env().context("failed to configure completion provider")?;
    let profile = args.extraction_profile()?;
    info!(
        "Extraction model {} with {} allowed tickers",
        profile.model,
        profile.universe.len()
    );
    let extractor = EntityExtractor::with_profile(Arc::new(provider), profile);

    let scripts = PythonScripts::new(args.script_config())?;
    info!(
        "Running scripts from {} with {}",
        args.scripts_dir.display(),
        args.python
    );

    if app_info.is_production() && args.cors_origin.is_none() {
        warn!("CORS_ORIGIN is not set; allowing requests from any origin");
    }

    let state = AppState::new(extractor, Arc::new(scripts));
    let app = router(state, args.cors_origin.as_deref())?;

    let addr = args.addr().await?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
