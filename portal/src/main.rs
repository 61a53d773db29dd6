// SeaCollege Voice - campus complaint portal
// Entry point and application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use seacollege_voice::{app, config::Config, gui};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seacollege_voice=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SeaCollege Voice");

    let config = Config::from_env();

    // The window owns the main thread, so the runtime is built by hand rather
    // than entered through #[tokio::main]
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let state = runtime
        .block_on(app::setup(&config))
        .context("failed to open the portal store")?;

    gui::launch_gui(runtime.handle().clone(), state)
        .map_err(|e| anyhow::anyhow!("window error: {}", e))?;

    tracing::info!("SeaCollege Voice closed");
    Ok(())
}
