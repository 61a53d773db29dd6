//! Application state and initialization
//!
//! This module builds the shared application state once at startup.
//! Views receive a clone of [`AppState`] when they are created.

use crate::config::Config;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{AdvisorClient, ComplaintsService, TeachersService};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub complaints: ComplaintsService,
    pub teachers: TeachersService,
    pub advisor: AdvisorClient,
}

impl AppState {
    pub fn new(repo: Repository, advisor: AdvisorClient) -> Self {
        Self {
            complaints: ComplaintsService::new(repo.clone()),
            teachers: TeachersService::new(repo),
            advisor,
        }
    }
}

/// Application setup - called once on startup
pub async fn setup(config: &Config) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("Data directory: {:?}", config.data_dir);

    std::fs::create_dir_all(&config.data_dir)?;

    let pool = create_pool(&config.database_path()).await?;
    let repo = Repository::new(pool);
    let advisor = AdvisorClient::new(config);

    tracing::info!(
        "Application initialized (AI analysis {})",
        if advisor.is_configured() { "enabled" } else { "disabled" }
    );

    Ok(AppState::new(repo, advisor))
}
