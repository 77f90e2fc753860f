pub mod auth;
pub mod config;
pub mod core_state;
pub mod dashboard;
pub mod db;
pub mod diagnosis_session;
pub mod identity_store;
pub mod mock_data;
pub mod models;
pub mod notice;
pub mod prediction;
pub mod records;
pub mod task;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::ServiceConfig;
use crate::core_state::{CoreError, CoreState};
use crate::db::{ClinicalDatabase, SqliteDatabase};
use crate::identity_store::{FileKeyValueStore, IdentityStore};

/// Install the global subscriber. `RUST_LOG` wins over the built-in filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Build the process-wide state, backed by the on-disk database when it opens.
pub fn boot(config: ServiceConfig) -> Result<Arc<CoreState>, CoreError> {
    let identity = IdentityStore::new(Box::new(FileKeyValueStore::in_app_data()));
    let state = match SqliteDatabase::open(&config::database_path()) {
        Ok(db) => {
            let db: Arc<dyn ClinicalDatabase> = Arc::new(db);
            CoreState::with_database(config, identity, db)?
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database unavailable, using built-in model catalog");
            CoreState::new(config, identity)
        }
    };
    Ok(Arc::new(state))
}

pub fn run() -> Result<(), CoreError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let state = boot(ServiceConfig::default())?;

    state.auth().restore_session();
    tracing::info!(landing = state.auth().landing().route(), "Startup landing resolved");

    let overview = state.dashboard()?;
    tracing::info!(
        patients = overview.total_patients,
        models = overview.model_count,
        average_accuracy = overview.average_accuracy,
        weekly_predictions = overview.weekly_total,
        "Dashboard ready"
    );
    Ok(())
}
