use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "ClinicalDiagnosis";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key under which the sanitized current identity is persisted.
pub const SESSION_KEY: &str = "clinicalUser";

/// Simulated network latency for login/signup.
pub const AUTH_DELAY_MS: u64 = 1000;

/// Simulated inference latency for a prediction run.
pub const PREDICTION_DELAY_MS: u64 = 1500;

/// Get the application data directory.
/// Falls back to the system temp dir when no per-user data dir exists (CI containers).
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// File backing the persisted identity (one key, one file).
pub fn session_file() -> PathBuf {
    app_data_dir().join(format!("{SESSION_KEY}.json"))
}

/// SQLite database used by the persistence layer.
pub fn database_path() -> PathBuf {
    app_data_dir().join("clinical.db")
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinical_diagnosis=info,warn"
}

/// Simulated delays for the async service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub auth_delay: Duration,
    pub prediction_delay: Duration,
}

impl ServiceConfig {
    /// No simulated latency. Used by tests and batch tooling.
    pub fn instant() -> Self {
        Self {
            auth_delay: Duration::ZERO,
            prediction_delay: Duration::ZERO,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth_delay: Duration::from_millis(AUTH_DELAY_MS),
            prediction_delay: Duration::from_millis(PREDICTION_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_under_app_data() {
        let file = session_file();
        assert!(file.starts_with(app_data_dir()));
        assert!(file.ends_with("clinicalUser.json"));
    }

    #[test]
    fn database_under_app_data() {
        assert!(database_path().starts_with(app_data_dir()));
    }

    #[test]
    fn default_delays_match_simulated_latency() {
        let config = ServiceConfig::default();
        assert_eq!(config.auth_delay, Duration::from_millis(1000));
        assert_eq!(config.prediction_delay, Duration::from_millis(1500));
    }

    #[test]
    fn instant_config_has_no_delay() {
        let config = ServiceConfig::instant();
        assert!(config.auth_delay.is_zero());
        assert!(config.prediction_delay.is_zero());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
