// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use risk::RiskLimits;
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, LedgerSettings, Settings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables (e.g., `APP__RISK__MIN_PROBABILITY_OF_PROFIT=0.7`).
///
/// The resulting risk limits are validated before they are handed out.
pub fn load_settings_from(dir: impl AsRef<Path>) -> Result<Settings> {
    let dir = dir.as_ref();
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::from(dir.join("base")))
        .add_source(File::from(dir.join(&environment)).required(false))
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.risk.validate()?;

    Ok(settings)
}

/// Loads a standalone risk-limits file, e.g. one handed over by whoever owns policy configuration.
///
/// Keys missing from the file keep their default values.
pub fn load_risk_limits(path: impl AsRef<Path>) -> Result<RiskLimits> {
    let content = std::fs::read_to_string(path)?;

    let limits: RiskLimits = toml::from_str(&content)?;
    limits.validate()?;
    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BASE: &str = r#"
[app]
environment = "test"

[ledger]
data_dir = "data/ledger"

[risk]
min_probability_of_profit = 0.7
"#;

    #[test]
    fn base_file_is_loaded_with_defaults_filled_in() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let settings = load_settings_from(dir.path()).unwrap();
        assert_eq!(settings.app.environment, "test");
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.ledger.file_prefix, "ai_performance");
        assert_eq!(settings.ledger.expire_after_hours, 72);
        assert_eq!(settings.risk.min_probability_of_profit, 0.7);
        assert_eq!(settings.risk.max_position_size_percent, 0.5);
        assert!(settings.risk.require_manual_approval);
    }

    #[test]
    fn invalid_limits_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            BASE.replace("min_probability_of_profit = 0.7", "min_probability_of_profit = 70.0"),
        )
        .unwrap();

        assert!(matches!(load_settings_from(dir.path()), Err(Error::InvalidLimits(_))));
    }

    #[test]
    fn standalone_limits_file_overrides_selected_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("limits.toml");
        fs::write(&path, "max_portfolio_risk_percent = 3.5\nrequire_manual_approval = false\n").unwrap();

        let limits = load_risk_limits(&path).unwrap();
        assert_eq!(limits.max_portfolio_risk_percent, 3.5);
        assert!(!limits.require_manual_approval);
        assert_eq!(limits.max_concentration_percent, 10.0);
    }

    #[test]
    fn missing_limits_file_is_an_io_error() {
        assert!(matches!(load_risk_limits("/nonexistent/limits.toml"), Err(Error::IoError(_))));
    }
}
