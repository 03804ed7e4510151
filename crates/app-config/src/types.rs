// In crates/app-config/src/types.rs

use serde::Deserialize;
use std::path::PathBuf;

use risk::RiskLimits;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Limits enforced by the risk policy on every validation pass.
    #[serde(default)]
    pub risk: RiskLimits,
    /// Where and how the performance ledger persists its partitions.
    pub ledger: LedgerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LedgerSettings {
    /// Directory holding one JSON file per calendar month.
    pub data_dir: PathBuf,
    /// File name prefix; partitions are named `{prefix}_{YYYY_MM}.json`.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Pending recommendations older than this are swept to `expired`.
    #[serde(default = "default_expire_after_hours")]
    pub expire_after_hours: u64,
}

/// Helper functions for serde defaults
fn default_log_level() -> String { "info".to_string() }
fn default_file_prefix() -> String { "ai_performance".to_string() }
fn default_expire_after_hours() -> u64 { 72 }
