// In crates/ledger/src/lib.rs

use app_config::LedgerSettings;

pub mod clock;
pub mod error;
pub mod json_store;
pub mod memory_store;
pub mod partition;
pub mod store;
pub mod tracker;

// Re-export the most important types for easy access.
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use partition::PartitionKey;
pub use store::PartitionStore;
pub use tracker::PerformanceLedger;

/// Opens the file-backed performance ledger described by `settings`.
///
/// The data directory is created if it does not exist yet. Opening never reads
/// a partition; malformed files surface on first access.
pub async fn open(settings: &LedgerSettings) -> Result<PerformanceLedger> {
    let store = JsonFileStore::new(&settings.data_dir, settings.file_prefix.clone()).await?;
    tracing::info!(
        data_dir = %store.data_dir().display(),
        prefix = %settings.file_prefix,
        "Opening performance ledger."
    );
    Ok(PerformanceLedger::new(store))
}
