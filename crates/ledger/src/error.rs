// In crates/ledger/src/error.rs

use core_types::RecordStatus;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Recommendation record not found: {id}")]
    RecordNotFound { id: String },

    #[error("Record {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: RecordStatus,
        to: RecordStatus,
    },

    #[error("Trade result must be a finite number, got {0}")]
    InvalidProfit(f64),

    #[error("Ledger I/O failed for {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ledger partition {} is malformed", path.display())]
    CorruptPartition {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize ledger partition")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Unknown ids are recoverable: callers log and carry on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RecordNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
