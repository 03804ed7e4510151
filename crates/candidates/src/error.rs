// In crates/candidates/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No trade candidates found in model output")]
    NoCandidatesFound,
}

pub type Result<T> = std::result::Result<T, Error>;
