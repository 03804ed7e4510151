// In crates/candidates/src/lib.rs

use core_types::TradeCandidate;

pub mod error;
pub mod structured;
pub mod table;

pub use error::{Error, Result};

/// Rationale strings are clipped to this many characters.
pub const MAX_THESIS_CHARS: usize = 280;

/// Turns raw generator output into structured trade candidates.
///
/// The structured pass runs first: the text between the first `[` and the last `]`
/// is parsed as a JSON array of candidates. If that yields nothing, the output is
/// scanned as a pipe-delimited table instead. Only when both passes come up empty
/// does this fail with [`Error::NoCandidatesFound`].
pub fn normalize(raw: &str) -> Result<Vec<TradeCandidate>> {
    let candidates = match structured::parse_json_array(raw) {
        Some(parsed) if !parsed.is_empty() => {
            tracing::debug!(count = parsed.len(), "Parsed candidates from JSON array.");
            parsed
        }
        _ => {
            let parsed = table::parse_table(raw);
            tracing::debug!(count = parsed.len(), "Fell back to tabular candidate parsing.");
            parsed
        }
    };

    if candidates.is_empty() {
        tracing::warn!("Model output contained no usable trade candidates.");
        return Err(Error::NoCandidatesFound);
    }

    Ok(candidates.into_iter().map(clip_thesis).collect())
}

fn clip_thesis(mut candidate: TradeCandidate) -> TradeCandidate {
    if let Some((byte_idx, _)) = candidate.thesis.char_indices().nth(MAX_THESIS_CHARS) {
        candidate.thesis.truncate(byte_idx);
    }
    candidate
}
