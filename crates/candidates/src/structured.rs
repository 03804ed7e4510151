// In crates/candidates/src/structured.rs

use core_types::TradeCandidate;

/// Parses the outermost `[...]` span of `raw` as a JSON array of candidates.
///
/// Returns `None` when the text has no array delimiters or the span is not
/// a valid candidate array.
pub fn parse_json_array(raw: &str) -> Option<Vec<TradeCandidate>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }

    match serde_json::from_str::<Vec<TradeCandidate>>(&raw[start..=end]) {
        Ok(candidates) => Some(candidates),
        Err(e) => {
            tracing::debug!(error = %e, "Bracketed span is not a candidate array.");
            None
        }
    }
}
