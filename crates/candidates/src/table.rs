// In crates/candidates/src/table.rs

use core_types::TradeCandidate;

/// Minimum columns for a row to count: ticker, strategy, legs, thesis, POP.
const MIN_FIELDS: usize = 5;

/// Scans loosely formatted, pipe-delimited tabular text for candidate rows.
///
/// A line mentioning `Ticker` opens the table. Separator (`---`) and blank lines are
/// skipped, and rows with fewer than five fields are ignored. Columns six to eight,
/// when present, are read as max loss, max profit and score.
pub fn parse_table(raw: &str) -> Vec<TradeCandidate> {
    let mut candidates = Vec::new();
    let mut in_table = false;

    for line in raw.lines() {
        let line = line.trim();

        if line.contains("Ticker") {
            in_table = true;
            continue;
        }
        if line.is_empty() || line.contains("---") || !in_table {
            continue;
        }

        let row = line.strip_prefix('|').unwrap_or(line);
        let row = row.strip_suffix('|').unwrap_or(row);
        let fields: Vec<&str> = row.split('|').map(str::trim).collect();
        if fields.len() < MIN_FIELDS {
            continue;
        }

        candidates.push(TradeCandidate {
            ticker: fields[0].to_string(),
            strategy: fields[1].to_string(),
            legs: fields[2].to_string(),
            thesis: fields[3].to_string(),
            probability_of_profit: parse_percent(fields[4]),
            max_loss: fields.get(5).map_or(0.0, |f| parse_amount(f)),
            max_profit: fields.get(6).map_or(0.0, |f| parse_amount(f)),
            score: fields.get(7).map_or(0.0, |f| parse_amount(f)),
        });
    }

    candidates
}

/// `"72%"` -> `0.72`. Anything unparseable is `0.0`.
pub fn parse_percent(field: &str) -> f64 {
    let trimmed = field.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| v / 100.0)
}

/// `"$1,250"` -> `1250.0`. Anything unparseable is `0.0`.
pub fn parse_amount(field: &str) -> f64 {
    let cleaned: String = field
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
