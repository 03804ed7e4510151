// In app/src/inputs.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};
use core_types::{PortfolioSnapshot, Position};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Reads a whole file, or stdin when the path is `-`.
pub fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read model output from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_portfolio(path: &Path) -> Result<PortfolioSnapshot> {
    let content = read_text(path)?;
    serde_json::from_str(&content).with_context(|| format!("Invalid portfolio snapshot in {}", path.display()))
}

/// Either a bare list of positions or a snapshot wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum PositionsInput {
    List(Vec<Position>),
    Snapshot(PortfolioSnapshot),
}

pub fn read_positions(path: &Path) -> Result<Vec<Position>> {
    let content = read_text(path)?;
    let input: PositionsInput =
        serde_json::from_str(&content).with_context(|| format!("Invalid positions in {}", path.display()))?;
    Ok(match input {
        PositionsInput::List(positions) => positions,
        PositionsInput::Snapshot(snapshot) => snapshot.positions,
    })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", value, e))
}

/// Resolves the `metrics` date arguments into a query range.
///
/// The end date is inclusive, so it maps to midnight at the start of the next day.
pub fn metrics_range(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let end = match end {
        Some(value) => parse_date(value)?
            .checked_add_days(Days::new(1))
            .context("End date is out of range")?
            .and_hms_opt(0, 0, 0)
            .context("End date is out of range")?
            .and_utc(),
        None => now,
    };
    let start = match start {
        Some(value) => parse_date(value)?
            .and_hms_opt(0, 0, 0)
            .context("Start date is out of range")?
            .and_utc(),
        None => end - chrono::Duration::days(30),
    };
    if start >= end {
        anyhow::bail!("Start {} must be before end {}", start, end);
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_range_is_last_thirty_days() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let (start, end) = metrics_range(None, None, now).unwrap();
        assert_eq!(end, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 9, 19, 12, 0, 0).unwrap());
    }

    #[test]
    fn explicit_end_date_is_inclusive() {
        let now = Utc::now();
        let (start, end) = metrics_range(Some("2026-09-01"), Some("2026-09-30"), now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn inverted_or_malformed_dates_are_rejected() {
        let now = Utc::now();
        assert!(metrics_range(Some("2026-10-02"), Some("2026-09-30"), now).is_err());
        assert!(metrics_range(Some("10/02/2026"), None, now).is_err());
    }

    #[test]
    fn positions_accept_list_or_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.json");
        std::fs::write(&list, r#"[{"symbol": "SPY", "market_value": 1000.0}]"#).unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, r#"{"total_value": 5000.0, "positions": [{"symbol": "QQQ"}, {}]}"#).unwrap();

        assert_eq!(read_positions(&list).unwrap()[0].symbol.as_deref(), Some("SPY"));
        assert_eq!(read_positions(&snapshot).unwrap().len(), 2);
    }
}
