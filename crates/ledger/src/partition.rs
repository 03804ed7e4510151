// In crates/ledger/src/partition.rs

use chrono::{DateTime, Datelike, Utc};
use std::fmt;
use std::str::FromStr;

/// Identifies one calendar month of the ledger. Displays as `YYYY_MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey {
    pub year: i32,
    /// 1-12.
    pub month: u32,
}

impl PartitionKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    /// The partition an instant belongs to.
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self::new(instant.year(), instant.month())
    }

    /// Whether any instant of this month falls within `start..=end`.
    /// Always false when `start` is after `end`.
    pub fn overlaps(self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= end && Self::of(start) <= self && self <= Self::of(end)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}_{:02}", self.year, self.month)
    }
}

impl FromStr for PartitionKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('_').ok_or(())?;
        if year.len() != 4 || month.len() != 2 {
            return Err(());
        }
        let year: i32 = year.parse().map_err(|_| ())?;
        let month: u32 = month.parse().map_err(|_| ())?;
        if !(1..=12).contains(&month) {
            return Err(());
        }
        Ok(Self::new(year, month))
    }
}
