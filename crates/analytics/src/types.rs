// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics for one strategy category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StrategyMetrics {
    /// Closed trades attributed to this strategy.
    pub count: u32,
    pub win_rate: f64,
    pub avg_return: f64,
    pub total_return: f64,
}

/// Statistics for a trailing window ending at the query's end instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeMetrics {
    pub period: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub trade_count: u32,
    pub win_rate: f64,
    #[serde(rename = "return")]
    pub total_return: f64,
}

/// A report of recommendation performance over a date range.
///
/// Always recomputed from ledger records; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceMetrics {
    pub total_recommendations: u32,
    pub executed_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub average_return: f64,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub by_strategy: BTreeMap<String, StrategyMetrics>,
    pub by_timeframe: BTreeMap<String, TimeframeMetrics>,
}

impl PerformanceMetrics {
    /// Creates a new, empty report with zeroed values.
    pub fn new() -> Self {
        Self::default()
    }
}
