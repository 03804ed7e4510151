// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single structured trade proposal produced by the candidate normalizer.
///
/// Every field defaults when absent: upstream generator output is not
/// contractually complete, and the policy engine treats missing numbers as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TradeCandidate {
    #[serde(default)]
    pub ticker: String,
    /// Free-text strategy category, e.g. "iron condor".
    #[serde(default)]
    pub strategy: String,
    /// Human-readable description of the option legs.
    #[serde(default)]
    pub legs: String,
    #[serde(default)]
    pub thesis: String,
    /// Probability of profit in `[0, 1]`.
    #[serde(default, alias = "pop")]
    pub probability_of_profit: f64,
    /// Worst-case loss. May be expressed as a negative number or as an absolute value.
    #[serde(default)]
    pub max_loss: f64,
    #[serde(default)]
    pub max_profit: f64,
    /// Model-assigned ranking score. Opaque to the policy engine.
    #[serde(default)]
    pub score: f64,
}

impl TradeCandidate {
    /// The absolute capital at risk for this candidate.
    pub fn risk_amount(&self) -> f64 {
        self.max_loss.abs()
    }
}

/// A single open position as reported by the portfolio snapshot.
/// Any field may be absent; absent numeric fields contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub max_loss: Option<f64>,
}

/// The portfolio context a validation pass is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl PortfolioSnapshot {
    pub fn with_total_value(total_value: f64) -> Self {
        Self {
            total_value: Some(total_value),
            positions: Vec::new(),
        }
    }
}

/// Lifecycle state of a persisted recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Executed,
    Closed,
    Expired,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Executed => "executed",
            RecordStatus::Closed => "closed",
            RecordStatus::Expired => "expired",
        }
    }

    /// Closed and expired records accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordStatus::Closed | RecordStatus::Expired)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted unit of the performance ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "recommendation")]
    pub candidate: TradeCandidate,
    pub executed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_profit: Option<f64>,
    pub status: RecordStatus,
}

impl RecommendationRecord {
    /// Creates a fresh, pending record for an accepted candidate.
    pub fn pending(id: String, timestamp: DateTime<Utc>, candidate: TradeCandidate) -> Self {
        Self {
            id,
            timestamp,
            candidate,
            executed: false,
            execution_time: None,
            exit_time: None,
            actual_profit: None,
            status: RecordStatus::Pending,
        }
    }

    /// The realized profit of an executed trade that has been closed out.
    pub fn realized_profit(&self) -> Option<f64> {
        if self.executed { self.actual_profit } else { None }
    }
}
