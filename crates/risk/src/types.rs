// In crates/risk/src/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

/// Quantitative limits enforced by the risk policy.
///
/// This is a read-only snapshot during a validation pass; whoever owns policy
/// configuration builds a fresh one when the limits change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLimits {
    /// Max % of portfolio value at risk across a basket.
    pub max_portfolio_risk_percent: f64,
    /// Max % of portfolio value at risk in one position.
    pub max_position_size_percent: f64,
    /// Max realized loss per day, as % of portfolio value.
    pub max_daily_loss_percent: f64,
    /// Minimum probability of profit, in `[0, 1]`.
    pub min_probability_of_profit: f64,
    /// Max % of portfolio value at risk in a single ticker.
    pub max_concentration_percent: f64,
    /// When set, no candidate may be treated as auto-approved.
    pub require_manual_approval: bool,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_portfolio_risk_percent: 2.0,
            max_position_size_percent: 0.5,
            max_daily_loss_percent: 1.0,
            min_probability_of_profit: 0.65,
            max_concentration_percent: 10.0,
            require_manual_approval: true,
        }
    }
}

impl RiskLimits {
    /// Rejects limit sets that cannot be evaluated meaningfully.
    pub fn validate(&self) -> Result<()> {
        let percents = [
            ("max_portfolio_risk_percent", self.max_portfolio_risk_percent),
            ("max_position_size_percent", self.max_position_size_percent),
            ("max_daily_loss_percent", self.max_daily_loss_percent),
            ("max_concentration_percent", self.max_concentration_percent),
        ];
        for (name, value) in percents {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameters(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.min_probability_of_profit) {
            return Err(Error::InvalidParameters(format!(
                "min_probability_of_profit must be within [0, 1], got {}",
                self.min_probability_of_profit
            )));
        }
        Ok(())
    }
}

/// The outcome of one validation pass. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeValidation {
    pub is_valid: bool,
    /// Every triggered reason, in evaluation order.
    pub violations: Vec<String>,
    /// 0-100, lower is safer. Advisory ranking input only.
    pub risk_score: f64,
    pub requires_approval: bool,
}

impl TradeValidation {
    pub fn new(requires_approval: bool) -> Self {
        Self {
            is_valid: true,
            violations: Vec::new(),
            risk_score: 0.0,
            requires_approval,
        }
    }

    /// Records a violation and marks the validation as failed.
    pub fn reject(&mut self, reason: String) {
        self.is_valid = false;
        self.violations.push(reason);
    }
}

/// Risk measurements derived fresh from a positions snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioRiskMetrics {
    pub total_delta: f64,
    pub total_gamma: f64,
    pub total_vega: f64,
    pub total_theta: f64,
    pub value_at_risk: f64,
    pub max_drawdown: f64,
    /// Symbol -> percent of total market value.
    pub concentrations: BTreeMap<String, f64>,
    /// 0-100.
    pub correlation_risk: f64,
}
