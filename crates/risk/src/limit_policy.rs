// In crates/risk/src/limit_policy.rs

use core_types::{PortfolioSnapshot, TradeCandidate};
use std::collections::BTreeMap;

use crate::scoring::{reward_to_risk, risk_score};
use crate::types::{RiskLimits, TradeValidation};
use crate::{MIN_REWARD_TO_RISK, RiskPolicy, resolve_portfolio_value};

/// A risk policy that enforces fixed percentage limits.
///
/// This policy implements three per-candidate rules:
/// 1. Capital at risk must stay within the per-position limit.
/// 2. Probability of profit must meet the configured minimum.
/// 3. Reward-to-risk must be at least 1:3.
///
/// and two basket rules: total capital at risk and per-ticker concentration.
/// Every rule is evaluated; violations accumulate rather than short-circuit.
#[derive(Debug, Clone)]
pub struct LimitPolicy {
    /// The configuration for this policy instance.
    limits: RiskLimits,
}

impl LimitPolicy {
    /// Creates a new `LimitPolicy` from a limits snapshot.
    pub fn new(limits: RiskLimits) -> Self {
        Self { limits }
    }
}

impl RiskPolicy for LimitPolicy {
    fn name(&self) -> &'static str {
        "LimitPolicy"
    }

    fn validate_candidate(
        &self,
        candidate: &TradeCandidate,
        portfolio: &PortfolioSnapshot,
    ) -> TradeValidation {
        let mut validation = TradeValidation::new(self.limits.require_manual_approval);
        let portfolio_value = resolve_portfolio_value(portfolio);

        // Rule: capital at risk per position.
        let position_risk_percent = candidate.risk_amount() * 100.0 / portfolio_value;
        if position_risk_percent > self.limits.max_position_size_percent {
            validation.reject(format!(
                "Position risk {:.2}% exceeds limit {:.2}%",
                position_risk_percent, self.limits.max_position_size_percent
            ));
        }

        // Rule: probability of profit.
        if candidate.probability_of_profit.is_nan()
            || candidate.probability_of_profit < self.limits.min_probability_of_profit
        {
            validation.reject(format!(
                "POP {:.2}% below minimum {:.2}%",
                candidate.probability_of_profit * 100.0,
                self.limits.min_probability_of_profit * 100.0
            ));
        }

        // Rule: reward-to-risk.
        let ratio = reward_to_risk(candidate);
        if ratio.is_nan() || ratio < MIN_REWARD_TO_RISK {
            validation.reject(format!(
                "Risk/reward ratio {:.2} below minimum {:.2}",
                ratio, MIN_REWARD_TO_RISK
            ));
        }

        validation.risk_score = risk_score(candidate, position_risk_percent, &self.limits);

        if !validation.is_valid {
            tracing::warn!(
                ticker = %candidate.ticker,
                violations = ?validation.violations,
                "Candidate failed risk validation."
            );
        }

        validation
    }

    fn validate_basket(
        &self,
        candidates: &[TradeCandidate],
        portfolio: &PortfolioSnapshot,
    ) -> TradeValidation {
        let mut validation = TradeValidation::new(self.limits.require_manual_approval);
        let portfolio_value = resolve_portfolio_value(portfolio);

        let mut total_risk = 0.0;
        // Sorted so violations come out in a stable order.
        let mut ticker_risk: BTreeMap<&str, f64> = BTreeMap::new();
        for candidate in candidates {
            let risk = candidate.risk_amount();
            total_risk += risk;
            *ticker_risk.entry(candidate.ticker.as_str()).or_default() += risk;
        }

        // Rule: total capital at risk.
        let total_risk_percent = total_risk * 100.0 / portfolio_value;
        if total_risk_percent > self.limits.max_portfolio_risk_percent {
            validation.reject(format!(
                "Total portfolio risk {:.2}% exceeds limit {:.2}%",
                total_risk_percent, self.limits.max_portfolio_risk_percent
            ));
        }

        // Rule: single-ticker concentration.
        for (ticker, risk) in &ticker_risk {
            let concentration_percent = risk * 100.0 / portfolio_value;
            if concentration_percent > self.limits.max_concentration_percent {
                validation.reject(format!(
                    "Concentration in {} ({:.2}%) exceeds limit {:.2}%",
                    ticker, concentration_percent, self.limits.max_concentration_percent
                ));
            }
        }

        validation.risk_score = if self.limits.max_portfolio_risk_percent > 0.0 {
            (total_risk_percent / self.limits.max_portfolio_risk_percent * 100.0).clamp(0.0, 100.0)
        } else if total_risk > 0.0 {
            100.0
        } else {
            0.0
        };
        if validation.risk_score.is_nan() {
            validation.risk_score = 100.0;
        }

        validation
    }

    fn check_daily_loss(&self, realized_today: f64, portfolio: &PortfolioSnapshot) -> Option<String> {
        if realized_today >= 0.0 || realized_today.is_nan() {
            return None;
        }
        let loss_percent = realized_today.abs() * 100.0 / resolve_portfolio_value(portfolio);
        (loss_percent > self.limits.max_daily_loss_percent).then(|| {
            format!(
                "Daily realized loss {:.2}% exceeds limit {:.2}%",
                loss_percent, self.limits.max_daily_loss_percent
            )
        })
    }
}
