// In crates/risk/src/lib.rs

use core_types::{PortfolioSnapshot, TradeCandidate};

pub mod error;
pub mod limit_policy;
pub mod portfolio;
pub mod scoring;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use limit_policy::LimitPolicy;
pub use portfolio::compute_portfolio_metrics;
pub use types::{PortfolioRiskMetrics, RiskLimits, TradeValidation};

/// Portfolio value assumed when the snapshot carries none (or a non-positive one).
pub const DEFAULT_PORTFOLIO_VALUE: f64 = 100_000.0;

/// Minimum acceptable reward-to-risk ratio (1:3).
pub const MIN_REWARD_TO_RISK: f64 = 0.33;

/// The universal interface for a risk policy.
///
/// A `RiskPolicy` judges trade candidates against quantitative limits before they
/// are allowed to surface to a human. Implementations hold only an immutable
/// configuration snapshot, so one instance can serve concurrent callers.
/// Violations are returned as data, never as errors.
pub trait RiskPolicy: Send + Sync {
    /// The name of the risk policy.
    fn name(&self) -> &'static str;

    /// Validates a single candidate against per-position limits and scores it.
    fn validate_candidate(
        &self,
        candidate: &TradeCandidate,
        portfolio: &PortfolioSnapshot,
    ) -> TradeValidation;

    /// Validates a set of candidates together against portfolio-level limits.
    ///
    /// This is independent of per-candidate validity, which callers check separately.
    fn validate_basket(
        &self,
        candidates: &[TradeCandidate],
        portfolio: &PortfolioSnapshot,
    ) -> TradeValidation;

    /// Returns a violation reason when today's realized loss already exceeds the daily limit.
    fn check_daily_loss(&self, realized_today: f64, portfolio: &PortfolioSnapshot) -> Option<String>;
}

/// Resolves the portfolio value a validation pass is measured against.
pub fn resolve_portfolio_value(portfolio: &PortfolioSnapshot) -> f64 {
    match portfolio.total_value {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => DEFAULT_PORTFOLIO_VALUE,
    }
}
