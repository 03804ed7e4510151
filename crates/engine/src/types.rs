// In crates/engine/src/types.rs

use core_types::TradeCandidate;
use risk::{PortfolioRiskMetrics, TradeValidation};
use serde::Serialize;

/// The verdict on one normalized candidate.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub candidate: TradeCandidate,
    /// The per-candidate validation result.
    pub validation: TradeValidation,
    /// Reasons the candidate was held back from the basket, if it passed on its own.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub basket_violations: Vec<String>,
    pub accepted: bool,
    /// Ledger id assigned when the candidate was accepted and persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl Assessment {
    pub(crate) fn new(candidate: TradeCandidate, validation: TradeValidation) -> Self {
        Self {
            candidate,
            validation,
            basket_violations: Vec::new(),
            accepted: false,
            record_id: None,
        }
    }
}

/// Everything a single processing pass decided.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    /// One entry per normalized candidate, in the order the generator produced them.
    pub assessments: Vec<Assessment>,
    /// Validation of the accepted candidates taken together.
    pub basket: TradeValidation,
    /// Set when today's realized losses already breach the daily limit.
    /// No candidate is accepted in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_loss_violation: Option<String>,
    /// Risk measurements of the positions the pass was evaluated against.
    pub portfolio_metrics: PortfolioRiskMetrics,
}

impl ProcessOutcome {
    pub fn accepted(&self) -> impl Iterator<Item = &Assessment> {
        self.assessments.iter().filter(|a| a.accepted)
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted().count()
    }
}
