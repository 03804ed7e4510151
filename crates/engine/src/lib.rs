// In crates/engine/src/lib.rs

pub mod admission;
pub mod types;

use anyhow::{Context, Result};
use chrono::Duration;
use core_types::{PortfolioSnapshot, RecommendationRecord};
use ledger::PerformanceLedger;
use risk::{LimitPolicy, RiskLimits, RiskPolicy, compute_portfolio_metrics};

use crate::admission::admit_basket;
pub use crate::types::{Assessment, ProcessOutcome};

/// Runs raw generator output through normalization, risk validation and
/// basket admission, and records whatever survives in the ledger.
pub struct Engine {
    ledger: PerformanceLedger,
    policy: Box<dyn RiskPolicy>,
}

impl Engine {
    pub fn new(ledger: PerformanceLedger, limits: RiskLimits) -> Self {
        Self::with_policy(ledger, Box::new(LimitPolicy::new(limits)))
    }

    pub fn with_policy(ledger: PerformanceLedger, policy: Box<dyn RiskPolicy>) -> Self {
        tracing::info!(policy = policy.name(), "Initializing recommendation engine.");
        Self { ledger, policy }
    }

    pub fn ledger(&self) -> &PerformanceLedger {
        &self.ledger
    }

    /// The main entry point for one batch of generator output.
    ///
    /// 1. Normalize the raw text into candidates.
    /// 2. Stop early if today's realized losses already breach the daily limit.
    /// 3. Validate every candidate on its own.
    /// 4. Admit valid candidates into a basket, best score first.
    /// 5. Persist each admitted candidate as a pending recommendation.
    pub async fn process(&self, raw: &str, portfolio: &PortfolioSnapshot) -> Result<ProcessOutcome> {
        let candidates = candidates::normalize(raw).context("Failed to normalize model output")?;
        tracing::info!(count = candidates.len(), "Normalized trade candidates.");

        // --- Daily Loss Gate ---

        let since = self.ledger.now() - Duration::days(1);
        let realized_today = self
            .ledger
            .realized_since(since)
            .await
            .context("Failed to read today's realized results")?;
        let daily_loss_violation = self.policy.check_daily_loss(realized_today, portfolio);

        // --- Per-Candidate Validation ---

        let mut assessments: Vec<Assessment> = candidates
            .iter()
            .map(|c| Assessment::new(c.clone(), self.policy.validate_candidate(c, portfolio)))
            .collect();

        if let Some(reason) = &daily_loss_violation {
            tracing::warn!(%reason, "Daily loss limit breached. No candidates will be accepted.");
            return Ok(ProcessOutcome {
                basket: self.policy.validate_basket(&[], portfolio),
                assessments,
                daily_loss_violation,
                portfolio_metrics: compute_portfolio_metrics(&portfolio.positions),
            });
        }

        // --- Basket Admission ---

        let eligible: Vec<usize> = assessments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.validation.is_valid)
            .map(|(i, _)| i)
            .collect();
        let admission = admit_basket(self.policy.as_ref(), &candidates, &eligible, portfolio);

        for (idx, violations) in admission.held_back {
            tracing::warn!(
                ticker = %candidates[idx].ticker,
                ?violations,
                "Candidate held back by basket limits."
            );
            assessments[idx].basket_violations = violations;
        }

        let basket: Vec<_> = admission.admitted.iter().map(|&i| candidates[i].clone()).collect();
        let basket_validation = self.policy.validate_basket(&basket, portfolio);

        // --- Persistence ---

        for idx in admission.admitted {
            let record = self
                .ledger
                .record_recommendation(candidates[idx].clone())
                .await
                .with_context(|| format!("Failed to record candidate for {}", candidates[idx].ticker))?;
            tracing::info!(
                id = %record.id,
                ticker = %record.candidate.ticker,
                risk_score = assessments[idx].validation.risk_score,
                "Candidate accepted."
            );
            assessments[idx].accepted = true;
            assessments[idx].record_id = Some(record.id);
        }

        Ok(ProcessOutcome {
            assessments,
            basket: basket_validation,
            daily_loss_violation: None,
            portfolio_metrics: compute_portfolio_metrics(&portfolio.positions),
        })
    }

    /// Marks a recommendation as executed (or confirms it is still pending).
    /// An unknown id is logged and reported as `None`.
    pub async fn mark_executed(&self, id: &str, executed: bool) -> Result<Option<RecommendationRecord>> {
        recoverable(self.ledger.update_execution(id, executed).await)
            .with_context(|| format!("Failed to update execution of {id}"))
    }

    /// Records the realized profit of an executed recommendation.
    /// An unknown id is logged and reported as `None`.
    pub async fn record_result(&self, id: &str, profit: f64) -> Result<Option<RecommendationRecord>> {
        recoverable(self.ledger.update_trade_result(id, profit).await)
            .with_context(|| format!("Failed to record trade result of {id}"))
    }
}

fn recoverable(result: ledger::Result<RecommendationRecord>) -> ledger::Result<Option<RecommendationRecord>> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(error = %e, "Ignoring update for unknown recommendation.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
