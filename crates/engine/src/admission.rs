// In crates/engine/src/admission.rs

use core_types::{PortfolioSnapshot, TradeCandidate};
use risk::RiskPolicy;
use std::cmp::Ordering;

/// The result of building a basket out of individually valid candidates.
#[derive(Debug, Default)]
pub struct Admission {
    /// Indices into the input slice, in admission order.
    pub admitted: Vec<usize>,
    /// Indices that would have pushed the basket over its limits, with the reasons.
    pub held_back: Vec<(usize, Vec<String>)>,
}

/// Greedily admits candidates, highest score first, as long as the growing
/// basket stays within the policy's portfolio-level limits.
///
/// `eligible` lists the indices that already passed per-candidate validation.
/// Ties in score keep their original order.
pub fn admit_basket(
    policy: &dyn RiskPolicy,
    candidates: &[TradeCandidate],
    eligible: &[usize],
    portfolio: &PortfolioSnapshot,
) -> Admission {
    let mut order = eligible.to_vec();
    order.sort_by(|a, b| by_score_desc(&candidates[*a], &candidates[*b]));

    let mut admission = Admission::default();
    let mut basket: Vec<TradeCandidate> = Vec::with_capacity(order.len());
    for idx in order {
        basket.push(candidates[idx].clone());
        let validation = policy.validate_basket(&basket, portfolio);
        if validation.is_valid {
            admission.admitted.push(idx);
        } else {
            basket.pop();
            admission.held_back.push((idx, validation.violations));
        }
    }
    admission
}

fn by_score_desc(a: &TradeCandidate, b: &TradeCandidate) -> Ordering {
    // NaN scores sort last.
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.total_cmp(&a.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk::{LimitPolicy, RiskLimits};

    fn candidate(ticker: &str, max_loss: f64, score: f64) -> TradeCandidate {
        TradeCandidate {
            ticker: ticker.into(),
            max_loss,
            score,
            ..TradeCandidate::default()
        }
    }

    #[test]
    fn highest_scores_fill_the_basket_first() {
        let policy = LimitPolicy::new(RiskLimits {
            max_portfolio_risk_percent: 2.0,
            max_concentration_percent: 100.0,
            ..RiskLimits::default()
        });
        let portfolio = PortfolioSnapshot::with_total_value(10_000.0);
        let candidates = vec![
            candidate("A", -100.0, 1.0),
            candidate("B", -100.0, 9.0),
            candidate("C", -100.0, f64::NAN),
            candidate("D", -100.0, 5.0),
        ];

        let admission = admit_basket(&policy, &candidates, &[0, 1, 2, 3], &portfolio);
        assert_eq!(admission.admitted, vec![1, 3]);
        let held: Vec<usize> = admission.held_back.iter().map(|(i, _)| *i).collect();
        assert_eq!(held, vec![0, 2]);
        assert!(admission.held_back[0].1[0].starts_with("Total portfolio risk"));
    }

    #[test]
    fn smaller_candidate_can_still_fit_after_a_large_one_is_held_back() {
        let policy = LimitPolicy::new(RiskLimits {
            max_portfolio_risk_percent: 2.0,
            max_concentration_percent: 100.0,
            ..RiskLimits::default()
        });
        let portfolio = PortfolioSnapshot::with_total_value(10_000.0);
        let candidates = vec![
            candidate("A", -150.0, 9.0),
            candidate("B", -100.0, 8.0),
            candidate("C", -40.0, 7.0),
        ];

        let admission = admit_basket(&policy, &candidates, &[0, 1, 2], &portfolio);
        assert_eq!(admission.admitted, vec![0, 2]);
        assert_eq!(admission.held_back.len(), 1);
        assert_eq!(admission.held_back[0].0, 1);
    }

    #[test]
    fn ineligible_candidates_are_never_considered() {
        let policy = LimitPolicy::new(RiskLimits::default());
        let candidates = vec![candidate("A", -10.0, 1.0), candidate("B", -10.0, 2.0)];
        let admission = admit_basket(&policy, &candidates, &[0], &PortfolioSnapshot::default());
        assert_eq!(admission.admitted, vec![0]);
        assert!(admission.held_back.is_empty());
    }
}
