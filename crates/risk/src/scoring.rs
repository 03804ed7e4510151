// In crates/risk/src/scoring.rs

use core_types::TradeCandidate;

use crate::types::RiskLimits;

/// Base risk weight for strategies missing from the table.
pub const DEFAULT_STRATEGY_WEIGHT: f64 = 15.0;

const STRATEGY_WEIGHTS: &[(&str, f64)] = &[
    ("covered call", 5.0),
    ("cash secured put", 7.0),
    ("credit spread", 10.0),
    ("iron condor", 12.0),
    ("butterfly", 15.0),
    ("naked option", 20.0),
];

/// Lowercases, maps `-`/`_` to spaces and collapses whitespace.
fn normalize_strategy(strategy: &str) -> String {
    strategy
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Base risk contribution (0-20) of a strategy category.
pub fn strategy_weight(strategy: &str) -> f64 {
    let key = normalize_strategy(strategy);
    STRATEGY_WEIGHTS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(DEFAULT_STRATEGY_WEIGHT, |(_, weight)| *weight)
}

/// `max_profit / |max_loss|`.
///
/// A zero max loss gives an unbounded ratio when there is profit to be had,
/// and zero otherwise.
pub fn reward_to_risk(candidate: &TradeCandidate) -> f64 {
    let risk = candidate.risk_amount();
    if risk == 0.0 {
        return if candidate.max_profit > 0.0 { f64::INFINITY } else { 0.0 };
    }
    candidate.max_profit / risk
}

/// Weighted 0-100 risk score; lower is safer.
///
/// Components: probability (0-30), position size against the configured limit (0-30),
/// inverse reward-to-risk (0-20) and the strategy's base weight (0-20).
/// Non-finite intermediate values count as maximum risk for their component.
pub fn risk_score(candidate: &TradeCandidate, position_risk_percent: f64, limits: &RiskLimits) -> f64 {
    let pop = if candidate.probability_of_profit.is_nan() {
        0.0
    } else {
        candidate.probability_of_profit.clamp(0.0, 1.0)
    };
    let pop_score = (1.0 - pop) * 30.0;

    let size_score = if limits.max_position_size_percent > 0.0 && !position_risk_percent.is_nan() {
        ((position_risk_percent / limits.max_position_size_percent) * 30.0).clamp(0.0, 30.0)
    } else {
        30.0
    };

    let rr = reward_to_risk(candidate);
    let rr_score = if rr.is_nan() {
        20.0
    } else {
        (20.0 / (rr.max(0.0) + 1.0)).clamp(0.0, 20.0)
    };

    let strategy_score = strategy_weight(&candidate.strategy);

    (pop_score + size_score + rr_score + strategy_score).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(pop: f64, max_loss: f64, max_profit: f64, strategy: &str) -> TradeCandidate {
        TradeCandidate {
            ticker: "SPY".into(),
            strategy: strategy.into(),
            probability_of_profit: pop,
            max_loss,
            max_profit,
            ..TradeCandidate::default()
        }
    }

    #[test]
    fn strategy_lookup_is_forgiving_about_spelling() {
        assert_eq!(strategy_weight("Cash-Secured Put"), 7.0);
        assert_eq!(strategy_weight("  iron   condor "), 12.0);
        assert_eq!(strategy_weight("covered_call"), 5.0);
        assert_eq!(strategy_weight("jade lizard"), DEFAULT_STRATEGY_WEIGHT);
    }

    #[test]
    fn zero_loss_ratio_is_defined() {
        assert!(reward_to_risk(&candidate(0.7, 0.0, 100.0, "")).is_infinite());
        assert_eq!(reward_to_risk(&candidate(0.7, 0.0, 0.0, "")), 0.0);
        assert_eq!(reward_to_risk(&candidate(0.7, -300.0, 100.0, "")), 100.0 / 300.0);
    }

    #[test]
    fn score_components_add_up() {
        let limits = RiskLimits::default();
        // pop 0.8 -> 6, size 0.25/0.5 -> 15, rr 1.0 -> 10, covered call -> 5
        let score = risk_score(&candidate(0.8, -250.0, 250.0, "covered call"), 0.25, &limits);
        assert!((score - 36.0).abs() < 1e-9);
    }

    #[test]
    fn score_stays_in_range_for_extreme_inputs() {
        let limits = RiskLimits::default();
        let extremes = [
            (candidate(-3.0, -1e12, -5.0, "naked option"), 1e9),
            (candidate(4.0, 0.0, 0.0, ""), 0.0),
            (candidate(0.5, -1.0, -0.999_999, ""), 0.001),
            (candidate(0.0, f64::MAX, f64::MAX, "naked option"), f64::MAX),
            (candidate(1.0, 1e-300, 1e300, "covered call"), 0.0),
        ];
        for (c, pct) in extremes {
            let score = risk_score(&c, pct, &limits);
            assert!((0.0..=100.0).contains(&score), "score {score} out of range for {c:?}");
        }

        let zero_limit = RiskLimits { max_position_size_percent: 0.0, ..RiskLimits::default() };
        let score = risk_score(&candidate(0.0, -1.0, 0.0, "naked option"), 50.0, &zero_limit);
        assert_eq!(score, 100.0);
    }
}
