// In crates/risk/src/portfolio.rs

use core_types::Position;
use std::collections::BTreeMap;

use crate::types::PortfolioRiskMetrics;

/// Simplified value-at-risk: a flat share of total market value.
pub const VAR_FRACTION: f64 = 0.02;

/// Inflation applied to summed max losses to account for correlated moves.
pub const DRAWDOWN_CORRELATION_MULTIPLIER: f64 = 1.5;

/// Tickers treated as one highly correlated block for correlation risk.
pub const CORRELATED_TECH_SYMBOLS: &[&str] = &["AAPL", "MSFT", "NVDA", "AMD", "META", "GOOGL"];

/// Derives portfolio-wide risk measurements from a positions snapshot.
///
/// Absent fields contribute zero; a position without a symbol still counts
/// toward the Greeks and drawdown estimate but not toward concentration.
pub fn compute_portfolio_metrics(positions: &[Position]) -> PortfolioRiskMetrics {
    let mut metrics = PortfolioRiskMetrics::default();
    let mut symbol_values: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_value = 0.0;
    let mut total_max_loss = 0.0;

    for position in positions {
        if let (Some(symbol), Some(value)) = (&position.symbol, position.market_value) {
            total_value += value;
            *symbol_values.entry(symbol.clone()).or_default() += value;
        }

        metrics.total_delta += position.delta.unwrap_or(0.0);
        metrics.total_gamma += position.gamma.unwrap_or(0.0);
        metrics.total_vega += position.vega.unwrap_or(0.0);
        metrics.total_theta += position.theta.unwrap_or(0.0);
        total_max_loss += position.max_loss.map_or(0.0, f64::abs);
    }

    if total_value > 0.0 {
        metrics.concentrations = symbol_values
            .iter()
            .map(|(symbol, value)| (symbol.clone(), value * 100.0 / total_value))
            .collect();
    }

    metrics.value_at_risk = total_value * VAR_FRACTION;
    metrics.max_drawdown = total_max_loss * DRAWDOWN_CORRELATION_MULTIPLIER;
    metrics.correlation_risk = correlation_risk(&symbol_values, total_value);

    metrics
}

fn correlation_risk(symbol_values: &BTreeMap<String, f64>, total_value: f64) -> f64 {
    if total_value <= 0.0 {
        return 0.0;
    }
    let tech_value: f64 = symbol_values
        .iter()
        .filter(|(symbol, _)| CORRELATED_TECH_SYMBOLS.contains(&symbol.as_str()))
        .map(|(_, value)| *value)
        .sum();
    (tech_value * 100.0 / total_value).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(symbol: &str, value: f64) -> Position {
        Position {
            symbol: Some(symbol.to_string()),
            market_value: Some(value),
            ..Position::default()
        }
    }

    #[test]
    fn empty_positions_yield_zeroed_metrics() {
        let metrics = compute_portfolio_metrics(&[]);
        assert_eq!(metrics, PortfolioRiskMetrics::default());
    }

    #[test]
    fn greeks_sum_and_absent_fields_are_zero() {
        let positions = vec![
            Position { delta: Some(0.3), theta: Some(-2.0), ..position("SPY", 1_000.0) },
            Position { delta: Some(-0.1), vega: Some(4.5), gamma: Some(0.02), ..position("QQQ", 1_000.0) },
            Position::default(),
        ];
        let metrics = compute_portfolio_metrics(&positions);
        assert!((metrics.total_delta - 0.2).abs() < 1e-12);
        assert_eq!(metrics.total_gamma, 0.02);
        assert_eq!(metrics.total_vega, 4.5);
        assert_eq!(metrics.total_theta, -2.0);
    }

    #[test]
    fn concentration_var_drawdown_and_correlation() {
        let positions = vec![
            Position { max_loss: Some(-200.0), ..position("AAPL", 3_000.0) },
            Position { max_loss: Some(100.0), ..position("NVDA", 1_000.0) },
            position("SPY", 4_000.0),
            position("AAPL", 2_000.0),
        ];
        let metrics = compute_portfolio_metrics(&positions);
        assert_eq!(metrics.concentrations["AAPL"], 50.0);
        assert_eq!(metrics.concentrations["NVDA"], 10.0);
        assert_eq!(metrics.concentrations["SPY"], 40.0);
        assert_eq!(metrics.value_at_risk, 200.0);
        assert_eq!(metrics.max_drawdown, 450.0);
        assert_eq!(metrics.correlation_risk, 60.0);
    }
}
