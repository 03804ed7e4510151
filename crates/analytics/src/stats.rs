// In crates/analytics/src/stats.rs

/// Trading periods per year used to annualize.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate, spread evenly over `PERIODS_PER_YEAR`.
pub const ANNUAL_RISK_FREE_RATE: f64 = 0.05;

/// Annualized Sharpe ratio of a sequence of per-trade profits.
///
/// Each realized profit is treated as one period's return. Uses the sample standard
/// deviation (n - 1). Returns 0 with fewer than two values or zero dispersion.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    let risk_free = ANNUAL_RISK_FREE_RATE / PERIODS_PER_YEAR;
    (mean - risk_free) / std_dev * PERIODS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline of the cumulative profit curve, as a percentage.
///
/// The curve starts at zero. Drawdown is only measured once the running peak is
/// positive, so a curve that never rises above zero reports 0.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for r in returns {
        cumulative += r;
        peak = peak.max(cumulative);
        if peak > 0.0 {
            max_dd = max_dd.max((peak - cumulative) / peak);
        }
    }

    max_dd * 100.0
}
