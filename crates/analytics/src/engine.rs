use crate::stats::{max_drawdown, sharpe_ratio};
use crate::types::{PerformanceMetrics, StrategyMetrics, TimeframeMetrics};
use chrono::{DateTime, Duration, Utc};
use core_types::RecommendationRecord;
use std::collections::HashMap;

/// Trailing windows reported in `PerformanceMetrics::by_timeframe`.
pub const TIMEFRAMES: &[(&str, i64)] = &[("daily", 1), ("weekly", 7), ("monthly", 30)];

/// The engine responsible for calculating performance metrics from ledger records.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates a full performance report from a slice of records.
    ///
    /// `records` must already be filtered to the query range and ordered by creation;
    /// the profit sequence fed to Sharpe and drawdown follows that order. Rolling
    /// windows trail back from `end`.
    pub fn calculate(&self, records: &[RecommendationRecord], end: DateTime<Utc>) -> PerformanceMetrics {
        let mut report = PerformanceMetrics::new();
        report.total_recommendations = records.len() as u32;

        // --- Trade Counts & Returns ---

        let mut returns = Vec::new();
        let mut strategy_wins: HashMap<&str, u32> = HashMap::new();
        for record in records {
            if !record.executed {
                continue;
            }
            report.executed_trades += 1;

            let Some(profit) = record.realized_profit() else {
                continue;
            };
            if profit > 0.0 {
                report.winning_trades += 1;
            } else if profit < 0.0 {
                report.losing_trades += 1;
            }
            report.total_return += profit;
            returns.push(profit);

            let strategy = report
                .by_strategy
                .entry(record.candidate.strategy.clone())
                .or_default();
            strategy.count += 1;
            strategy.total_return += profit;
            if profit > 0.0 {
                *strategy_wins.entry(record.candidate.strategy.as_str()).or_default() += 1;
            }
        }

        if report.executed_trades > 0 {
            report.win_rate = report.winning_trades as f64 / report.executed_trades as f64 * 100.0;
            report.average_return = report.total_return / report.executed_trades as f64;
        }

        // --- Risk-Adjusted Figures ---

        report.sharpe_ratio = sharpe_ratio(&returns);
        report.max_drawdown = max_drawdown(&returns);

        // --- Per-Strategy Breakdown ---

        for (name, strategy) in report.by_strategy.iter_mut() {
            let wins = strategy_wins.get(name.as_str()).copied().unwrap_or(0);
            finalize_strategy(strategy, wins);
        }

        // --- Rolling Windows ---

        for (period, days) in TIMEFRAMES {
            report
                .by_timeframe
                .insert(period.to_string(), timeframe_metrics(records, period, *days, end));
        }

        report
    }
}

fn finalize_strategy(strategy: &mut StrategyMetrics, wins: u32) {
    if strategy.count == 0 {
        return;
    }
    strategy.win_rate = wins as f64 / strategy.count as f64 * 100.0;
    strategy.avg_return = strategy.total_return / strategy.count as f64;
}

fn timeframe_metrics(
    records: &[RecommendationRecord],
    period: &str,
    days: i64,
    end: DateTime<Utc>,
) -> TimeframeMetrics {
    let start = end - Duration::days(days);
    let mut metrics = TimeframeMetrics {
        period: period.to_string(),
        start_date: start,
        end_date: end,
        trade_count: 0,
        win_rate: 0.0,
        total_return: 0.0,
    };

    let mut wins = 0u32;
    for record in records {
        if record.timestamp <= start || record.timestamp >= end {
            continue;
        }
        let Some(profit) = record.realized_profit() else {
            continue;
        };
        metrics.trade_count += 1;
        metrics.total_return += profit;
        if profit > 0.0 {
            wins += 1;
        }
    }

    if metrics.trade_count > 0 {
        metrics.win_rate = wins as f64 / metrics.trade_count as f64 * 100.0;
    }

    metrics
}
