// In crates/analytics/src/lib.rs

pub mod engine;
pub mod stats;
pub mod types;

pub use engine::AnalyticsEngine;
pub use stats::{max_drawdown, sharpe_ratio};
pub use types::{PerformanceMetrics, StrategyMetrics, TimeframeMetrics};
