// Core analysis logic: volatility, signal aggregation and grid derivation

pub mod types;
pub mod volatility;
pub mod aggregator;
pub mod grid_settings;

// Re-export commonly used types
pub use types::{MarketAnalysis, GridSettings, Recommendation};
pub use volatility::VolatilityEstimator;
pub use aggregator::{MarketSignals, SignalAggregator};
pub use grid_settings::{GridPolicy, GridSettingsDeriver};
