// Grid Bot Analyzer Library
//
// Estimates grid trading parameters for a futures symbol from recent
// volatility, volume, funding and price range.

pub mod core;
pub mod clients;
pub mod config;
pub mod error;       // Unified error handling
pub mod analyzer;    // End-to-end orchestration
pub mod report;      // Text and JSON rendering
pub mod validation;  // Pre-flight validation
pub mod progress;

// Re-export core analysis types
pub use core::{
    GridPolicy, GridSettings, GridSettingsDeriver, MarketAnalysis, MarketSignals, Recommendation,
    SignalAggregator, VolatilityEstimator,
};

// Re-export error types
pub use error::{AnalyzerError, AnalyzerResult};

// Re-export client types
pub use clients::{BinanceApiError, BinanceFuturesClient, Candle, KlineInterval, MarketDataSource, TickerSnapshot};

// Re-export configuration
pub use config::{AnalysisConfig, ApiConfig, Config, ConfigError, LoggingConfig};

pub use analyzer::GridBotAnalyzer;
pub use report::OutputFormat;
pub use validation::{PreFlightValidator, ValidationCheck, ValidationLevel, ValidationResult};
pub use progress::Spinner;
