//! Error handling for the grid bot analyzer
//!
//! A single error type covers the numeric core (volatility, aggregation,
//! grid derivation), the market data collaborator and the CLI plumbing
//! around them.

use std::fmt;
use std::io;

use crate::clients::BinanceApiError;
use crate::config::ConfigError;

/// Main error type for the grid bot analyzer
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    // Core analysis errors
    InsufficientData(usize),          // number of prices supplied
    InvalidPrice(f64),
    NoDataForWindow(String),          // which series came back empty
    InvalidRange(f64, f64),           // (range_low, range_high)
    InvalidParameter(String, String), // (parameter_name, reason)

    // Market data errors
    DataSource(String),

    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Validation errors
    ValidationFailed(String),

    // IO errors
    FileRead(String),
    FileWrite(String),

    Internal(String),
}

impl AnalyzerError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            AnalyzerError::InsufficientData(len) => {
                format!(
                    "Not enough candles to estimate volatility (got {}, need at least 2)\n\n\
                    💡 The symbol may be newly listed. Try again later or pick another symbol.",
                    len
                )
            }
            AnalyzerError::NoDataForWindow(what) => {
                format!(
                    "No candles returned for the lookback window ({})\n\n\
                    💡 Check:\n\
                    - The symbol is a listed perpetual contract\n\
                    - The --days value covers a period the symbol traded in",
                    what
                )
            }
            AnalyzerError::DataSource(msg) => {
                format!(
                    "Market data request failed: {}\n\n\
                    💡 Try:\n\
                    1. Run: grid-analyzer check\n\
                    2. Verify rest_url in config.toml\n\
                    3. Confirm the symbol exists (e.g. AVAXUSDT)",
                    msg
                )
            }
            AnalyzerError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: grid-analyzer init\n\
                    2. Optionally add your API key to config.toml\n\
                    3. Try again",
                    path
                )
            }
            AnalyzerError::ConfigValidation(msg) => {
                format!(
                    "Configuration validation error: {}\n\n\
                    💡 Check config.toml for:\n\
                    - A lookback_days value greater than 0\n\
                    - A positive request_timeout_secs\n\
                    - A known log level (trace, debug, info, warn, error)",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AnalyzerError::InsufficientData(_)
            | AnalyzerError::InvalidPrice(_)
            | AnalyzerError::NoDataForWindow(_)
            | AnalyzerError::InvalidRange(_, _)
            | AnalyzerError::InvalidParameter(_, _) => "analysis",

            AnalyzerError::DataSource(_) => "data_source",

            AnalyzerError::ConfigNotFound(_)
            | AnalyzerError::ConfigParse(_)
            | AnalyzerError::ConfigValidation(_) => "config",

            AnalyzerError::ValidationFailed(_) => "validation",

            AnalyzerError::FileRead(_) | AnalyzerError::FileWrite(_) => "io",

            AnalyzerError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::InsufficientData(len) => {
                write!(f, "Insufficient data: {} price(s), at least 2 required", len)
            }
            AnalyzerError::InvalidPrice(price) => {
                write!(f, "Invalid price: {} (prices must be positive)", price)
            }
            AnalyzerError::NoDataForWindow(what) => {
                write!(f, "No data for lookback window: {}", what)
            }
            AnalyzerError::InvalidRange(low, high) => {
                write!(f, "Invalid price range: low {} / high {}", low, high)
            }
            AnalyzerError::InvalidParameter(param, reason) => {
                write!(f, "Invalid parameter '{}': {}", param, reason)
            }

            AnalyzerError::DataSource(msg) => {
                write!(f, "Data source error: {}", msg)
            }

            AnalyzerError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            AnalyzerError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            AnalyzerError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            AnalyzerError::ValidationFailed(msg) => {
                write!(f, "Validation failed: {}", msg)
            }

            AnalyzerError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            AnalyzerError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            AnalyzerError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnalyzerError {}

// Conversion implementations for common error types

impl From<io::Error> for AnalyzerError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                AnalyzerError::FileRead(err.to_string())
            }
            _ => AnalyzerError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::Internal(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for AnalyzerError {
    fn from(err: toml::de::Error) -> Self {
        AnalyzerError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::DataSource(BinanceApiError::from(err).to_string())
    }
}

impl From<BinanceApiError> for AnalyzerError {
    fn from(err: BinanceApiError) -> Self {
        AnalyzerError::DataSource(err.to_string())
    }
}

impl From<ConfigError> for AnalyzerError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::FileNotFound(path) => AnalyzerError::ConfigNotFound(path),
            ConfigError::FileRead(msg) => AnalyzerError::FileRead(msg),
            ConfigError::FileWrite(msg) => AnalyzerError::FileWrite(msg),
            ConfigError::Parse(msg) => AnalyzerError::ConfigParse(msg),
            ConfigError::Serialize(msg) => AnalyzerError::Internal(msg),
            ConfigError::Validation(msg) => AnalyzerError::ConfigValidation(msg),
        }
    }
}

/// Result type alias using AnalyzerError
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
