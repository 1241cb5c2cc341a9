//! Pre-flight validation for analysis requests
//!
//! Checks the request and the environment before any market data is
//! fetched, so a typo in the symbol fails fast with a readable message.

use tracing::{error, info, warn};

use crate::clients::BinanceFuturesClient;
use crate::config::{Config, MAX_LOOKBACK_DAYS};

/// Quote currencies whose volume reads as USD
pub const USD_QUOTES: [&str; 3] = ["USDT", "USDC", "BUSD"];

/// Validation result with detailed findings
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub passed: bool,
    pub checks: Vec<ValidationCheck>,
}

#[derive(Debug, Clone)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub level: ValidationLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Critical,  // Must pass for the analysis to run
    Warning,   // Should pass, but the analysis can continue
    Info,      // Informational only
}

impl ValidationCheck {
    fn new(name: &str, passed: bool, message: String, level: ValidationLevel) -> Self {
        Self { name: name.to_string(), passed, message, level }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult {
            passed: true,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, check: ValidationCheck) {
        if !check.passed && check.level == ValidationLevel::Critical {
            self.passed = false;
        }
        self.checks.push(check);
    }

    pub fn critical_failures(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Critical)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Warning)
            .collect()
    }

    pub fn display(&self) {
        info!("🔍 Pre-flight Validation");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        for check in &self.checks {
            let icon = if check.passed {
                "✅"
            } else {
                match check.level {
                    ValidationLevel::Critical => "❌",
                    ValidationLevel::Warning => "⚠️",
                    ValidationLevel::Info => "ℹ️",
                }
            };

            info!("{} {} - {}", icon, check.name, check.message);
        }

        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if !self.passed {
            let failures = self.critical_failures();
            error!("❌ Validation failed: {} critical issue(s)", failures.len());
            for failure in failures {
                error!("   • {}: {}", failure.name, failure.message);
            }
        } else {
            let warnings = self.warnings();
            if !warnings.is_empty() {
                warn!("⚠️  {} warning(s) detected", warnings.len());
                for warning in warnings {
                    warn!("   • {}: {}", warning.name, warning.message);
                }
            }
            info!("✅ All critical checks passed");
        }
    }
}

/// Trim and upper-case a user-supplied symbol
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Pre-flight validator for analysis requests
pub struct PreFlightValidator {
    config: Config,
}

impl PreFlightValidator {
    pub fn new(config: Config) -> Self {
        PreFlightValidator { config }
    }

    /// Checks that need no network access
    pub fn validate_request(&self, symbol: &str, lookback_days: u32) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.add_check(self.check_config());
        result.add_check(self.check_credentials());
        result.add_check(check_symbol(symbol));
        if let Some(check) = check_quote_currency(symbol) {
            result.add_check(check);
        }
        result.add_check(check_lookback(lookback_days));

        result
    }

    /// Full suite: request checks plus an exchange connectivity probe
    pub async fn validate_all(&self, symbol: Option<&str>, lookback_days: u32) -> ValidationResult {
        let mut result = match symbol {
            Some(symbol) => self.validate_request(symbol, lookback_days),
            None => {
                let mut result = ValidationResult::new();
                result.add_check(self.check_config());
                result.add_check(self.check_credentials());
                result.add_check(check_lookback(lookback_days));
                result
            }
        };

        result.add_check(self.check_network_connectivity().await);
        result
    }

    // Individual check methods

    fn check_config(&self) -> ValidationCheck {
        match self.config.validate() {
            Ok(()) => ValidationCheck::new(
                "Configuration",
                true,
                "Loaded successfully".to_string(),
                ValidationLevel::Critical,
            ),
            Err(e) => ValidationCheck::new("Configuration", false, e.to_string(), ValidationLevel::Critical),
        }
    }

    fn check_credentials(&self) -> ValidationCheck {
        let has_keys = self.config.has_api_credentials();

        ValidationCheck::new(
            "API Keys",
            has_keys,
            if has_keys {
                "Configured".to_string()
            } else {
                "Not configured (public market data only)".to_string()
            },
            ValidationLevel::Info,
        )
    }

    async fn check_network_connectivity(&self) -> ValidationCheck {
        let client = match BinanceFuturesClient::from_config(&self.config.api, self.config.analysis.kline_limit) {
            Ok(client) => client,
            Err(e) => {
                return ValidationCheck::new("Network", false, e.to_string(), ValidationLevel::Warning);
            }
        };

        match client.ping().await {
            Ok(()) => ValidationCheck::new(
                "Network",
                true,
                format!("{} reachable", client.base_url()),
                ValidationLevel::Warning,
            ),
            Err(e) => ValidationCheck::new(
                "Network",
                false,
                format!("Cannot reach {}: {}", client.base_url(), e),
                ValidationLevel::Warning,
            ),
        }
    }
}

fn check_symbol(symbol: &str) -> ValidationCheck {
    let well_formed = (5..=20).contains(&symbol.len())
        && symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

    if well_formed {
        ValidationCheck::new("Symbol", true, symbol.to_string(), ValidationLevel::Critical)
    } else {
        ValidationCheck::new(
            "Symbol",
            false,
            format!("'{}' is not a futures symbol like AVAXUSDT", symbol),
            ValidationLevel::Critical,
        )
    }
}

fn check_quote_currency(symbol: &str) -> Option<ValidationCheck> {
    if USD_QUOTES.iter().any(|quote| symbol.ends_with(quote)) {
        return None;
    }

    Some(ValidationCheck::new(
        "Quote Currency",
        false,
        "Not a USD-quoted contract; volume will not be in USD".to_string(),
        ValidationLevel::Warning,
    ))
}

fn check_lookback(days: u32) -> ValidationCheck {
    if days == 0 || days > MAX_LOOKBACK_DAYS {
        ValidationCheck::new(
            "Lookback Window",
            false,
            format!("{} days is outside 1..={}", days, MAX_LOOKBACK_DAYS),
            ValidationLevel::Critical,
        )
    } else {
        ValidationCheck::new("Lookback Window", true, format!("{} days", days), ValidationLevel::Info)
    }
}
