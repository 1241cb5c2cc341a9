// Combines raw market signals into a normalized MarketAnalysis

use crate::core::types::{round_to, MarketAnalysis};
use crate::core::volatility::VolatilityEstimator;
use crate::error::{AnalyzerError, AnalyzerResult};

/// Raw quote volume is reported in millions
pub const VOLUME_UNIT: f64 = 1_000_000.0;

const PRICE_DECIMALS: i32 = 2;
const FUNDING_DECIMALS: i32 = 4;

/// Raw inputs for one symbol, as returned by the market data source
#[derive(Debug, Clone, Copy)]
pub struct MarketSignals<'a> {
    pub symbol: &'a str,
    pub daily_prices: &'a [f64],
    pub weekly_prices: &'a [f64],
    pub volume: f64,       // 24h volume in base asset units
    pub last_price: f64,
    pub funding_rate: f64, // fractional, e.g. 0.0001 = 0.01%
    pub recent_highs: &'a [f64],
    pub recent_lows: &'a [f64],
}

#[derive(Debug, Clone, Default)]
pub struct SignalAggregator {
    estimator: VolatilityEstimator,
}

impl SignalAggregator {
    pub fn new(estimator: VolatilityEstimator) -> Self {
        Self { estimator }
    }

    /// Build the analysis record. Fails on the first invalid input; never
    /// substitutes defaults for missing data.
    pub fn aggregate(&self, signals: &MarketSignals<'_>) -> AnalyzerResult<MarketAnalysis> {
        let daily_volatility = self.estimator.estimate(signals.daily_prices)?;
        let weekly_volatility = self.estimator.estimate(signals.weekly_prices)?;

        let volume = require_finite("volume", signals.volume)?;
        let last_price = require_finite("last_price", signals.last_price)?;
        let funding_rate = require_finite("funding_rate", signals.funding_rate)?;

        let range_high = extreme(signals.recent_highs, "recent highs", f64::max)?;
        let range_low = extreme(signals.recent_lows, "recent lows", f64::min)?;

        Ok(MarketAnalysis {
            symbol: signals.symbol.to_string(),
            daily_volatility: round_to(daily_volatility, PRICE_DECIMALS),
            weekly_volatility: round_to(weekly_volatility, PRICE_DECIMALS),
            volume_musd: round_to(volume * last_price / VOLUME_UNIT, PRICE_DECIMALS),
            funding_fee_pct: round_to(funding_rate * 100.0, FUNDING_DECIMALS),
            range_high: round_to(range_high, PRICE_DECIMALS),
            range_low: round_to(range_low, PRICE_DECIMALS),
        })
    }
}

fn require_finite(name: &str, value: f64) -> AnalyzerResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalyzerError::InvalidParameter(
            name.to_string(),
            format!("expected a finite number, got {}", value),
        ))
    }
}

fn extreme(values: &[f64], what: &str, pick: fn(f64, f64) -> f64) -> AnalyzerResult<f64> {
    let (first, rest) = values
        .split_first()
        .ok_or_else(|| AnalyzerError::NoDataForWindow(what.to_string()))?;

    for &value in values {
        require_finite(what, value)?;
    }
    Ok(rest.iter().copied().fold(*first, pick))
}
