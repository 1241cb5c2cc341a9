// Records passed between the analysis stages and the presenter

use serde::{Deserialize, Serialize};

/// Normalized market statistics for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub symbol: String,
    pub daily_volatility: f64,   // percent
    pub weekly_volatility: f64,  // percent
    pub volume_musd: f64,        // millions of quote currency
    pub funding_fee_pct: f64,    // percent
    pub range_high: f64,
    pub range_low: f64,
}

/// Recommended grid bot configuration derived from a `MarketAnalysis`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    pub leverage: u32,
    pub price_range_label: String,
    pub grid_count: u32,
    pub stop_loss_pct: u32,
    pub take_profit_pct: u32,
    pub commission_discount_enabled: bool,
}

/// Output of one end-to-end analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub analysis: MarketAnalysis,
    pub settings: GridSettings,
}

/// Round to a fixed number of decimal places. Exact ties go to the even
/// digit, so tick-aligned prices like 48.125 land on 48.12.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
