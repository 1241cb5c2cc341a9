// Grid bot settings derived from a market analysis

use serde::{Deserialize, Serialize};

use crate::core::types::{GridSettings, MarketAnalysis};
use crate::error::{AnalyzerError, AnalyzerResult};

// Fixed sizing rules. These are not risk-adjusted per symbol.
pub const DEFAULT_LEVERAGE: u32 = 20;
pub const DEFAULT_STOP_LOSS_PCT: u32 = 20;
pub const DEFAULT_TAKE_PROFIT_PCT: u32 = 75;
pub const MIN_GRID_SPACING: f64 = 0.005; // 0.5% of the lower bound
pub const MAX_GRID_COUNT: u32 = 50;
pub const MIN_GRID_COUNT: u32 = 1;
pub const CURRENCY_PREFIX: &str = "$";

/// Policy knobs for grid derivation. `Default` yields the fixed rules above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPolicy {
    pub leverage: u32,
    pub stop_loss_pct: u32,
    pub take_profit_pct: u32,
    pub min_grid_spacing: f64,
    pub max_grid_count: u32,
    pub commission_discount: bool,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            leverage: DEFAULT_LEVERAGE,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            take_profit_pct: DEFAULT_TAKE_PROFIT_PCT,
            min_grid_spacing: MIN_GRID_SPACING,
            max_grid_count: MAX_GRID_COUNT,
            commission_discount: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GridSettingsDeriver {
    policy: GridPolicy,
}

impl GridSettingsDeriver {
    pub fn new(policy: GridPolicy) -> Self {
        Self { policy }
    }

    /// Derive grid settings. Grid spacing is floored at `min_grid_spacing`
    /// of the lower bound and the count is capped at `max_grid_count`.
    pub fn derive(&self, analysis: &MarketAnalysis) -> AnalyzerResult<GridSettings> {
        let (low, high) = (analysis.range_low, analysis.range_high);
        if !(low.is_finite() && high.is_finite()) || low <= 0.0 || high < low {
            return Err(AnalyzerError::InvalidRange(low, high));
        }

        Ok(GridSettings {
            leverage: self.policy.leverage,
            price_range_label: price_range_label(low, high),
            grid_count: self.grid_count(low, high),
            stop_loss_pct: self.policy.stop_loss_pct,
            take_profit_pct: self.policy.take_profit_pct,
            commission_discount_enabled: self.policy.commission_discount,
        })
    }

    fn grid_count(&self, low: f64, high: f64) -> u32 {
        let raw = ((high - low) / (low * self.policy.min_grid_spacing)).floor();
        // `as` saturates, so absurd ranges still land on the cap
        (raw as u32).clamp(MIN_GRID_COUNT, self.policy.max_grid_count.max(MIN_GRID_COUNT))
    }
}

/// Display label for the grid bounds, e.g. "$48.0 - $55.5". Whole prices
/// keep their trailing ".0".
pub fn price_range_label(low: f64, high: f64) -> String {
    format!("{prefix}{low:?} - {prefix}{high:?}", prefix = CURRENCY_PREFIX)
}
