// Volatility estimation from closing prices

use ndarray::{s, ArrayView1};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Estimates volatility as the population standard deviation of single-step
/// log returns, scaled by the square root of the number of prices and
/// expressed as a percentage.
///
/// The estimator is horizon-agnostic: feed it daily closes for a daily
/// figure and weekly closes for a weekly one.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityEstimator;

impl VolatilityEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate volatility (percent) for a chronological price series
    pub fn estimate(&self, prices: &[f64]) -> AnalyzerResult<f64> {
        if prices.len() < 2 {
            return Err(AnalyzerError::InsufficientData(prices.len()));
        }

        if let Some(&bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(AnalyzerError::InvalidPrice(bad));
        }

        let prices = ArrayView1::from(prices);
        let log_returns = (&prices.slice(s![1..]) / &prices.slice(s![..-1])).mapv(f64::ln);

        // Scaled by the price count, not the return count
        let scale = (prices.len() as f64).sqrt();
        Ok(log_returns.std(0.0) * scale * 100.0)
    }
}
