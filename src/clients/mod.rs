// Market data sources

pub mod binance_api;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyzerResult;

// Re-export client types
pub use binance_api::{BinanceFuturesClient, BinanceApiError};

/// Kline granularities used by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KlineInterval {
    OneDay,
    OneWeek,
}

impl KlineInterval {
    /// Exchange interval code
    pub fn as_str(&self) -> &'static str {
        match self {
            KlineInterval::OneDay => "1d",
            KlineInterval::OneWeek => "1w",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// 24h rolling ticker statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub volume: f64, // base asset units
    pub last_price: f64,
}

/// Abstract interface for fetching the market data one analysis needs.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Closing prices for the most recent klines, oldest first.
    async fn fetch_closes(&self, symbol: &str, interval: KlineInterval) -> AnalyzerResult<Vec<f64>>;

    async fn fetch_ticker(&self, symbol: &str) -> AnalyzerResult<TickerSnapshot>;

    /// Most recent funding rate as a fraction (0.0001 = 0.01%).
    async fn fetch_funding_rate(&self, symbol: &str) -> AnalyzerResult<f64>;

    /// Daily candles opened between `start` and `end`.
    async fn fetch_range_candles(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AnalyzerResult<Vec<Candle>>;
}
