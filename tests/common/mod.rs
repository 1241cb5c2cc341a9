// Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use grid_bot_analyzer::{
    AnalyzerError, AnalyzerResult, Candle, KlineInterval, MarketDataSource, TickerSnapshot,
};

pub const DAILY_CLOSES: [f64; 14] = [
    50.0, 51.0, 49.0, 52.0, 50.0, 51.0, 53.0, 52.0, 50.0, 49.0, 51.0, 52.0, 54.0, 53.0,
];
pub const WEEKLY_CLOSES: [f64; 4] = [48.0, 52.0, 50.0, 53.0];

/// In-memory market data with call recording
pub struct FakeMarketData {
    pub daily_closes: Vec<f64>,
    pub weekly_closes: Vec<f64>,
    pub ticker: TickerSnapshot,
    pub funding_rate: Option<f64>,
    pub range_candles: Vec<Candle>,
    pub fail_ticker: bool,
    pub calls: AtomicUsize,
    pub last_window: Mutex<Option<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl FakeMarketData {
    /// Market whose 14-day range spans 48 -> 55
    pub fn scenario() -> Self {
        let highs = [51.5, 52.0, 53.0, 55.0, 52.5, 52.0, 54.0, 53.5, 51.0, 50.5, 52.0, 53.0, 54.5, 54.0];
        let lows = [49.0, 48.5, 48.0, 50.0, 49.5, 50.0, 51.0, 50.5, 49.0, 48.2, 49.5, 50.0, 52.0, 51.5];

        Self {
            daily_closes: DAILY_CLOSES.to_vec(),
            weekly_closes: WEEKLY_CLOSES.to_vec(),
            ticker: TickerSnapshot { volume: 1000.0, last_price: 50.0 },
            funding_rate: Some(0.0002),
            range_candles: candles_from(&highs, &lows),
            fail_ticker: false,
            calls: AtomicUsize::new(0),
            last_window: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for FakeMarketData {
    async fn fetch_closes(&self, _symbol: &str, interval: KlineInterval) -> AnalyzerResult<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match interval {
            KlineInterval::OneDay => self.daily_closes.clone(),
            KlineInterval::OneWeek => self.weekly_closes.clone(),
        })
    }

    async fn fetch_ticker(&self, symbol: &str) -> AnalyzerResult<TickerSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ticker {
            return Err(AnalyzerError::DataSource(format!("ticker unavailable for {}", symbol)));
        }
        Ok(self.ticker)
    }

    async fn fetch_funding_rate(&self, _symbol: &str) -> AnalyzerResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.funding_rate
            .ok_or_else(|| AnalyzerError::DataSource("Empty response: funding rate history".to_string()))
    }

    async fn fetch_range_candles(
        &self,
        _symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AnalyzerResult<Vec<Candle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some((start, end));
        Ok(self.range_candles.clone())
    }
}

/// Daily candles starting 2024-01-01 with the given highs and lows
pub fn candles_from(highs: &[f64], lows: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    highs
        .iter()
        .zip(lows)
        .enumerate()
        .map(|(i, (&high, &low))| Candle {
            open_time: start + Duration::days(i as i64),
            open: (high + low) / 2.0,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 100.0,
        })
        .collect()
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

/// Random walk of strictly positive prices
pub fn generate_test_prices(base_price: f64, count: usize, volatility: f64) -> Vec<f64> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let mut prices = Vec::with_capacity(count);
    let mut current_price = base_price;

    for _ in 0..count {
        let change_pct = rng.gen_range(-volatility..volatility);
        current_price *= 1.0 + change_pct;
        prices.push(current_price);
    }

    prices
}
