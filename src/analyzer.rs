//! End-to-end analysis of one symbol
//!
//! Fetches the market data one analysis needs from an injected
//! `MarketDataSource`, runs it through the aggregator and the grid deriver,
//! and hands back a `Recommendation`. Any failure aborts the request.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clients::{KlineInterval, MarketDataSource};
use crate::core::{
    GridSettingsDeriver, MarketAnalysis, MarketSignals, Recommendation, SignalAggregator,
};
use crate::error::AnalyzerResult;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 14;

pub struct GridBotAnalyzer<S: MarketDataSource> {
    source: S,
    aggregator: SignalAggregator,
    deriver: GridSettingsDeriver,
    lookback_days: u32,
}

impl<S: MarketDataSource> GridBotAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            aggregator: SignalAggregator::default(),
            deriver: GridSettingsDeriver::default(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_deriver(mut self, deriver: GridSettingsDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Analyze a symbol with the lookback window ending now
    pub async fn analyze_symbol(&self, symbol: &str) -> AnalyzerResult<MarketAnalysis> {
        self.analyze_symbol_at(symbol, Utc::now()).await
    }

    /// Analyze a symbol with the lookback window ending at `end`
    pub async fn analyze_symbol_at(
        &self,
        symbol: &str,
        end: DateTime<Utc>,
    ) -> AnalyzerResult<MarketAnalysis> {
        let start = end - Duration::days(i64::from(self.lookback_days));
        debug!("Fetching market data for {} (range {} -> {})", symbol, start, end);

        // The fetches are independent; the first failure wins
        let (daily_closes, weekly_closes, ticker, funding_rate, range_candles) = tokio::try_join!(
            self.source.fetch_closes(symbol, KlineInterval::OneDay),
            self.source.fetch_closes(symbol, KlineInterval::OneWeek),
            self.source.fetch_ticker(symbol),
            self.source.fetch_funding_rate(symbol),
            self.source.fetch_range_candles(symbol, start, end),
        )?;

        debug!(
            "{}: {} daily closes, {} weekly closes, {} range candles",
            symbol,
            daily_closes.len(),
            weekly_closes.len(),
            range_candles.len()
        );

        let highs: Vec<f64> = range_candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = range_candles.iter().map(|c| c.low).collect();

        self.aggregator.aggregate(&MarketSignals {
            symbol,
            daily_prices: &daily_closes,
            weekly_prices: &weekly_closes,
            volume: ticker.volume,
            last_price: ticker.last_price,
            funding_rate,
            recent_highs: &highs,
            recent_lows: &lows,
        })
    }

    /// Full analysis plus derived grid settings
    pub async fn recommend(&self, symbol: &str) -> AnalyzerResult<Recommendation> {
        let analysis = self.analyze_symbol(symbol).await?;
        self.recommend_from(analysis)
    }

    pub fn recommend_from(&self, analysis: MarketAnalysis) -> AnalyzerResult<Recommendation> {
        let settings = self.deriver.derive(&analysis)?;
        debug!("{}: derived {} grids over {}", analysis.symbol, settings.grid_count, settings.price_range_label);
        Ok(Recommendation { analysis, settings })
    }
}
