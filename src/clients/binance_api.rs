// Binance USD-M Futures REST client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

use crate::clients::{Candle, KlineInterval, MarketDataSource, TickerSnapshot};
use crate::config::ApiConfig;
use crate::error::AnalyzerResult;

pub const DEFAULT_REST_URL: &str = "https://fapi.binance.com";
pub const DEFAULT_KLINE_LIMIT: u32 = 500;

/// Most candles Binance returns for one klines request
pub const MAX_KLINE_LIMIT: u32 = 1500;

const DAY_MILLIS: i64 = 86_400_000;

const API_KEY_HEADER: &str = "x-mbx-apikey";

#[derive(Debug, Clone)]
pub struct BinanceFuturesClient {
    client: reqwest::Client,
    base_url: String,
    kline_limit: u32,
}

impl BinanceFuturesClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_REST_URL.to_string(),
            kline_limit: DEFAULT_KLINE_LIMIT,
        }
    }

    /// Build a client from the `[api]` config section
    pub fn from_config(api: &ApiConfig, kline_limit: u32) -> Result<Self, BinanceApiError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| BinanceApiError::InvalidRequest(format!("API key header: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: api.rest_url.trim_end_matches('/').to_string(),
            kline_limit,
        })
    }

    /// Point the client at another host (test servers, testnet)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Connectivity check against `/fapi/v1/ping`
    pub async fn ping(&self) -> Result<(), BinanceApiError> {
        self.get_json("/fapi/v1/ping", &[]).await.map(|_| ())
    }

    /// Fetch klines for a symbol, optionally bounded by open time.
    ///
    /// A bounded request asks for enough daily candles to cover the whole
    /// window, since Binance fills it forward from `startTime`.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<Candle>, BinanceApiError> {
        let limit = match window {
            Some((start, end)) => window_limit(start, end)?,
            None => self.kline_limit,
        };

        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        if let Some((start, end)) = window {
            params.push(("startTime", start.timestamp_millis().to_string()));
            params.push(("endTime", end.timestamp_millis().to_string()));
        }

        let json = self.get_json("/fapi/v1/klines", &params).await?;
        parse_klines(&json)
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, BinanceApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_body(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| BinanceApiError::ParseError(e.to_string()))
    }
}

impl Default for BinanceFuturesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for BinanceFuturesClient {
    async fn fetch_closes(&self, symbol: &str, interval: KlineInterval) -> AnalyzerResult<Vec<f64>> {
        let candles = self.fetch_klines(symbol, interval, None).await?;
        Ok(candles.into_iter().map(|c| c.close).collect())
    }

    async fn fetch_ticker(&self, symbol: &str) -> AnalyzerResult<TickerSnapshot> {
        let json = self
            .get_json("/fapi/v1/ticker/24hr", &[("symbol", symbol.to_string())])
            .await?;
        Ok(parse_ticker(&json)?)
    }

    async fn fetch_funding_rate(&self, symbol: &str) -> AnalyzerResult<f64> {
        let params = [("symbol", symbol.to_string()), ("limit", "1".to_string())];
        let json = self.get_json("/fapi/v1/fundingRate", &params).await?;
        Ok(parse_latest_funding(&json)?)
    }

    async fn fetch_range_candles(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AnalyzerResult<Vec<Candle>> {
        Ok(self.fetch_klines(symbol, KlineInterval::OneDay, Some((start, end))).await?)
    }
}

/// Daily candles needed to cover `start..=end`, including the partial day at
/// each edge. Windows longer than one request can hold are rejected rather
/// than silently truncated.
pub fn window_limit(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u32, BinanceApiError> {
    let span = (end - start).num_milliseconds();
    if span < 0 {
        return Err(BinanceApiError::InvalidRequest(format!(
            "window ends before it starts ({} > {})",
            start, end
        )));
    }

    let days = (span + DAY_MILLIS - 1) / DAY_MILLIS;
    let candles = days + 1;
    if candles > i64::from(MAX_KLINE_LIMIT) {
        return Err(BinanceApiError::InvalidRequest(format!(
            "{} day window needs {} candles, more than the {} one request returns",
            days, candles, MAX_KLINE_LIMIT
        )));
    }
    Ok(candles as u32)
}

/// Parse `[[openTime, "open", "high", "low", "close", "volume", closeTime, ...], ...]`
pub fn parse_klines(json: &Value) -> Result<Vec<Candle>, BinanceApiError> {
    let rows = json
        .as_array()
        .ok_or_else(|| BinanceApiError::ParseError("Klines response is not an array".to_string()))?;

    let mut candles = Vec::with_capacity(rows.len());

    for row in rows {
        let fields = row
            .as_array()
            .ok_or_else(|| BinanceApiError::ParseError("Invalid kline format".to_string()))?;

        if fields.len() < 6 {
            return Err(BinanceApiError::ParseError(format!(
                "Kline has {} fields, expected at least 6",
                fields.len()
            )));
        }

        let open_time_ms = fields[0]
            .as_i64()
            .ok_or_else(|| BinanceApiError::ParseError("Invalid kline open time".to_string()))?;
        let open_time = DateTime::from_timestamp_millis(open_time_ms)
            .ok_or_else(|| BinanceApiError::ParseError("Kline open time out of range".to_string()))?;

        candles.push(Candle {
            open_time,
            open: number_field(&fields[1], "open")?,
            high: number_field(&fields[2], "high")?,
            low: number_field(&fields[3], "low")?,
            close: number_field(&fields[4], "close")?,
            volume: number_field(&fields[5], "volume")?,
        });
    }

    candles.sort_by_key(|candle| candle.open_time);

    Ok(candles)
}

/// Parse the `volume` and `lastPrice` fields of a 24h ticker
pub fn parse_ticker(json: &Value) -> Result<TickerSnapshot, BinanceApiError> {
    Ok(TickerSnapshot {
        volume: number_field(&json["volume"], "volume")?,
        last_price: number_field(&json["lastPrice"], "lastPrice")?,
    })
}

/// Parse the newest entry of a funding rate history response
pub fn parse_latest_funding(json: &Value) -> Result<f64, BinanceApiError> {
    let entries = json
        .as_array()
        .ok_or_else(|| BinanceApiError::ParseError("Funding response is not an array".to_string()))?;

    // Binance returns ascending by funding time
    let latest = entries
        .last()
        .ok_or_else(|| BinanceApiError::EmptyResponse("funding rate history".to_string()))?;

    number_field(&latest["fundingRate"], "fundingRate")
}

/// Binance encodes decimals as strings; accept bare numbers too
fn number_field(value: &Value, name: &str) -> Result<f64, BinanceApiError> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .ok_or_else(|| BinanceApiError::ParseError(format!("Invalid {} value: {}", name, value)))
}

fn parse_error_body(status: u16, body: &str) -> BinanceApiError {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => match (json["code"].as_i64(), json["msg"].as_str()) {
            (Some(code), Some(msg)) => BinanceApiError::ApiError { status, code, msg: msg.to_string() },
            _ => BinanceApiError::HttpError(status),
        },
        Err(_) => BinanceApiError::HttpError(status),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BinanceApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    HttpError(u16),

    #[error("Binance error {code} (HTTP {status}): {msg}")]
    ApiError { status: u16, code: i64, msg: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for BinanceApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BinanceApiError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            BinanceApiError::HttpError(status.as_u16())
        } else if err.is_decode() {
            BinanceApiError::ParseError(err.to_string())
        } else if err.is_builder() {
            BinanceApiError::InvalidRequest(err.to_string())
        } else {
            BinanceApiError::NetworkError(err.to_string())
        }
    }
}
