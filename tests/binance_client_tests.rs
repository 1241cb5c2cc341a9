// Binance futures client tests against a local mock server

use chrono::{Duration, TimeZone, Utc};
use mockito::{Matcher, Server};

use grid_bot_analyzer::{
    AnalyzerError, ApiConfig, BinanceFuturesClient, GridBotAnalyzer, KlineInterval, MarketDataSource,
};

const KLINES_BODY: &str = r#"[
    [1704067200000, "50.0", "51.5", "49.0", "50.5", "1200.0", 1704153599999, "0", 10, "0", "0", "0"],
    [1704153600000, "50.5", "55.0", "48.0", "52.0", "1500.0", 1704239999999, "0", 12, "0", "0", "0"],
    [1704240000000, "52.0", "53.0", "50.0", "51.0", "900.0", 1704326399999, "0", 8, "0", "0", "0"]
]"#;

fn client_for(server: &Server) -> BinanceFuturesClient {
    let api = ApiConfig {
        rest_url: server.url(),
        ..ApiConfig::default()
    };
    BinanceFuturesClient::from_config(&api, 500).expect("client should build")
}

#[tokio::test]
async fn test_fetch_closes_requests_interval() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/fapi/v1/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "AVAXUSDT".into()),
            Matcher::UrlEncoded("interval".into(), "1w".into()),
            Matcher::UrlEncoded("limit".into(), "500".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(KLINES_BODY)
        .create_async()
        .await;

    let closes = client_for(&server)
        .fetch_closes("AVAXUSDT", KlineInterval::OneWeek)
        .await
        .unwrap();

    assert_eq!(closes, vec![50.5, 52.0, 51.0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_range_candles_sends_window() {
    let mut server = Server::new_async().await;
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

    let mock = server
        .mock("GET", "/fapi/v1/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("interval".into(), "1d".into()),
            Matcher::UrlEncoded("limit".into(), "15".into()),
            Matcher::UrlEncoded("startTime".into(), start.timestamp_millis().to_string()),
            Matcher::UrlEncoded("endTime".into(), end.timestamp_millis().to_string()),
        ]))
        .with_status(200)
        .with_body(KLINES_BODY)
        .create_async()
        .await;

    let candles = client_for(&server)
        .fetch_range_candles("AVAXUSDT", start, end)
        .await
        .unwrap();

    assert_eq!(candles.len(), 3);
    assert_eq!(candles.iter().map(|c| c.high).fold(f64::MIN, f64::max), 55.0);
    assert_eq!(candles.iter().map(|c| c.low).fold(f64::MAX, f64::min), 48.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_long_window_asks_for_every_day() {
    let mut server = Server::new_async().await;
    let end = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let start = end - Duration::days(600);

    // Larger than the configured kline_limit of 500
    let mock = server
        .mock("GET", "/fapi/v1/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "601".into()),
            Matcher::UrlEncoded("startTime".into(), start.timestamp_millis().to_string()),
        ]))
        .with_status(200)
        .with_body(KLINES_BODY)
        .create_async()
        .await;

    client_for(&server)
        .fetch_range_candles("AVAXUSDT", start, end)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_window_beyond_one_request_is_rejected() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/fapi/v1/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(KLINES_BODY)
        .expect(0)
        .create_async()
        .await;

    let end = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let err = client_for(&server)
        .fetch_range_candles("AVAXUSDT", end - Duration::days(2000), end)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::DataSource(ref msg) if msg.contains("2000 day window")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_ticker_and_funding() {
    let mut server = Server::new_async().await;
    let _ticker = server
        .mock("GET", "/fapi/v1/ticker/24hr")
        .match_query(Matcher::UrlEncoded("symbol".into(), "AVAXUSDT".into()))
        .with_status(200)
        .with_body(r#"{"symbol":"AVAXUSDT","volume":"1000","lastPrice":"50.000","quoteVolume":"50000"}"#)
        .create_async()
        .await;
    let _funding = server
        .mock("GET", "/fapi/v1/fundingRate")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .with_status(200)
        .with_body(r#"[{"symbol":"AVAXUSDT","fundingTime":1704067200000,"fundingRate":"0.00020000","markPrice":"50.0"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let ticker = client.fetch_ticker("AVAXUSDT").await.unwrap();
    assert_eq!(ticker.volume, 1000.0);
    assert_eq!(ticker.last_price, 50.0);

    assert_eq!(client.fetch_funding_rate("AVAXUSDT").await.unwrap(), 0.0002);
}

#[tokio::test]
async fn test_empty_funding_history_is_an_error() {
    let mut server = Server::new_async().await;
    let _funding = server
        .mock("GET", "/fapi/v1/fundingRate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let err = client_for(&server).fetch_funding_rate("AVAXUSDT").await.unwrap_err();
    assert!(matches!(err, AnalyzerError::DataSource(ref msg) if msg.contains("funding")));
}

#[tokio::test]
async fn test_exchange_error_surfaces() {
    let mut server = Server::new_async().await;
    let _ticker = server
        .mock("GET", "/fapi/v1/ticker/24hr")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_ticker("NOPEUSDT").await.unwrap_err();
    match err {
        AnalyzerError::DataSource(msg) => {
            assert!(msg.contains("-1121"));
            assert!(msg.contains("Invalid symbol."));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_ping() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/fapi/v1/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    client_for(&server).ping().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_full_analysis_over_http() {
    let mut server = Server::new_async().await;
    let _klines = server
        .mock("GET", "/fapi/v1/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(KLINES_BODY)
        .create_async()
        .await;
    let _ticker = server
        .mock("GET", "/fapi/v1/ticker/24hr")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"volume":"1000","lastPrice":"50"}"#)
        .create_async()
        .await;
    let _funding = server
        .mock("GET", "/fapi/v1/fundingRate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"fundingRate":"0.0002"}]"#)
        .create_async()
        .await;

    let recommendation = GridBotAnalyzer::new(client_for(&server))
        .recommend("AVAXUSDT")
        .await
        .unwrap();

    assert_eq!(recommendation.analysis.volume_musd, 0.05);
    assert_eq!(recommendation.analysis.funding_fee_pct, 0.02);
    assert_eq!(recommendation.analysis.range_high, 55.0);
    assert_eq!(recommendation.analysis.range_low, 48.0);
    assert_eq!(recommendation.settings.grid_count, 29);
}
