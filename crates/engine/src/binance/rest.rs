use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

use common::{
    BinanceCredentials, Candle, CandleInterval, Error, MarketDataGateway, Result, Ticker,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST API client for Binance spot market data.
///
/// Candles and tickers come from public endpoints. Credentials, when
/// configured, are only used by `verify_credentials`.
pub struct BinanceClient {
    base_url: String,
    credentials: Option<BinanceCredentials>,
    http: Client,
}

impl BinanceClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<BinanceCredentials>,
    ) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            http,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Connectivity check against `/api/v3/ping`.
    pub async fn ping(&self) -> Result<()> {
        self.public_get("/api/v3/ping", &[]).await.map(|_| ())
    }

    /// Signed `/api/v3/account` request. Succeeds only if the exchange
    /// accepts the configured key and signature.
    pub async fn verify_credentials(&self) -> Result<()> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Config("no Binance credentials configured".into()))?;

        let query = format!("recvWindow=5000&timestamp={}", Utc::now().timestamp_millis());
        let signature = sign(&creds.secret, &query)?;
        let url = format!("{}/api/v3/account?{query}&signature={signature}", self.base_url);

        let resp = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", &creds.api_key)
            .send()
            .await
            .map_err(unavailable)?;
        read_body(resp).await.map(|_| ())
    }

    async fn public_get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(unavailable)?;
        read_body(resp).await
    }
}

#[async_trait]
impl MarketDataGateway for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: Option<usize>,
    ) -> Result<Vec<Candle>> {
        let mut query = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        debug!(symbol = %symbol, interval = %interval, limit = ?limit, "Fetching klines");
        let body = self.public_get("/api/v3/klines", &query).await?;
        parse_klines(&body)
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        let body = self
            .public_get("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await?;
        parse_ticker(&body)
    }
}

fn unavailable(e: reqwest::Error) -> Error {
    Error::DataUnavailable(e.to_string())
}

async fn read_body(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await.map_err(unavailable)?;
    if !status.is_success() {
        return Err(Error::DataUnavailable(format!("HTTP {status}: {body}")));
    }
    Ok(body)
}

/// HMAC-SHA256 of `query`, hex encoded, as Binance expects in `signature`.
fn sign(secret: &str, query: &str) -> Result<String> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Config(format!("invalid Binance secret: {e}")))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

// ─── Response parsing ─────────────────────────────────────────────────────────

/// Klines arrive as arrays: `[openTime, open, high, low, close, volume, ...]`
/// with prices and volume as decimal strings.
fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| Error::DataUnavailable(format!("malformed klines response: {e}")))?;
    rows.iter().map(|row| parse_kline_row(row)).collect()
}

fn parse_kline_row(row: &[Value]) -> Result<Candle> {
    let malformed = || Error::DataUnavailable(format!("malformed kline row: {row:?}"));

    let open_time_ms = row.first().and_then(Value::as_i64).ok_or_else(malformed)?;
    let open_time = Utc
        .timestamp_millis_opt(open_time_ms)
        .single()
        .ok_or_else(malformed)?;
    let decimal = |i: usize| -> Result<f64> {
        row.get(i)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(malformed)
    };

    Ok(Candle {
        open_time,
        open: decimal(1)?,
        high: decimal(2)?,
        low: decimal(3)?,
        close: decimal(4)?,
        volume: decimal(5)?,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyStats {
    bid_price: String,
    ask_price: String,
}

fn parse_ticker(body: &str) -> Result<Ticker> {
    let stats: DailyStats = serde_json::from_str(body)
        .map_err(|e| Error::DataUnavailable(format!("malformed ticker response: {e}")))?;
    let price = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| Error::DataUnavailable(format!("bad price '{s}': {e}")))
    };
    Ok(Ticker {
        bid_price: price(&stats.bid_price)?,
        ask_price: price(&stats.ask_price)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const KLINES: &str = r#"[
        [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815",
         1499644799999, "2434.19055334", 308, "1756.87402397", "28.46694368", "0"],
        [1499043600000, "0.01577100", "0.01600000", "0.01570000", "0.01590000", "1000.5",
         1499647199999, "15.9", 12, "500.0", "7.9", "0"]
    ]"#;

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status: &str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    #[test]
    fn parses_kline_rows_in_order() {
        let candles = parse_klines(KLINES).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time.timestamp_millis(), 1_499_040_000_000);
        assert_eq!(candles[0].close, 0.015771);
        assert_eq!(candles[0].volume, 148_976.114_278_15);
        assert_eq!(candles[1].high, 0.016);
        assert!(candles[0].open_time < candles[1].open_time);
    }

    #[test]
    fn malformed_kline_row_is_data_unavailable() {
        let err = parse_klines(r#"[[1499040000000, "abc", "1", "1", "1", "1"]]"#).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));

        let err = parse_klines(r#"[[1499040000000, "1", "1"]]"#).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }

    #[test]
    fn parses_ticker_bid_and_ask() {
        let body = r#"{"symbol":"BTCUSDT","bidPrice":"30900.10","askPrice":"31000.00","lastPrice":"30950.00"}"#;
        let ticker = parse_ticker(body).unwrap();
        assert_eq!(ticker.bid_price, 30_900.10);
        assert_eq!(ticker.ask_price, 31_000.0);
    }

    #[test]
    fn signature_matches_binance_reference_vector() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign(secret, query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[tokio::test]
    async fn fetch_candles_decodes_http_response() {
        let base = serve_once("200 OK", KLINES).await;
        let client = BinanceClient::new(base, None).unwrap();
        let candles = client
            .fetch_candles("LTCBTC", CandleInterval::OneHour, Some(2))
            .await
            .unwrap();
        assert_eq!(candles.len(), 2);
    }

    #[tokio::test]
    async fn error_status_is_data_unavailable() {
        let base = serve_once("400 Bad Request", r#"{"code":-1121,"msg":"Invalid symbol."}"#).await;
        let client = BinanceClient::new(base, None).unwrap();
        let err = client.fetch_ticker("NOPE").await.unwrap_err();
        assert!(
            matches!(err, Error::DataUnavailable(ref m) if m.contains("Invalid symbol")),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn connection_failure_is_data_unavailable() {
        let client = BinanceClient::new("http://127.0.0.1:1", None).unwrap();
        assert!(matches!(
            client.fetch_candles("BTCUSDT", CandleInterval::OneHour, None).await,
            Err(Error::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn verify_without_credentials_is_config_error() {
        let client = BinanceClient::new("http://127.0.0.1:1", None).unwrap();
        assert!(!client.has_credentials());
        assert!(matches!(
            client.verify_credentials().await,
            Err(Error::Config(_))
        ));
    }
}
