use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use common::{Candle, CandleInterval, Error, MarketDataGateway, Result, Ticker};

/// In-memory gateway serving a fixed candle window and ticker.
pub(crate) struct FakeGateway {
    candles: Vec<Candle>,
    ticker: Ticker,
    fail: bool,
    /// `limit` of every candle request, in call order.
    pub requests: Mutex<Vec<Option<usize>>>,
}

impl FakeGateway {
    pub fn new(candles: Vec<Candle>, ticker: Ticker) -> Self {
        Self {
            candles,
            ticker,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new(), ticker(0.0, 0.0))
        }
    }
}

#[async_trait]
impl MarketDataGateway for FakeGateway {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: CandleInterval,
        limit: Option<usize>,
    ) -> Result<Vec<Candle>> {
        self.requests.lock().unwrap().push(limit);
        if self.fail {
            return Err(Error::DataUnavailable("connection refused".into()));
        }
        let n = limit.unwrap_or(self.candles.len()).min(self.candles.len());
        Ok(self.candles[..n].to_vec())
    }

    async fn fetch_ticker(&self, _symbol: &str) -> Result<Ticker> {
        if self.fail {
            return Err(Error::DataUnavailable("connection refused".into()));
        }
        Ok(self.ticker)
    }
}

pub(crate) fn ticker(bid_price: f64, ask_price: f64) -> Ticker {
    Ticker {
        bid_price,
        ask_price,
    }
}

/// Hourly candles with the given closes and volumes.
pub(crate) fn candles(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Candle {
            open_time: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        })
        .collect()
}

pub(crate) fn flat_volume_candles(closes: &[f64]) -> Vec<Candle> {
    candles(closes, &vec![1.0; closes.len()])
}
