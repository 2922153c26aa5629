use async_trait::async_trait;

use crate::{Candle, CandleInterval, Delivery, Result, Ticker};

/// Read-only view of an exchange's market data.
///
/// `BinanceClient` implements this against the public REST API. Any
/// transport, status or decode failure surfaces as `Error::DataUnavailable`;
/// callers do not retry.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Candles for `symbol`, ascending by open time. With `limit == None`
    /// the exchange's default window applies.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: Option<usize>,
    ) -> Result<Vec<Candle>>;

    /// Current best bid/ask for `symbol`.
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker>;
}

/// Outbound text channel for signals.
///
/// Delivery is best-effort: implementations log their own failures and
/// report them only through the returned `Delivery`.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, text: &str) -> Delivery;
}
