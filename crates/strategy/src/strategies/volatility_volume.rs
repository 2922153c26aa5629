use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use common::{closes, Candle, MarketDataGateway, Result, Signal, Ticker};

use crate::indicators::{bollinger_bands, volume_profile_peak};
use crate::registry::{param_f64, param_usize};
use crate::{Evaluation, Strategy, StrategyConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityVolumeParams {
    pub bollinger_period: usize,
    /// Band width in standard deviations.
    pub deviations: f64,
}

impl Default for VolatilityVolumeParams {
    fn default() -> Self {
        Self {
            bollinger_period: 20,
            deviations: 2.0,
        }
    }
}

impl VolatilityVolumeParams {
    pub(crate) fn from_map(params: &HashMap<String, toml::Value>) -> Self {
        let d = Self::default();
        Self {
            bollinger_period: param_usize(params, "period", d.bollinger_period),
            deviations: param_f64(params, "deviations", d.deviations),
        }
    }
}

/// Indicator values for one volatility/volume cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandVolumeIndicators {
    pub upper_band: f64,
    pub lower_band: f64,
    pub peak_volume: f64,
    pub price_at_peak_volume: f64,
}

impl fmt::Display for BandVolumeIndicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Upper: {:.4}, Lower: {:.4}, Peak volume: {:.4} @ {:.4}",
            self.upper_band, self.lower_band, self.peak_volume, self.price_at_peak_volume
        )
    }
}

/// Bollinger breakout confirmed against the volume-profile peak.
pub struct VolatilityVolumeStrategy {
    cfg: StrategyConfig,
    params: VolatilityVolumeParams,
}

impl VolatilityVolumeStrategy {
    pub fn new(cfg: StrategyConfig, params: VolatilityVolumeParams) -> Self {
        Self { cfg, params }
    }

    /// Bands over `band_closes`, volume peak over the wider `window`.
    pub fn compute(&self, band_closes: &[f64], window: &[Candle]) -> Result<BandVolumeIndicators> {
        let bands = bollinger_bands(band_closes, self.params.bollinger_period, self.params.deviations)?;
        let peak = volume_profile_peak(window)?;
        Ok(BandVolumeIndicators {
            upper_band: bands.upper,
            lower_band: bands.lower,
            peak_volume: peak.peak_volume,
            price_at_peak_volume: peak.price_at_peak_volume,
        })
    }

    /// Buy when the ask clears both the upper band and the peak-volume price;
    /// sell when the bid drops under the lower band.
    pub fn classify(indicators: &BandVolumeIndicators, ticker: &Ticker) -> Signal {
        if ticker.ask_price > indicators.upper_band
            && ticker.ask_price > indicators.price_at_peak_volume
        {
            Signal::Buy
        } else if ticker.bid_price < indicators.lower_band {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

#[async_trait]
impl Strategy for VolatilityVolumeStrategy {
    fn name(&self) -> &str {
        &self.cfg.name
    }

    fn symbol(&self) -> &str {
        &self.cfg.symbol
    }

    fn every(&self) -> Duration {
        self.cfg.every()
    }

    async fn evaluate(&self, gateway: &dyn MarketDataGateway) -> Result<Evaluation> {
        let symbol = &self.cfg.symbol;
        let band_candles = gateway
            .fetch_candles(symbol, self.cfg.interval, Some(self.params.bollinger_period + 1))
            .await?;
        let window = gateway.fetch_candles(symbol, self.cfg.interval, None).await?;
        let ticker = gateway.fetch_ticker(symbol).await?;
        debug!(
            symbol = %symbol,
            band_candles = band_candles.len(),
            window = window.len(),
            "Fetched volatility/volume data"
        );

        let indicators = self.compute(&closes(&band_candles), &window)?;
        Ok(Evaluation {
            signal: Self::classify(&indicators, &ticker),
            summary: format!(
                "{indicators}, Bid: {:.4}, Ask: {:.4}",
                ticker.bid_price, ticker.ask_price
            ),
        })
    }
}
