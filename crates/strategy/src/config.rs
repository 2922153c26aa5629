use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use common::{CandleInterval, Error, Result};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// type = "momentum_divergence"
/// name = "Rsi & macd"
/// symbol = "BTCUSDT"
/// interval = "1h"
/// every_secs = 300
///
/// [strategy.params]
/// rsi_period = 14
/// oversold = 30.0
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy")]
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Bollinger bands plus volume-profile peak.
    VolatilityVolume,
    /// Moving-average cross plus Ichimoku cloud.
    TrendCloud,
    /// RSI plus MACD.
    MomentumDivergence,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    /// Human-readable name shown in logs and notifications.
    pub name: String,
    /// Trading pair, e.g. "BTCUSDT".
    pub symbol: String,
    /// Candle interval requested from the exchange.
    pub interval: CandleInterval,
    /// Evaluation cadence in seconds.
    pub every_secs: u64,
    /// Indicator-specific parameters. Missing keys take the strategy defaults.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

impl StrategyConfig {
    pub fn new(
        kind: StrategyKind,
        name: impl Into<String>,
        symbol: impl Into<String>,
        interval: CandleInterval,
        every_secs: u64,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            symbol: symbol.into(),
            interval,
            every_secs,
            params: HashMap::new(),
        }
    }

    pub fn every(&self) -> Duration {
        Duration::from_secs(self.every_secs)
    }
}

impl StrategyFileConfig {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("failed to parse strategy config at '{path}': {e}")))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

impl Default for StrategyFileConfig {
    /// BTCUSDT on hourly candles: the volatility strategy every minute, the
    /// other two every five minutes.
    fn default() -> Self {
        Self {
            strategies: vec![
                StrategyConfig::new(
                    StrategyKind::VolatilityVolume,
                    "Bollinger & volume",
                    "BTCUSDT",
                    CandleInterval::OneHour,
                    60,
                ),
                StrategyConfig::new(
                    StrategyKind::TrendCloud,
                    "Ma & ichi",
                    "BTCUSDT",
                    CandleInterval::OneHour,
                    300,
                ),
                StrategyConfig::new(
                    StrategyKind::MomentumDivergence,
                    "Rsi & macd",
                    "BTCUSDT",
                    CandleInterval::OneHour,
                    300,
                ),
            ],
        }
    }
}
