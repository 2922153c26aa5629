use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use common::{closes, MarketDataGateway, Result, Signal};

use crate::indicators::{moving_average_convergence_divergence, relative_strength_index};
use crate::registry::{param_f64, param_usize};
use crate::{Evaluation, Strategy, StrategyConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumDivergenceParams {
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub macd_short: usize,
    pub macd_long: usize,
    pub macd_signal: usize,
}

impl Default for MomentumDivergenceParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            oversold: 30.0,
            overbought: 70.0,
            macd_short: 12,
            macd_long: 26,
            macd_signal: 9,
        }
    }
}

impl MomentumDivergenceParams {
    pub(crate) fn from_map(params: &HashMap<String, toml::Value>) -> Self {
        let d = Self::default();
        Self {
            rsi_period: param_usize(params, "rsi_period", d.rsi_period),
            oversold: param_f64(params, "oversold", d.oversold),
            overbought: param_f64(params, "overbought", d.overbought),
            macd_short: param_usize(params, "macd_short", d.macd_short),
            macd_long: param_usize(params, "macd_long", d.macd_long),
            macd_signal: param_usize(params, "macd_signal", d.macd_signal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumIndicators {
    pub rsi: f64,
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

impl fmt::Display for MomentumIndicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RSI: {:.2}, MACD: {:.4}, Signal: {:.4}",
            self.rsi, self.macd_line, self.signal_line
        )
    }
}

/// RSI extremes confirmed by the MACD line crossing its signal line.
pub struct MomentumDivergenceStrategy {
    cfg: StrategyConfig,
    params: MomentumDivergenceParams,
}

impl MomentumDivergenceStrategy {
    pub fn new(cfg: StrategyConfig, params: MomentumDivergenceParams) -> Self {
        Self { cfg, params }
    }

    pub fn compute(&self, closes: &[f64]) -> Result<MomentumIndicators> {
        let p = &self.params;
        let rsi = relative_strength_index(closes, p.rsi_period)?;
        let macd =
            moving_average_convergence_divergence(closes, p.macd_short, p.macd_long, p.macd_signal)?;
        Ok(MomentumIndicators {
            rsi,
            macd_line: macd.macd_line,
            signal_line: macd.signal_line,
            histogram: macd.histogram,
        })
    }

    /// Thresholds come from `params`.
    pub fn classify(indicators: &MomentumIndicators, p: &MomentumDivergenceParams) -> Signal {
        if indicators.rsi < p.oversold && indicators.macd_line > indicators.signal_line {
            Signal::Buy
        } else if indicators.rsi > p.overbought && indicators.macd_line < indicators.signal_line {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

#[async_trait]
impl Strategy for MomentumDivergenceStrategy {
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
        let candles = gateway
            .fetch_candles(&self.cfg.symbol, self.cfg.interval, None)
            .await?;
        let indicators = self.compute(&closes(&candles))?;
        Ok(Evaluation {
            signal: Self::classify(&indicators, &self.params),
            summary: indicators.to_string(),
        })
    }
}
