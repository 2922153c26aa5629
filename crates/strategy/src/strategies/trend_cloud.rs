use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use common::{closes, Candle, Error, MarketDataGateway, Result, Signal};

use crate::indicators::{ichimoku_lines, simple_moving_average};
use crate::registry::param_usize;
use crate::{Evaluation, Strategy, StrategyConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendCloudParams {
    pub short_period: usize,
    pub long_period: usize,
    pub conversion_period: usize,
    pub base_period: usize,
    pub span_period: usize,
    pub displacement: usize,
}

impl Default for TrendCloudParams {
    fn default() -> Self {
        Self {
            short_period: 9,
            long_period: 26,
            conversion_period: 9,
            base_period: 26,
            span_period: 52,
            displacement: 26,
        }
    }
}

impl TrendCloudParams {
    pub(crate) fn from_map(params: &HashMap<String, toml::Value>) -> Self {
        let d = Self::default();
        Self {
            short_period: param_usize(params, "short_period", d.short_period),
            long_period: param_usize(params, "long_period", d.long_period),
            conversion_period: param_usize(params, "conversion_period", d.conversion_period),
            base_period: param_usize(params, "base_period", d.base_period),
            span_period: param_usize(params, "span_period", d.span_period),
            displacement: param_usize(params, "displacement", d.displacement),
        }
    }
}

/// Moving averages plus the leading element of each Ichimoku line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendCloudIndicators {
    pub short_ma: f64,
    pub long_ma: f64,
    pub conversion: f64,
    pub base: f64,
    pub span_a: f64,
    pub span_b: f64,
}

impl fmt::Display for TrendCloudIndicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Short MA: {:.4}, Long MA: {:.4}, Conversion Line: {:.4}, Base Line: {:.4}, Span A: {:.4}, Span B: {:.4}",
            self.short_ma, self.long_ma, self.conversion, self.base, self.span_a, self.span_b
        )
    }
}

/// Moving-average cross confirmed by the Ichimoku cloud.
pub struct TrendCloudStrategy {
    cfg: StrategyConfig,
    params: TrendCloudParams,
}

impl TrendCloudStrategy {
    pub fn new(cfg: StrategyConfig, params: TrendCloudParams) -> Self {
        Self { cfg, params }
    }

    pub fn compute(&self, candles: &[Candle]) -> Result<TrendCloudIndicators> {
        let p = &self.params;
        let closes = closes(candles);
        let short_ma = simple_moving_average(&closes, p.short_period)?;
        let long_ma = simple_moving_average(&closes, p.long_period)?;
        let lines = ichimoku_lines(
            candles,
            p.conversion_period,
            p.base_period,
            p.span_period,
            p.displacement,
        )?;

        Ok(TrendCloudIndicators {
            short_ma,
            long_ma,
            conversion: leading(&lines.conversion_line)?,
            base: leading(&lines.base_line)?,
            span_a: leading(&lines.span_a)?,
            span_b: leading(&lines.span_b)?,
        })
    }

    /// Buy when the short MA leads and span A sits above span B; sell on
    /// the mirror image.
    pub fn classify(indicators: &TrendCloudIndicators) -> Signal {
        let TrendCloudIndicators {
            short_ma,
            long_ma,
            span_a,
            span_b,
            ..
        } = *indicators;

        if short_ma > long_ma && span_a > span_b {
            Signal::Buy
        } else if short_ma < long_ma && span_a < span_b {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

fn leading(series: &[f64]) -> Result<f64> {
    series.first().copied().ok_or(Error::InsufficientData {
        required: 1,
        available: 0,
    })
}

#[async_trait]
impl Strategy for TrendCloudStrategy {
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
        let indicators = self.compute(&candles)?;
        Ok(Evaluation {
            signal: Self::classify(&indicators),
            summary: indicators.to_string(),
        })
    }
}
