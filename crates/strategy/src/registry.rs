use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use common::{Error, Result};

use crate::config::{StrategyConfig, StrategyFileConfig, StrategyKind};
use crate::strategies::{
    MomentumDivergenceParams, MomentumDivergenceStrategy, TrendCloudParams, TrendCloudStrategy,
    VolatilityVolumeParams, VolatilityVolumeStrategy,
};
use crate::Strategy;

/// Holds all configured strategy instances.
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Build the registry from config. Fails on the first invalid entry.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self> {
        let mut strategies = Vec::with_capacity(file_cfg.strategies.len());

        for cfg in &file_cfg.strategies {
            let strategy = build_strategy(cfg)?;
            info!(
                name = %strategy.name(),
                symbol = %strategy.symbol(),
                interval = %cfg.interval,
                every = ?strategy.every(),
                "Registered strategy"
            );
            strategies.push(strategy);
        }

        Ok(Self { strategies })
    }

    pub fn strategies(&self) -> &[Arc<dyn Strategy>] {
        &self.strategies
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl IntoIterator for StrategyRegistry {
    type Item = Arc<dyn Strategy>;
    type IntoIter = std::vec::IntoIter<Arc<dyn Strategy>>;

    fn into_iter(self) -> Self::IntoIter {
        self.strategies.into_iter()
    }
}

// ─── Strategy builders ────────────────────────────────────────────────────────

fn build_strategy(cfg: &StrategyConfig) -> Result<Arc<dyn Strategy>> {
    if cfg.every_secs == 0 {
        return Err(Error::Config(format!(
            "strategy '{}': every_secs must be greater than zero",
            cfg.name
        )));
    }

    let strategy: Arc<dyn Strategy> = match cfg.kind {
        StrategyKind::VolatilityVolume => {
            let p = VolatilityVolumeParams::from_map(&cfg.params);
            check_periods(cfg, &[("period", p.bollinger_period)])?;
            Arc::new(VolatilityVolumeStrategy::new(cfg.clone(), p))
        }
        StrategyKind::TrendCloud => {
            let p = TrendCloudParams::from_map(&cfg.params);
            check_periods(
                cfg,
                &[
                    ("short_period", p.short_period),
                    ("long_period", p.long_period),
                    ("conversion_period", p.conversion_period),
                    ("base_period", p.base_period),
                    ("span_period", p.span_period),
                ],
            )?;
            Arc::new(TrendCloudStrategy::new(cfg.clone(), p))
        }
        StrategyKind::MomentumDivergence => {
            let p = MomentumDivergenceParams::from_map(&cfg.params);
            check_periods(
                cfg,
                &[
                    ("rsi_period", p.rsi_period),
                    ("macd_short", p.macd_short),
                    ("macd_long", p.macd_long),
                    ("macd_signal", p.macd_signal),
                ],
            )?;
            Arc::new(MomentumDivergenceStrategy::new(cfg.clone(), p))
        }
    };
    Ok(strategy)
}

/// Indicator windows must be non-empty.
fn check_periods(cfg: &StrategyConfig, periods: &[(&str, usize)]) -> Result<()> {
    match periods.iter().find(|(_, period)| *period == 0) {
        Some((key, _)) => Err(Error::Config(format!(
            "strategy '{}': {key} must be greater than zero",
            cfg.name
        ))),
        None => Ok(()),
    }
}

/// Float parameter; integer TOML values are accepted too.
pub(crate) fn param_f64(params: &HashMap<String, toml::Value>, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
        .unwrap_or(default)
}

pub(crate) fn param_usize(params: &HashMap<String, toml::Value>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|v| v.as_integer())
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::CandleInterval;

    #[test]
    fn default_file_builds_three_strategies() {
        let registry = StrategyRegistry::from_config(&StrategyFileConfig::default()).unwrap();
        let names: Vec<_> = registry.strategies().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, ["Bollinger & volume", "Ma & ichi", "Rsi & macd"]);
        assert_eq!(registry.strategies()[0].every().as_secs(), 60);
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let file = StrategyFileConfig {
            strategies: vec![StrategyConfig::new(
                StrategyKind::TrendCloud,
                "bad",
                "BTCUSDT",
                CandleInterval::OneHour,
                0,
            )],
        };
        assert!(matches!(
            StrategyRegistry::from_config(&file),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn zero_indicator_period_is_rejected() {
        let mut cfg = StrategyConfig::new(
            StrategyKind::MomentumDivergence,
            "Rsi & macd",
            "BTCUSDT",
            CandleInterval::OneHour,
            300,
        );
        cfg.params.insert("macd_signal".to_string(), toml::Value::Integer(0));
        let file = StrategyFileConfig { strategies: vec![cfg] };

        match StrategyRegistry::from_config(&file) {
            Err(Error::Config(msg)) => assert!(msg.contains("macd_signal"), "{msg}"),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("zero period accepted"),
        }
    }

    #[test]
    fn zero_period_in_parsed_file_is_rejected() {
        let file = StrategyFileConfig::from_toml(
            r#"
            [[strategy]]
            type = "volatility_volume"
            name = "Bollinger & volume"
            symbol = "BTCUSDT"
            interval = "1h"
            every_secs = 60

            [strategy.params]
            period = 0
            "#,
        )
        .unwrap();
        assert!(matches!(
            StrategyRegistry::from_config(&file),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let mut params = HashMap::new();
        params.insert("period".to_string(), toml::Value::Integer(10));
        params.insert("deviations".to_string(), toml::Value::Integer(3));
        params.insert("rsi_period".to_string(), toml::Value::Integer(-4));

        let vv = VolatilityVolumeParams::from_map(&params);
        assert_eq!(vv.bollinger_period, 10);
        assert_eq!(vv.deviations, 3.0);

        let md = MomentumDivergenceParams::from_map(&params);
        assert_eq!(md.rsi_period, 14);
        assert_eq!(md.overbought, 70.0);
    }
}
