pub mod config;
pub mod indicators;
pub mod registry;
pub mod strategies;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{StrategyConfig, StrategyFileConfig, StrategyKind};
pub use registry::StrategyRegistry;
pub use strategies::{
    MomentumDivergenceStrategy, TrendCloudStrategy, VolatilityVolumeStrategy,
};

use std::time::Duration;

use async_trait::async_trait;

use common::{MarketDataGateway, Result, Signal};

/// All strategy implementations must satisfy this trait.
///
/// A strategy holds only its immutable parameters. Each call to `evaluate`
/// fetches fresh data, so the returned signal never depends on earlier
/// cycles.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Human-readable name, used as the notification prefix.
    fn name(&self) -> &str;

    /// The trading pair this strategy watches (e.g. "BTCUSDT").
    fn symbol(&self) -> &str;

    /// How often the scheduler should evaluate this strategy.
    fn every(&self) -> Duration;

    /// Fetch market data, compute indicators and classify a signal.
    async fn evaluate(&self, gateway: &dyn MarketDataGateway) -> Result<Evaluation>;
}

/// Result of one evaluation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub signal: Signal,
    /// Indicator values behind the signal, formatted for logs.
    pub summary: String,
}
