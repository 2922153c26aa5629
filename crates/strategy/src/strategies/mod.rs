pub mod momentum_divergence;
pub mod trend_cloud;
pub mod volatility_volume;

pub use momentum_divergence::{
    MomentumDivergenceParams, MomentumDivergenceStrategy, MomentumIndicators,
};
pub use trend_cloud::{TrendCloudIndicators, TrendCloudParams, TrendCloudStrategy};
pub use volatility_volume::{
    BandVolumeIndicators, VolatilityVolumeParams, VolatilityVolumeStrategy,
};
