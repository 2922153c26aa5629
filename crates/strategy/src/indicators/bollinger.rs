use common::Result;

use super::moving_average::{simple_moving_average, standard_deviation};

/// Volatility envelope around the SMA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub lower: f64,
}

/// `SMA(period) ± deviations * σ(period)`, both over the leading window.
pub fn bollinger_bands(closes: &[f64], period: usize, deviations: f64) -> Result<BollingerBands> {
    let sma = simple_moving_average(closes, period)?;
    let sd = standard_deviation(closes, sma, period)?;
    Ok(BollingerBands {
        upper: sma + deviations * sd,
        lower: sma - deviations * sd,
    })
}
