use common::{Error, Result};

/// Arithmetic mean of the first `period` values of `series`.
///
/// The window is anchored at the start of the slice, not the end. With
/// candles supplied oldest-first this averages the earliest part of the
/// fetched window.
pub fn simple_moving_average(series: &[f64], period: usize) -> Result<f64> {
    check_period(period)?;
    Error::require(period, series.len())?;
    Ok(series[..period].iter().sum::<f64>() / period as f64)
}

/// Population standard deviation of the first `period` values around `mean`.
pub fn standard_deviation(series: &[f64], mean: f64, period: usize) -> Result<f64> {
    check_period(period)?;
    Error::require(period, series.len())?;
    let variance = series[..period]
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / period as f64;
    Ok(variance.sqrt())
}

/// Exponential moving average seeded with the SMA of the first `period`
/// values, then folded over every remaining value with `k = 2 / (period + 1)`.
pub fn exponential_moving_average(series: &[f64], period: usize) -> Result<f64> {
    let seed = simple_moving_average(series, period)?;
    let k = 2.0 / (period as f64 + 1.0);
    Ok(series[period..]
        .iter()
        .fold(seed, |ema, &value| (value - ema) * k + ema))
}

pub(crate) fn check_period(period: usize) -> Result<()> {
    if period == 0 {
        return Err(Error::DegenerateComputation(
            "indicator period must be at least 1".into(),
        ));
    }
    Ok(())
}
