use common::Result;

use super::moving_average::{check_period, exponential_moving_average};

/// MACD (Moving Average Convergence/Divergence) snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// MACD line = EMA(short) − EMA(long) over the whole close series.
///
/// The signal line is the EMA of the one-element series `[macd_line]`. That
/// series can never fill a `signal_period` window, so the signal line
/// collapses to `macd_line` itself and the histogram is zero. This is a
/// single-bar snapshot, not a rolling MACD signal.
pub fn moving_average_convergence_divergence(
    closes: &[f64],
    short_period: usize,
    long_period: usize,
    signal_period: usize,
) -> Result<Macd> {
    check_period(signal_period)?;
    let short_ema = exponential_moving_average(closes, short_period)?;
    let long_ema = exponential_moving_average(closes, long_period)?;
    let macd_line = short_ema - long_ema;

    let signal_line = smooth(&[macd_line], signal_period)?;

    Ok(Macd {
        macd_line,
        signal_line,
        histogram: macd_line - signal_line,
    })
}

/// EMA of `series`, or its last value when the series is shorter than `period`.
fn smooth(series: &[f64], period: usize) -> Result<f64> {
    match series.last() {
        Some(&last) if series.len() < period => Ok(last),
        _ => exponential_moving_average(series, period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Error;

    fn trending_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn macd_returns_error_with_insufficient_data() {
        let prices = vec![100.0; 20]; // need >= 26
        assert!(matches!(
            moving_average_convergence_divergence(&prices, 12, 26, 9),
            Err(Error::InsufficientData { required: 26, available: 20 })
        ));
    }

    #[test]
    fn flat_series_has_zero_macd() {
        let prices = vec![250.0; 60];
        let macd = moving_average_convergence_divergence(&prices, 12, 26, 9).unwrap();
        assert_eq!(macd.macd_line, 0.0);
        assert_eq!(macd.histogram, -macd.signal_line);
    }

    #[test]
    fn signal_line_degenerates_to_macd_line() {
        let macd = moving_average_convergence_divergence(&trending_up(60), 12, 26, 9).unwrap();
        assert!(macd.macd_line > 0.0, "short EMA should lead in an up-trend");
        assert_eq!(macd.signal_line, macd.macd_line);
        assert_eq!(macd.histogram, 0.0);
    }

    #[test]
    fn single_period_signal_is_plain_ema() {
        // A one-element window is satisfiable and the EMA of [x] is x.
        let macd = moving_average_convergence_divergence(&trending_up(40), 3, 6, 1).unwrap();
        assert_eq!(macd.signal_line, macd.macd_line);
    }
}
