use common::{Candle, Error, Result};

use super::moving_average::check_period;

/// Ichimoku lines as parallel per-candle series.
///
/// Each line is built from closing prices of the leading candles rather than
/// from high/low midpoints, so index 0 is the first candle of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuLines {
    pub conversion_line: Vec<f64>,
    pub base_line: Vec<f64>,
    pub span_a: Vec<f64>,
    pub span_b: Vec<f64>,
}

/// Build the conversion, base and leading-span lines.
///
/// `span_a[i]` is the midpoint of `conversion_line[i]` and `base_line[i]`,
/// so its length is the shorter of the two. `span_b` covers the first
/// `span_period + displacement` candles.
pub fn ichimoku_lines(
    candles: &[Candle],
    conversion_period: usize,
    base_period: usize,
    span_period: usize,
    displacement: usize,
) -> Result<IchimokuLines> {
    check_period(conversion_period)?;
    check_period(base_period)?;
    check_period(span_period)?;

    let span_len = span_period + displacement;
    let required = conversion_period.max(base_period).max(span_len);
    Error::require(required, candles.len())?;

    let conversion_line = leading_closes(candles, conversion_period);
    let base_line = leading_closes(candles, base_period);
    let span_a = conversion_line
        .iter()
        .zip(&base_line)
        .map(|(c, b)| (c + b) / 2.0)
        .collect();
    let span_b = leading_closes(candles, span_len);

    Ok(IchimokuLines {
        conversion_line,
        base_line,
        span_a,
        span_b,
    })
}

fn leading_closes(candles: &[Candle], n: usize) -> Vec<f64> {
    candles.iter().take(n).map(|c| c.close).collect()
}
