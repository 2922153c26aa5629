use common::{Error, Result};

use super::moving_average::check_period;

/// RSI (Relative Strength Index) over the first `period` price changes.
///
/// Gains and losses are plain arithmetic means, with no Wilder smoothing
/// applied to later changes. Needs at least `period + 1` closes.
///
/// A window with no losses saturates at 100, including a window with no
/// movement at all.
pub fn relative_strength_index(closes: &[f64], period: usize) -> Result<f64> {
    check_period(period)?;
    Error::require(period + 1, closes.len())?;

    let changes = closes.windows(2).take(period).map(|w| w[1] - w[0]);
    let (gain_sum, loss_sum) = changes.fold((0.0, 0.0), |(g, l), change| {
        if change > 0.0 {
            (g + change, l)
        } else {
            (g, l + change.abs())
        }
    });

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rsi_insufficient_data() {
        // Need at least period+1 = 15 values
        let prices = vec![100.0; 14];
        assert!(matches!(
            relative_strength_index(&prices, 14),
            Err(Error::InsufficientData { required: 15, available: 14 })
        ));
    }

    #[test]
    fn rsi_all_gains_returns_100() {
        let prices = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        assert_eq!(relative_strength_index(&prices, 3).unwrap(), 100.0);
    }

    #[test]
    fn rsi_all_losses_returns_0() {
        let prices = vec![14.0, 13.0, 12.0, 11.0, 10.0];
        let value = relative_strength_index(&prices, 3).unwrap();
        assert!(value.abs() < 1e-9, "Expected ~0, got {value}");
    }

    #[test]
    fn rsi_flat_window_saturates() {
        let prices = vec![50.0; 20];
        assert_eq!(relative_strength_index(&prices, 14).unwrap(), 100.0);
    }

    #[test]
    fn rsi_only_reads_first_period_changes() {
        // Two gains of 1 and one loss of 1 in the window, then a crash that
        // falls outside it.
        let prices = vec![10.0, 11.0, 10.0, 11.0, 1.0];
        let value = relative_strength_index(&prices, 3).unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 2.0);
        assert!((value - expected).abs() < 1e-9, "Expected {expected}, got {value}");
    }

    #[test]
    fn rsi_known_value() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.15, 43.61, 44.33, 44.83, 45.10,
            45.15, 44.34, 44.09,
        ];
        // Gains sum to 3.14 and losses to 3.39 over the 14 changes.
        let v = relative_strength_index(&prices, 14).unwrap();
        let expected = 100.0 * 3.14 / (3.14 + 3.39);
        assert!((v - expected).abs() < 1e-9, "Expected {expected}, got {v}");
        assert!((v - 48.0858).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn non_decreasing_window_with_a_gain_saturates(
            steps in prop::collection::vec(0.0f64..10.0f64, 14),
            bump in 0.01f64..10.0f64,
        ) {
            let mut prices = vec![100.0];
            for (i, step) in steps.iter().enumerate() {
                let last = *prices.last().unwrap();
                let step = if i == 0 { step + bump } else { *step };
                prices.push(last + step);
            }
            prop_assert_eq!(relative_strength_index(&prices, 14).unwrap(), 100.0);
        }

        #[test]
        fn rsi_stays_in_range(
            prices in prop::collection::vec(1.0f64..100_000.0f64, 15..60),
        ) {
            if let Ok(v) = relative_strength_index(&prices, 14) {
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }
    }
}
