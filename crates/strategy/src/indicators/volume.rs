use common::{Candle, Error, Result};

/// The highest-volume candle in a window and the price it closed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeProfilePeak {
    pub peak_volume: f64,
    pub price_at_peak_volume: f64,
}

/// Locate the maximum-volume candle. Ties go to the earliest candle.
pub fn volume_profile_peak(candles: &[Candle]) -> Result<VolumeProfilePeak> {
    let first = candles.first().ok_or(Error::InsufficientData {
        required: 1,
        available: 0,
    })?;

    let peak = candles[1..]
        .iter()
        .fold(first, |best, c| if c.volume > best.volume { c } else { best });

    Ok(VolumeProfilePeak {
        peak_volume: peak.volume,
        price_at_peak_volume: peak.close,
    })
}
