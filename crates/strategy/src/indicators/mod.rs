//! Pure, stateless indicator functions over ordered price series.
//!
//! Every function reads the leading `period` values of its input.

pub mod bollinger;
pub mod ichimoku;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod volume;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use ichimoku::{ichimoku_lines, IchimokuLines};
pub use macd::{moving_average_convergence_divergence, Macd};
pub use moving_average::{exponential_moving_average, simple_moving_average, standard_deviation};
pub use rsi::relative_strength_index;
pub use volume::{volume_profile_peak, VolumeProfilePeak};
