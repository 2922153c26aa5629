pub mod config;
pub mod error;
pub mod exchange;
pub mod types;

pub use config::{BinanceCredentials, Config};
pub use error::{Error, Result};
pub use exchange::{MarketDataGateway, NotificationSink};
pub use types::*;
