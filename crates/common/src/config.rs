use crate::{Error, Result};

const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_STRATEGY_CONFIG_PATH: &str = "config/strategies.toml";

/// All configuration loaded from environment variables at startup.
///
/// These values belong to the external collaborators (exchange client,
/// notifier); strategies only see their own `StrategyConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange
    pub binance_base_url: String,
    /// API key and secret. Only needed for the startup credential check;
    /// candles and tickers come from public endpoints.
    pub binance_credentials: Option<BinanceCredentials>,

    // Telegram
    pub telegram_token: String,
    /// Numeric chat id or `@channel` username.
    pub telegram_channel_id: String,

    // Strategy config file path
    pub strategy_config_path: String,
}

#[derive(Clone)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub secret: String,
}

impl std::fmt::Debug for BinanceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceCredentials")
            .field("api_key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| {
                Error::Config(format!(
                    "required environment variable '{key}' is not set. Check your .env file."
                ))
            })
        };

        let binance_credentials = match (optional("BINANCE_API_KEY"), optional("BINANCE_SECRET_KEY")) {
            (Some(api_key), Some(secret)) => Some(BinanceCredentials { api_key, secret }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "BINANCE_API_KEY and BINANCE_SECRET_KEY must be set together".into(),
                ))
            }
        };

        Ok(Config {
            binance_base_url: optional("BINANCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BINANCE_BASE_URL.to_string()),
            binance_credentials,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_channel_id: required("TELEGRAM_CHANNEL_ID")?,
            strategy_config_path: optional("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| DEFAULT_STRATEGY_CONFIG_PATH.to_string()),
        })
    }
}
