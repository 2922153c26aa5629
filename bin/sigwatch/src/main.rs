use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, MarketDataGateway, NotificationSink};
use engine::{BinanceClient, Scheduler};
use strategy::{StrategyFileConfig, StrategyRegistry};
use telegram_notify::TelegramNotifier;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().unwrap_or_else(|e| panic!("{e}"));
    info!(base_url = %cfg.binance_base_url, "SigWatch starting");

    // ── Exchange client ───────────────────────────────────────────────────────
    let binance = BinanceClient::new(&cfg.binance_base_url, cfg.binance_credentials.clone())
        .unwrap_or_else(|e| panic!("{e}"));
    match binance.ping().await {
        Ok(()) => info!("Binance reachable"),
        Err(e) => warn!(error = %e, "Binance ping failed; strategies will report errors until it recovers"),
    }
    if binance.has_credentials() {
        match binance.verify_credentials().await {
            Ok(()) => info!("Binance credentials accepted"),
            Err(e) => warn!(error = %e, "Binance credential check failed"),
        }
    }
    let gateway: Arc<dyn MarketDataGateway> = Arc::new(binance);

    // ── Notifications ─────────────────────────────────────────────────────────
    let sink: Arc<dyn NotificationSink> = Arc::new(TelegramNotifier::new(
        cfg.telegram_token.clone(),
        &cfg.telegram_channel_id,
    ));

    // ── Strategies ────────────────────────────────────────────────────────────
    let strategy_file = if Path::new(&cfg.strategy_config_path).exists() {
        StrategyFileConfig::load(&cfg.strategy_config_path).unwrap_or_else(|e| panic!("{e}"))
    } else {
        warn!(
            path = %cfg.strategy_config_path,
            "Strategy config not found, using built-in defaults"
        );
        StrategyFileConfig::default()
    };
    let registry = StrategyRegistry::from_config(&strategy_file).unwrap_or_else(|e| panic!("{e}"));
    if registry.is_empty() {
        warn!("No strategies configured");
    }

    // ── Scheduling ────────────────────────────────────────────────────────────
    let scheduler = Scheduler::new(gateway, sink);
    for strategy in registry {
        scheduler.spawn(strategy);
    }

    // Keep main alive
    info!("All strategies scheduled. Waiting for shutdown signal.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting.");
}
