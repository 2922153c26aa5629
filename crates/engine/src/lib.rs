pub mod binance;
pub mod scheduler;

pub use binance::BinanceClient;
pub use scheduler::{run_cycle, IntervalTrigger, Scheduler, Trigger};
