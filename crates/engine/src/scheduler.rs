use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use common::{MarketDataGateway, NotificationSink, Signal};
use strategy::Strategy;

/// Source of evaluation ticks for one strategy.
#[async_trait]
pub trait Trigger: Send {
    /// Wait for the next tick. Returns `false` once no further ticks will come.
    async fn tick(&mut self) -> bool;
}

/// Fixed-cadence trigger. The first tick fires one full period after
/// creation; ticks missed while the runtime is busy are skipped.
pub struct IntervalTrigger {
    interval: Interval,
}

impl IntervalTrigger {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl Trigger for IntervalTrigger {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Runs every strategy on its own trigger against shared collaborators.
///
/// The gateway and sink are acquired once and shared by all strategies.
#[derive(Clone)]
pub struct Scheduler {
    gateway: Arc<dyn MarketDataGateway>,
    sink: Arc<dyn NotificationSink>,
}

impl Scheduler {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { gateway, sink }
    }

    /// Schedule `strategy` at its configured cadence.
    pub fn spawn(&self, strategy: Arc<dyn Strategy>) -> JoinHandle<()> {
        let trigger = IntervalTrigger::new(strategy.every());
        self.spawn_with(strategy, trigger)
    }

    /// Schedule `strategy` on an arbitrary trigger.
    pub fn spawn_with<T>(&self, strategy: Arc<dyn Strategy>, trigger: T) -> JoinHandle<()>
    where
        T: Trigger + 'static,
    {
        tokio::spawn(drive(
            strategy,
            self.gateway.clone(),
            self.sink.clone(),
            trigger,
        ))
    }
}

/// Each tick launches an independent cycle task, so a slow cycle never
/// delays the next tick and two cycles of one strategy may overlap.
async fn drive<T: Trigger>(
    strategy: Arc<dyn Strategy>,
    gateway: Arc<dyn MarketDataGateway>,
    sink: Arc<dyn NotificationSink>,
    mut trigger: T,
) {
    info!(
        strategy = %strategy.name(),
        symbol = %strategy.symbol(),
        every = ?strategy.every(),
        "Strategy scheduled"
    );

    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

    while trigger.tick().await {
        in_flight.retain(|h| !h.is_finished());

        let (s, g, n) = (strategy.clone(), gateway.clone(), sink.clone());
        in_flight.push(tokio::spawn(async move {
            run_cycle(s.as_ref(), g.as_ref(), n.as_ref()).await;
        }));
    }

    for handle in in_flight {
        if let Err(e) = handle.await {
            error!(strategy = %strategy.name(), error = %e, "Evaluation task aborted");
        }
    }
    info!(strategy = %strategy.name(), "Trigger exhausted, strategy stopped");
}

/// Evaluate once and send exactly one notification: the signal, or the
/// error that prevented one. Never fails.
pub async fn run_cycle(
    strategy: &dyn Strategy,
    gateway: &dyn MarketDataGateway,
    sink: &dyn NotificationSink,
) -> Option<Signal> {
    let span = info_span!("cycle", strategy = %strategy.name(), cycle_id = %Uuid::new_v4());

    async move {
        let name = strategy.name();
        match strategy.evaluate(gateway).await {
            Ok(evaluation) => {
                info!(
                    symbol = %strategy.symbol(),
                    signal = %evaluation.signal,
                    "{}",
                    evaluation.summary
                );
                let text = format!("{name}: {}", evaluation.signal.headline());
                sink.send(&text).await;
                Some(evaluation.signal)
            }
            Err(e) => {
                warn!(symbol = %strategy.symbol(), error = %e, "Error executing trading strategy");
                let text = format!("{name}: Error executing trading strategy: {e}");
                sink.send(&text).await;
                None
            }
        }
    }
    .instrument(span)
    .await
}
