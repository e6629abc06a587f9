//! Strategy evaluation
//!
//! One cycle runs an ordered sequence of independent strategies over shared
//! fixture data, a Monte Carlo estimator, and the dedup ledger. Strategies
//! execute sequentially so ledger mutation stays race-free; a failing
//! strategy never blocks the ones after it.

pub mod live;
pub mod prematch;

#[cfg(test)]
mod live_tests;

pub use live::LivePressureStrategy;
pub use prematch::PrematchStrategy;

use crate::client::FixtureSource;
use crate::config::{ScheduleConfig, StrategyConfig};
use crate::error::Result;
use crate::ledger::AlertLedger;
use crate::sim::MonteCarlo;
use crate::types::Alert;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// An independent rule set mapping fixture data to alert decisions.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(
        &self,
        source: &dyn FixtureSource,
        ledger: &mut AlertLedger,
        sim: &mut MonteCarlo,
    ) -> Result<Vec<Alert>>;
}

/// Runs the strategy sequence and owns the ledger between cycles.
pub struct StrategyRunner {
    source: Arc<dyn FixtureSource>,
    strategies: Vec<Box<dyn Strategy>>,
    // Guards the whole cycle: an overlapping manual trigger waits for the
    // in-flight scheduled cycle instead of interleaving ledger mutation.
    state: Mutex<CycleState>,
}

struct CycleState {
    ledger: AlertLedger,
    sim: MonteCarlo,
}

impl StrategyRunner {
    pub fn new(
        cfg: &StrategyConfig,
        schedule: &ScheduleConfig,
        source: Arc<dyn FixtureSource>,
        ledger: AlertLedger,
        sim: MonteCarlo,
    ) -> Self {
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(PrematchStrategy::new(cfg, schedule.utc_offset_hours)),
            Box::new(LivePressureStrategy::new(cfg)),
        ];
        Self::with_strategies(source, ledger, sim, strategies)
    }

    pub fn with_strategies(
        source: Arc<dyn FixtureSource>,
        ledger: AlertLedger,
        sim: MonteCarlo,
        strategies: Vec<Box<dyn Strategy>>,
    ) -> Self {
        Self {
            source,
            strategies,
            state: Mutex::new(CycleState { ledger, sim }),
        }
    }

    /// Run every strategy once, flush the ledger, and return the cycle's
    /// alerts for delivery.
    ///
    /// The ledger is flushed exactly once per cycle, after all strategies.
    /// If the process dies mid-cycle the unflushed marks are re-evaluated
    /// next cycle; the accepted failure direction is duplicate alerts, not
    /// missing ones.
    pub async fn run_cycle(&self) -> Vec<Alert> {
        let mut state = self.state.lock().await;
        let CycleState { ledger, sim } = &mut *state;

        let mut alerts = Vec::new();
        for strategy in &self.strategies {
            match strategy.evaluate(self.source.as_ref(), ledger, sim).await {
                Ok(mut found) => {
                    info!(
                        "strategy {} produced {} alert(s)",
                        strategy.name(),
                        found.len()
                    );
                    alerts.append(&mut found);
                }
                Err(e) => {
                    error!("strategy {} failed, continuing: {}", strategy.name(), e);
                }
            }
        }

        if let Err(e) = state.ledger.flush() {
            // Unflushed marks mean already-alerted fixtures can re-alert
            // after a restart, so this must be loud.
            error!("ledger flush failed, duplicate alerts possible: {}", e);
        }

        alerts
    }

    /// Number of fixtures alerted on so far.
    pub async fn ledger_len(&self) -> usize {
        self.state.lock().await.ledger.len()
    }
}
