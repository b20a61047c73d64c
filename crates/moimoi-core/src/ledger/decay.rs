//! Foreground happiness decay.
//!
//! The timer is an owned handle: start it when the app comes to the
//! foreground, stop it when it goes away. Nothing ticks while stopped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::RewardLedger;
use crate::storage::KvStore;

pub struct HappinessDecayTimer {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl HappinessDecayTimer {
    /// Spawn the decay loop on the current tokio runtime.
    ///
    /// The first tick fires one `period` after start.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn start<S>(ledger: Arc<RewardLedger<S>>, period: Duration) -> Self
    where
        S: KvStore + Send + 'static,
    {
        let (shutdown, mut stop) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        match ledger.decay_happiness() {
                            Ok(tick) => debug!(happiness = tick.happiness, "happiness decayed"),
                            Err(e) => warn!(error = %e, "happiness decay tick failed"),
                        }
                    }
                }
            }
            if let Err(e) = ledger.flush() {
                warn!(error = %e, "flush after decay timer stop failed");
            }
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Start with the ledger's configured decay interval.
    pub fn start_configured<S>(ledger: Arc<RewardLedger<S>>) -> Self
    where
        S: KvStore + Send + 'static,
    {
        let period = Duration::from_secs(ledger.happiness_config().decay_interval_secs);
        Self::start(ledger, period)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the loop and wait for it to flush pending happiness.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "decay timer task ended abnormally");
            }
        }
    }
}

impl Drop for HappinessDecayTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
