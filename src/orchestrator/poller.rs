use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::orchestrator::Orchestrator;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest period the poller runs at; shorter requests are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Background status refresh. Stops when dropped.
pub struct Poller {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl Poller {
    pub fn spawn(orchestrator: Orchestrator, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                "Poll interval {:?} is below {:?}; using the minimum",
                interval,
                MIN_POLL_INTERVAL
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                orchestrator.poll_status().await;
            }
        });

        Self { handle, interval }
    }

    /// The period actually in use.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
