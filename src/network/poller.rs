use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// A recurring timer that fires once immediately and then every `period`.
///
/// Each tick's work is spawned on its own task so a hung request only
/// stalls that tick. Stopping the poller does not abort work already in
/// flight; the tick closure is responsible for discarding stale results.
/// Dropping the poller stops it.
pub struct Poller {
    name: &'static str,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Poller {
    pub fn start<F, Fut>(name: &'static str, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            log::debug!("Poller `{name}` armed every {period:?}");

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::spawn(on_tick());
                    }
                }
            }

            log::debug!("Poller `{name}` disarmed");
        });

        Self { name, cancel, task }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
