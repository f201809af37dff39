//! Observation and cancellation hooks threaded through a mining run.
use flume::Sender;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Cooperative stop signal checked once per trial.
#[derive(Debug)]
pub struct StopFlag {
    stop: AtomicBool,
}

impl StopFlag {
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn force_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot sent to an events channel while a block is being mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiningProgress {
    /// Trials completed so far for this block.
    pub trials: u64,
    /// Winning nonce, set only on the final report of a successful run.
    pub found: Option<u64>,
}

/// Optional hooks for a mining run. None of them influence which nonce wins.
#[derive(Clone, Debug, Default)]
pub struct MiningHooks {
    pub progress: Option<Arc<AtomicU64>>,
    pub events: Option<Sender<MiningProgress>>,
    pub stop: Option<Arc<StopFlag>>,
}

impl MiningHooks {
    pub fn with_progress(mut self, progress: Arc<AtomicU64>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_events(mut self, events: Sender<MiningProgress>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_stop(mut self, stop: Arc<StopFlag>) -> Self {
        self.stop = Some(stop);
        self
    }

    #[inline]
    pub(crate) fn should_stop(&self) -> bool {
        self.stop.as_ref().is_some_and(|s| s.should_stop())
    }

    pub(crate) fn begin(&self) {
        if let Some(progress) = &self.progress {
            progress.store(0, Ordering::SeqCst);
        }
    }

    /// Publish the running trial count. A dropped receiver is not an error.
    pub(crate) fn report(&self, trials: u64, found: Option<u64>) {
        if let Some(progress) = &self.progress {
            progress.store(trials, Ordering::Relaxed);
        }
        if let Some(events) = &self.events {
            if events.try_send(MiningProgress { trials, found }).is_err() {
                log::trace!("progress receiver full or gone at {trials} trials");
            }
        }
    }
}
