//! Background loop for the reminder checker.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How often reminders are checked unless configured otherwise.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Runs a tick function on a background thread at a fixed interval.
///
/// The first tick runs right after [`start`](Self::start). Dropping the
/// scheduler stops the loop.
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    worker: Option<Worker>,
}

#[derive(Debug)]
struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start calling `tick` every `interval`, replacing any running loop.
    pub fn start<F>(&mut self, interval: Duration, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            tick();
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                // explicit stop, or the scheduler was dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        tracing::debug!(interval_secs = interval.as_secs(), "reminder scheduler started");
        self.worker = Some(Worker { stop, handle });
    }

    /// Stop the loop and wait for the current tick to finish.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = worker.stop.send(());
        if worker.handle.join().is_err() {
            tracing::warn!("reminder tick panicked");
        }
        tracing::debug!("reminder scheduler stopped");
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
