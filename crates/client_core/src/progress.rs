//! Client-side progress readout for an in-flight conversion.
//!
//! The counter is a timer, not telemetry: it ticks at a fixed interval with no
//! knowledge of what the server is doing. Do not wire it to server events.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::domain::{ProgressPolicy, SubmissionKind};
use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

use crate::view::ConverterView;

pub const ZIP_PROCESSING_TEXT: &str = "Processing ZIP file...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    pub fn finished(total: usize) -> Self {
        Self {
            completed: total,
            total,
        }
    }

    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn text(&self) -> String {
        format!(
            "Converted {}/{} files ({}%)",
            self.completed,
            self.total,
            self.percentage()
        )
    }

    fn advance(&mut self) {
        self.completed = (self.completed + 1).min(self.total);
    }

    fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Counted { total: usize },
    Indeterminate,
}

impl ProgressMode {
    pub fn select(policy: ProgressPolicy, kind: SubmissionKind, total: usize) -> Self {
        match (policy, kind) {
            (ProgressPolicy::DistinguishZip, SubmissionKind::Zip) => Self::Indeterminate,
            _ => Self::Counted { total },
        }
    }

    /// Total to report on completion, when one is known.
    pub fn known_total(&self) -> Option<usize> {
        match self {
            Self::Counted { total } if *total > 0 => Some(*total),
            _ => None,
        }
    }
}

struct TickerState {
    progress: ProgressState,
    live: bool,
}

/// Shared between the ticking task and whoever finishes the submission.
/// View writes happen under the lock, so once `stop` returns nothing else is written.
#[derive(Clone)]
struct StopFlag(Arc<Mutex<TickerState>>);

impl StopFlag {
    fn lock(&self) -> MutexGuard<'_, TickerState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressSimulator {
    interval: Duration,
}

impl ProgressSimulator {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Writes the initial readout and, in counted mode, starts ticking.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, mode: ProgressMode, view: Arc<dyn ConverterView>) -> ProgressHandle {
        match mode {
            ProgressMode::Indeterminate => {
                view.set_progress_text(ZIP_PROCESSING_TEXT);
                ProgressHandle::idle()
            }
            ProgressMode::Counted { total } => {
                let initial = ProgressState::new(total);
                view.set_progress_text(&initial.text());
                if total == 0 {
                    return ProgressHandle::idle();
                }
                let flag = StopFlag(Arc::new(Mutex::new(TickerState {
                    progress: initial,
                    live: true,
                })));
                let task = tokio::spawn(tick(flag.clone(), self.interval, view));
                ProgressHandle {
                    flag: Some(flag),
                    task: Some(task),
                }
            }
        }
    }
}

async fn tick(flag: StopFlag, period: Duration, view: Arc<dyn ConverterView>) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let mut guard = flag.lock();
        if !guard.live {
            return;
        }
        guard.progress.advance();
        debug!(
            completed = guard.progress.completed,
            total = guard.progress.total,
            "simulated progress tick"
        );
        view.set_progress_text(&guard.progress.text());
        if guard.progress.is_done() {
            guard.live = false;
            return;
        }
    }
}

/// Stops the readout. Safe to stop more than once; dropping also stops.
pub struct ProgressHandle {
    flag: Option<StopFlag>,
    task: Option<JoinHandle<()>>,
}

impl ProgressHandle {
    fn idle() -> Self {
        Self {
            flag: None,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.flag.as_ref().is_some_and(|flag| flag.lock().live)
    }

    pub fn snapshot(&self) -> Option<ProgressState> {
        self.flag.as_ref().map(|flag| flag.lock().progress)
    }

    /// Returns whether this call was the one that stopped a live timer.
    pub fn stop(&mut self) -> bool {
        let was_live = self
            .flag
            .as_ref()
            .map(|flag| std::mem::replace(&mut flag.lock().live, false))
            .unwrap_or(false);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        was_live
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
