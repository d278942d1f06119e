//! Simulation counters and structured logging setup.
//!
//! Counters are plain atomics so one [`Metrics`] can be shared by every
//! rayon worker during parallel runs.

use crate::element::StepOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Global metrics collector for simulation statistics.
pub struct Metrics {
    runs: AtomicU64,
    steps: AtomicU64,
    updates: AtomicU64,
    fired: AtomicU64,
    delayed: AtomicU64,
    toggles: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            steps: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            fired: AtomicU64::new(0),
            delayed: AtomicU64::new(0),
            toggles: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_step(&self) {
        self.steps.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one element update and what it did.
    pub fn record_update(&self, outcome: StepOutcome) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        match outcome {
            StepOutcome::Fired => {
                self.fired.fetch_add(1, Ordering::Relaxed);
            }
            StepOutcome::Delayed => {
                self.delayed.fetch_add(1, Ordering::Relaxed);
            }
            StepOutcome::Held => {}
        }
    }

    pub fn record_toggles(&self, count: usize) {
        self.toggles.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Records a completed run with its duration.
    pub fn record_run(&self, run: usize, duration: Duration) {
        let completed = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            run = run,
            completed = completed,
            duration_ms = duration.as_millis() as u64,
            "Run complete"
        );
    }

    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn delayed(&self) -> u64 {
        self.delayed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn toggles(&self) -> u64 {
        self.toggles.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the totals at info level.
    pub fn log_summary(&self) {
        tracing::info!(
            runs = self.runs(),
            steps = self.steps(),
            updates = self.updates(),
            fired = self.fired(),
            delayed = self.delayed(),
            toggles = self.toggles(),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Simulation finished"
        );
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honours `RUST_LOG`; defaults to `info`. Output goes to stderr so traces
/// written to stdout stay clean. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
