//! Progress reporting and cooperative cancellation.
//!
//! The source this crate replaces used generator/iterator chains to stream
//! progress. The core instead exposes an observer trait invoked only at
//! well-defined phase boundaries and at 1% increments within long phases, so
//! observers stay trivial and the pipeline stays synchronous.

use std::sync::atomic::{AtomicBool, Ordering};

/// Named pipeline stages, in the order data flows through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Ingest,
    GraphBuild,
    Metrics,
    Impact,
    Diff,
    Advise,
    Export,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Ingest => "ingest",
            Phase::GraphBuild => "graph_build",
            Phase::Metrics => "metrics",
            Phase::Impact => "impact",
            Phase::Diff => "diff",
            Phase::Advise => "advise",
            Phase::Export => "export",
        }
    }
}

/// Observer invoked at phase boundaries and at each 1% step of a long phase.
/// Implementations must be cheap and non-blocking; the pipeline calls this
/// synchronously from whichever thread reaches the progress point.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, phase: Phase, percent: u8);
}

/// An observer that does nothing; the default when the caller doesn't care.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_progress(&self, _phase: Phase, _percent: u8) {}
}

/// A cooperative cancellation flag, checked at phase entry and at every 1%
/// progress increment. Cloning shares the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(std::sync::Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reports progress at fixed percentage steps without spamming the observer
/// on every single unit of work.
pub struct ProgressReporter<'a> {
    observer: &'a dyn ProgressObserver,
    phase: Phase,
    total: usize,
    last_percent: u8,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(observer: &'a dyn ProgressObserver, phase: Phase, total: usize) -> Self {
        observer.on_progress(phase, 0);
        Self {
            observer,
            phase,
            total,
            last_percent: 0,
        }
    }

    /// Report that `done` of `total` units have completed; only notifies the
    /// observer when crossing a new 1% boundary.
    pub fn update(&mut self, done: usize) {
        if self.total == 0 {
            return;
        }
        let percent = ((done as f64 / self.total as f64) * 100.0).min(100.0) as u8;
        if percent > self.last_percent {
            self.last_percent = percent;
            self.observer.on_progress(self.phase, percent);
        }
    }

    pub fn finish(&mut self) {
        if self.last_percent < 100 {
            self.last_percent = 100;
            self.observer.on_progress(self.phase, 100);
        }
    }
}
