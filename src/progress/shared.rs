use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::ProgressError;
use super::event::ProgressListener;
use super::monitor::ProgressMonitor;

/// A cloneable, lock-protected handle to a [`ProgressMonitor`].
///
/// Every call takes the lock for its whole duration, listeners included, so
/// events from concurrent reporters are published in a single order. A
/// listener must not call back into the handle that is notifying it.
#[derive(Debug, Clone)]
pub struct SharedMonitor {
    inner: Arc<Mutex<ProgressMonitor>>,
}

impl SharedMonitor {
    pub fn new(monitor: ProgressMonitor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(monitor)),
        }
    }

    // The monitor stores its state before notifying, so a listener panic
    // leaves it consistent and the poison flag can be ignored.
    fn lock(&self) -> MutexGuard<'_, ProgressMonitor> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_listener<L>(&self, listener: L)
    where
        L: ProgressListener + 'static,
    {
        self.lock().add_listener(listener);
    }

    pub fn set_maximum(&self, maximum: u64) -> Result<(), ProgressError> {
        self.lock().set_maximum(maximum).map(|_| ())
    }

    pub fn set_progress(&self, count: u64) -> Result<(), ProgressError> {
        self.lock().set_progress(count).map(|_| ())
    }

    pub fn increment(&self) -> Result<u64, ProgressError> {
        self.lock().increment()
    }

    /// Advance the progress count by `amount` in a single locked step.
    ///
    /// Returns the new progress count.
    pub fn advance(&self, amount: u64) -> Result<u64, ProgressError> {
        let mut monitor = self.lock();
        let count = monitor.progress().saturating_add(amount);
        monitor.set_progress(count)?;
        Ok(count)
    }

    pub fn complete(&self) {
        self.lock().complete();
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn progress(&self) -> u64 {
        self.lock().progress()
    }

    pub fn maximum(&self) -> Option<u64> {
        self.lock().maximum()
    }

    pub fn is_done(&self) -> bool {
        self.lock().is_done()
    }

    pub fn step_size(&self) -> u64 {
        self.lock().step_size()
    }
}

impl From<ProgressMonitor> for SharedMonitor {
    fn from(monitor: ProgressMonitor) -> Self {
        Self::new(monitor)
    }
}
