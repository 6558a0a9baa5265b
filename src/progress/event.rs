use serde::Serialize;

/// A snapshot of a monitor taken at the moment it published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    progress: u64,
    maximum: Option<u64>,
}

impl ProgressEvent {
    pub(crate) fn new(progress: u64, maximum: Option<u64>) -> Self {
        Self { progress, maximum }
    }

    /// The progress count at publish time.
    pub fn progress(&self) -> u64 {
        self.progress
    }

    /// The maximum at publish time, if one was set.
    pub fn maximum(&self) -> Option<u64> {
        self.maximum
    }
}

/// Receives [`ProgressEvent`]s from a monitor.
///
/// Listeners run synchronously on the thread that advanced the monitor and
/// must not call back into it.
pub trait ProgressListener: Send {
    /// Called once for each published event.
    fn progress_changed(&mut self, event: &ProgressEvent);
}

impl<F> ProgressListener for F
where
    F: FnMut(&ProgressEvent) + Send,
{
    fn progress_changed(&mut self, event: &ProgressEvent) {
        self(event)
    }
}
