use std::fmt;

use snafu::ensure;

use super::error::{
    CompletedSnafu, CountAboveMaximumSnafu, CountBelowProgressSnafu, MaxStepSizeNotPositiveSnafu,
    MaximumBelowProgressSnafu, MaximumNotPositiveSnafu, MinStepSizeNotPositiveSnafu,
    ProgressError, StepRangeInvertedSnafu,
};
use super::event::{ProgressEvent, ProgressListener};

/// The default minimum step size.
pub const DEFAULT_MIN_STEP_SIZE: u64 = 10;

/// The default maximum step size.
pub const DEFAULT_MAX_STEP_SIZE: u64 = 1000;

/// Which value feeds the adaptive step formula while a run is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepBasis {
    /// Use the maximum when one is set, otherwise the progress count.
    ///
    /// With a maximum set the step stays where `set_maximum` put it, so the
    /// step never shrinks during a run.
    #[default]
    Maximum,
    /// Always use the progress count that triggered the publish.
    Progress,
}

/// Tracks the progress of a long running operation and notifies listeners at
/// step boundaries.
///
/// Events are published whenever the progress count reaches or passes a
/// multiple of the current step size. Unless the step size is constant it
/// grows from the minimum toward the maximum step size as the count grows, so
/// a run publishes frequently early on and sparsely later. Duplicate events
/// are never published.
///
/// Once [`complete`](Self::complete) is called, the progress count and the
/// maximum can no longer change until [`reset`](Self::reset).
///
/// `ProgressMonitor` does no locking. Callers that report from several threads
/// must serialize access themselves, or use
/// [`SharedMonitor`](super::SharedMonitor).
///
/// ```
/// use progmon::progress::ProgressMonitor;
///
/// let mut monitor = ProgressMonitor::new();
/// monitor.add_listener(|event: &progmon::progress::ProgressEvent| {
///     println!("processed {}", event.progress());
/// });
///
/// for _ in 0..25 {
///     monitor.increment().unwrap();
/// }
/// monitor.complete();
/// assert!(monitor.is_done());
/// ```
pub struct ProgressMonitor {
    min_step_size: u64,
    max_step_size: u64,
    basis: StepBasis,

    progress: u64,
    step: u64,
    maximum: Option<u64>,
    done: bool,
    last_published: Option<u64>,

    listeners: Vec<Box<dyn ProgressListener>>,
}

impl ProgressMonitor {
    /// Create a monitor with [`DEFAULT_MIN_STEP_SIZE`] and [`DEFAULT_MAX_STEP_SIZE`].
    pub fn new() -> Self {
        Self::from_range(DEFAULT_MIN_STEP_SIZE, DEFAULT_MAX_STEP_SIZE)
    }

    /// Create a monitor whose step size adapts between `min_step_size` and `max_step_size`.
    pub fn with_min_max_step_size(
        min_step_size: u64,
        max_step_size: u64,
    ) -> Result<Self, ProgressError> {
        validate_range(min_step_size, max_step_size)?;
        Ok(Self::from_range(min_step_size, max_step_size))
    }

    /// Create a monitor that always publishes every `step_size` units.
    pub fn with_constant_step_size(step_size: u64) -> Result<Self, ProgressError> {
        Self::with_min_max_step_size(step_size, step_size)
    }

    fn from_range(min_step_size: u64, max_step_size: u64) -> Self {
        Self {
            min_step_size,
            max_step_size,
            basis: StepBasis::default(),
            progress: 0,
            step: min_step_size,
            maximum: None,
            done: false,
            last_published: None,
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners are notified in registration order.
    pub fn add_listener<L>(&mut self, listener: L) -> &mut Self
    where
        L: ProgressListener + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Switch to a constant step size.
    ///
    /// Progress, maximum and listeners are kept.
    pub fn set_step_size(&mut self, step_size: u64) -> Result<&mut Self, ProgressError> {
        self.set_dynamic_step_size(step_size, step_size)
    }

    /// Replace the adaptive step range and recompute the current step from it.
    ///
    /// Progress, maximum and listeners are kept.
    pub fn set_dynamic_step_size(
        &mut self,
        min_step_size: u64,
        max_step_size: u64,
    ) -> Result<&mut Self, ProgressError> {
        validate_range(min_step_size, max_step_size)?;

        self.min_step_size = min_step_size;
        self.max_step_size = max_step_size;
        self.step = self.adaptive_step(self.reference_value(self.progress));
        Ok(self)
    }

    pub fn set_step_basis(&mut self, basis: StepBasis) -> &mut Self {
        self.basis = basis;
        self
    }

    pub fn step_basis(&self) -> StepBasis {
        self.basis
    }

    /// Set the maximum value and recompute the step size from it.
    ///
    /// May be called repeatedly until the monitor completes, but never below
    /// the current progress.
    pub fn set_maximum(&mut self, maximum: u64) -> Result<&mut Self, ProgressError> {
        ensure!(!self.done, CompletedSnafu);
        ensure!(maximum >= 1, MaximumNotPositiveSnafu);
        ensure!(
            maximum >= self.progress,
            MaximumBelowProgressSnafu {
                maximum,
                progress: self.progress
            }
        );

        self.maximum = Some(maximum);
        self.step = self.adaptive_step(maximum);
        Ok(self)
    }

    pub fn maximum(&self) -> Option<u64> {
        self.maximum
    }

    /// Increment the progress count by one, publishing if a step boundary was reached.
    ///
    /// Returns the new progress count.
    pub fn increment(&mut self) -> Result<u64, ProgressError> {
        self.set_progress(self.progress.saturating_add(1))?;
        Ok(self.progress)
    }

    /// Set the progress count, publishing if a step boundary was reached or passed.
    ///
    /// Setting the current count again is a no-op.
    pub fn set_progress(&mut self, count: u64) -> Result<&mut Self, ProgressError> {
        ensure!(!self.done, CompletedSnafu);
        ensure!(
            count >= self.progress,
            CountBelowProgressSnafu {
                count,
                progress: self.progress
            }
        );
        if let Some(maximum) = self.maximum {
            ensure!(count <= maximum, CountAboveMaximumSnafu { count, maximum });
        }

        if count == self.progress {
            return Ok(self);
        }

        let previous = self.progress;
        self.progress = count;

        // Boundary index grows iff a multiple of the step lies in (previous, count].
        if count / self.step > previous / self.step {
            self.publish();

            if self.step < self.max_step_size {
                self.step = self.adaptive_step(self.reference_value(count));
            }
        }

        Ok(self)
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    /// The current sampling interval.
    pub fn step_size(&self) -> u64 {
        self.step
    }

    pub fn min_step_size(&self) -> u64 {
        self.min_step_size
    }

    pub fn max_step_size(&self) -> u64 {
        self.max_step_size
    }

    /// Mark the operation as finished, publishing the final count unless it
    /// was the last value published.
    ///
    /// Calling this again has no effect. Further changes to the progress
    /// count or the maximum fail until [`reset`](Self::reset).
    pub fn complete(&mut self) {
        if self.done {
            return;
        }

        self.done = true;

        if self.last_published != Some(self.progress) {
            self.publish();
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Return to the initial running state.
    ///
    /// Listeners, the step range, the step basis and the maximum are kept.
    /// The step restarts at the minimum step size and is rebuilt from the
    /// retained maximum only after the first publish of the new run, so that
    /// run publishes one early event at the minimum step.
    pub fn reset(&mut self) -> &mut Self {
        self.progress = 0;
        self.step = self.min_step_size;
        self.done = false;
        self.last_published = None;
        self
    }

    fn reference_value(&self, count: u64) -> u64 {
        match (self.basis, self.maximum) {
            (StepBasis::Maximum, Some(maximum)) => maximum,
            _ => count,
        }
    }

    fn adaptive_step(&self, value: u64) -> u64 {
        if value > self.max_step_size.saturating_mul(5) {
            self.max_step_size
        } else if value / 5 <= self.min_step_size {
            self.min_step_size
        } else {
            value / 5
        }
    }

    fn publish(&mut self) {
        let event = ProgressEvent::new(self.progress, self.maximum);
        self.last_published = Some(self.progress);

        log::trace!(
            "publish progress={} maximum={:?} step={}",
            self.progress,
            self.maximum,
            self.step
        );
        for listener in &mut self.listeners {
            listener.progress_changed(&event);
        }
    }
}

impl Default for ProgressMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProgressMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressMonitor")
            .field("progress", &self.progress)
            .field("maximum", &self.maximum)
            .field("step", &self.step)
            .field("min_step_size", &self.min_step_size)
            .field("max_step_size", &self.max_step_size)
            .field("basis", &self.basis)
            .field("done", &self.done)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn validate_range(min_step_size: u64, max_step_size: u64) -> Result<(), ProgressError> {
    ensure!(min_step_size > 0, MinStepSizeNotPositiveSnafu);
    ensure!(max_step_size > 0, MaxStepSizeNotPositiveSnafu);
    ensure!(max_step_size >= min_step_size, StepRangeInvertedSnafu);
    Ok(())
}
