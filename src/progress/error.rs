use snafu::Snafu;

/// The two classes of monitor failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller supplied value broke a precondition.
    InvalidArgument,
    /// A mutating call was made after `complete` without a `reset`.
    InvalidState,
}

/// Errors returned by [`ProgressMonitor`](super::ProgressMonitor) operations.
///
/// A failed call never changes the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProgressError {
    #[snafu(display("minStepSize <= 0"))]
    MinStepSizeNotPositive,

    #[snafu(display("maxStepSize <= 0"))]
    MaxStepSizeNotPositive,

    #[snafu(display("maxStepSize < minStepSize"))]
    StepRangeInverted,

    #[snafu(display("maximum < 1"))]
    MaximumNotPositive,

    #[snafu(display("maximum ({maximum}) < progress ({progress})"))]
    MaximumBelowProgress { maximum: u64, progress: u64 },

    #[snafu(display("count ({count}) < progress ({progress})"))]
    CountBelowProgress { count: u64, progress: u64 },

    #[snafu(display("count ({count}) > maximum ({maximum})"))]
    CountAboveMaximum { count: u64, maximum: u64 },

    #[snafu(display("operation has completed"))]
    Completed,
}

impl ProgressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressError::Completed => ErrorKind::InvalidState,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
