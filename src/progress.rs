//! Step-gated progress monitoring.
//!
//! A [`ProgressMonitor`] accumulates a progress count and notifies its
//! listeners only when the count reaches a step boundary. The step size grows
//! with the count between a configured minimum and maximum, which bounds the
//! number of notifications no matter how large the operation is.

mod error;
mod event;
mod monitor;
mod percent;
mod shared;

pub use error::{ErrorKind, ProgressError};
pub use event::{ProgressEvent, ProgressListener};
pub use monitor::{DEFAULT_MAX_STEP_SIZE, DEFAULT_MIN_STEP_SIZE, ProgressMonitor, StepBasis};
pub use percent::PercentListener;
pub use shared::SharedMonitor;
