use std::fmt;

use super::event::{ProgressEvent, ProgressListener};

/// A listener that reports progress as a percentage of the maximum.
///
/// The callback receives the formatted percent value (without a `%` sign).
/// It never receives the same string twice in a row and never receives zero,
/// so events that round to an already reported percentage are dropped.
///
/// Events published while no maximum is set are skipped, with a single warning.
pub struct PercentListener<F> {
    on_update: F,
    fraction_digits: usize,
    last: Option<String>,
    warned: bool,
}

impl<F> PercentListener<F>
where
    F: FnMut(&str) + Send,
{
    /// Report whole percentages.
    pub fn new(on_update: F) -> Self {
        Self::with_fraction_digits(0, on_update)
    }

    /// Report percentages rounded to `fraction_digits` decimal places.
    pub fn with_fraction_digits(fraction_digits: usize, on_update: F) -> Self {
        Self {
            on_update,
            fraction_digits,
            last: None,
            warned: false,
        }
    }
}

impl<F> ProgressListener for PercentListener<F>
where
    F: FnMut(&str) + Send,
{
    fn progress_changed(&mut self, event: &ProgressEvent) {
        let Some(maximum) = event.maximum() else {
            if !self.warned {
                log::warn!(
                    "percent listener skipped progress {}: maximum value undefined",
                    event.progress()
                );
                self.warned = true;
            }
            return;
        };

        let percentage = event.progress() as f64 / maximum as f64 * 100.0;
        let pct = format!("{:.prec$}", percentage, prec = self.fraction_digits);

        if self.last.as_deref() == Some(pct.as_str()) || is_zero(&pct) {
            return;
        }

        (self.on_update)(&pct);
        self.last = Some(pct);
    }
}

impl<F> fmt::Debug for PercentListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PercentListener")
            .field("fraction_digits", &self.fraction_digits)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

fn is_zero(formatted: &str) -> bool {
    formatted.chars().all(|c| c == '0' || c == '.')
}
