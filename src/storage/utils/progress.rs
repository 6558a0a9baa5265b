use std::io::{self, Write};

use crate::progress::PercentListener;

/// A percentage listener that prints updates to stdout on a single line.
pub fn console_reporter(label: &str) -> PercentListener<impl FnMut(&str) + Send + use<>> {
    let label = label.to_owned();
    PercentListener::new(move |pct: &str| {
        print!("\r {label}: {pct}%");
        let _ = io::stdout().flush();
    })
}
