/// Render a byte count for transfer summaries, 1024 based with units B,K,M,G,T.
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "K", "M", "G", "T"];
    const THRESHOLD: f64 = 1024.0;

    let mut value = size as f64;
    let mut unit = 0;
    while value >= THRESHOLD && unit < UNITS.len() - 1 {
        value /= THRESHOLD;
        unit += 1;
    }

    if unit == 0 {
        format!("{size}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}
