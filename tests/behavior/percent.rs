use crate::*;
use progmon::error::Result;
use progmon::progress::{PercentListener, ProgressMonitor};
use std::sync::{Arc, Mutex};

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(trials!(
        test_whole_percentages_reported_once_each,
        test_fraction_digits,
        test_zero_percent_is_never_reported,
        test_events_without_maximum_are_skipped,
        test_sparse_events_report_each_value
    ));
}

fn percent_monitor(
    step: u64,
    fraction_digits: usize,
) -> Result<(ProgressMonitor, Arc<Mutex<Vec<String>>>)> {
    let mut monitor = ProgressMonitor::with_constant_step_size(step)?;
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    monitor.add_listener(PercentListener::with_fraction_digits(
        fraction_digits,
        move |pct: &str| sink.lock().unwrap().push(pct.to_string()),
    ));
    Ok((monitor, reported))
}

fn test_whole_percentages_reported_once_each() -> Result<()> {
    let (mut monitor, reported) = percent_monitor(1, 0)?;
    monitor.set_maximum(200)?;

    for _ in 0..200 {
        monitor.increment()?;
    }
    monitor.complete();

    let expected: Vec<String> = (1..=100).map(|p| p.to_string()).collect();
    assert_eq!(*reported.lock().unwrap(), expected);
    Ok(())
}

fn test_fraction_digits() -> Result<()> {
    let (mut monitor, reported) = percent_monitor(1, 2)?;
    monitor.set_maximum(3)?;

    monitor.increment()?;
    monitor.increment()?;
    monitor.increment()?;
    monitor.complete();

    assert_eq!(*reported.lock().unwrap(), vec!["33.33", "66.67", "100.00"]);
    Ok(())
}

fn test_zero_percent_is_never_reported() -> Result<()> {
    let (mut monitor, reported) = percent_monitor(1, 0)?;
    monitor.set_maximum(1000)?;

    monitor.increment()?;
    monitor.increment()?;
    assert!(reported.lock().unwrap().is_empty());

    monitor.set_progress(10)?;
    assert_eq!(*reported.lock().unwrap(), vec!["1"]);
    Ok(())
}

fn test_events_without_maximum_are_skipped() -> Result<()> {
    let (mut monitor, reported) = percent_monitor(1, 0)?;

    for _ in 0..10 {
        monitor.increment()?;
    }
    monitor.complete();

    assert!(reported.lock().unwrap().is_empty());
    Ok(())
}

fn test_sparse_events_report_each_value() -> Result<()> {
    let mut monitor = ProgressMonitor::new();
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    monitor.add_listener(PercentListener::new(move |pct: &str| {
        sink.lock().unwrap().push(pct.to_string())
    }));
    monitor.set_maximum(10000)?;

    for _ in 0..10000 {
        monitor.increment()?;
    }
    monitor.complete();

    // A maximum of 10000 gives a step of 1000.
    let expected: Vec<String> = (1..=10).map(|p| (p * 10).to_string()).collect();
    assert_eq!(*reported.lock().unwrap(), expected);
    Ok(())
}
