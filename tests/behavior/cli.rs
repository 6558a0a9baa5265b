use crate::*;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use progmon::error::Result;
use progmon::storage::StorageClient;
use tokio::fs;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(trials!(
        test_simulate_prints_adaptive_sequence,
        test_simulate_json_output,
        test_simulate_passes_reset_between_runs,
        test_simulate_constant_step_with_percent,
        test_simulate_count_above_maximum_fails,
        test_inverted_step_range_fails,
        test_step_range_from_env
    ));

    tests.extend(async_trials!(
        client,
        e2e_test_put_then_get_round_trip,
        e2e_test_put_directory_requires_recursive,
        e2e_test_get_missing_path_fails
    ));
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn test_simulate_prints_adaptive_sequence() -> Result<()> {
    let output = progmon_cmd()
        .args(["simulate", "--count", "10000"])
        .assert()
        .success()
        .get_output()
        .clone();

    let expected: Vec<String> = [
        10, 20, 30, 40, 50, 60, 72, 84, 96, 114, 132, 156, 186, 222, 264, 312, 372, 444, 528, 630,
        756, 906, 1086, 1302, 1560, 1872, 2244, 2688, 3222, 3864, 4632, 5556, 6000, 7000, 8000,
        9000, 10000,
    ]
    .iter()
    .map(u64::to_string)
    .collect();
    assert_eq!(stdout_lines(&output), expected);
    Ok(())
}

fn test_simulate_json_output() -> Result<()> {
    let output = progmon_cmd()
        .args(["simulate", "--count", "50", "--maximum", "50", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .clone();

    let events: Vec<serde_json::Value> = stdout_lines(&output)
        .iter()
        .map(|line| serde_json::from_str(line))
        .collect::<std::result::Result<_, _>>()?;

    let progress: Vec<u64> = events
        .iter()
        .map(|e| e["progress"].as_u64().unwrap())
        .collect();
    assert_eq!(progress, vec![10, 20, 30, 40, 50]);
    assert!(events.iter().all(|e| e["maximum"].as_u64() == Some(50)));
    Ok(())
}

fn test_simulate_passes_reset_between_runs() -> Result<()> {
    let output = progmon_cmd()
        .args(["simulate", "--count", "100", "--maximum", "100", "--passes", "2"])
        .assert()
        .success()
        .get_output()
        .clone();

    // Reset drops the step back to the minimum until the first publish of the pass.
    let expected = [
        "20/100", "40/100", "60/100", "80/100", "100/100", "10/100", "20/100", "40/100", "60/100",
        "80/100", "100/100",
    ];
    assert_eq!(stdout_lines(&output), expected);
    Ok(())
}

fn test_simulate_constant_step_with_percent() -> Result<()> {
    progmon_cmd()
        .args([
            "simulate",
            "--count",
            "4",
            "--maximum",
            "4",
            "--step",
            "2",
            "--percent",
        ])
        .assert()
        .success()
        .stdout("50%\n2/4\n100%\n4/4\n");
    Ok(())
}

fn test_simulate_count_above_maximum_fails() -> Result<()> {
    progmon_cmd()
        .args(["simulate", "--count", "101", "--maximum", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count (101) > maximum (100)"));
    Ok(())
}

fn test_inverted_step_range_fails() -> Result<()> {
    progmon_cmd()
        .args(["--min-step", "10", "--max-step", "1", "simulate", "--count", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxStepSize < minStepSize"));
    Ok(())
}

fn test_step_range_from_env() -> Result<()> {
    progmon_cmd()
        .env("PROGMON_MIN_STEP", "3")
        .env("PROGMON_MAX_STEP", "3")
        .args(["simulate", "--count", "10"])
        .assert()
        .success()
        .stdout("3\n6\n9\n10\n");
    Ok(())
}

async fn e2e_test_put_then_get_round_trip(client: StorageClient) -> Result<()> {
    let local_dir = TEST_FIXTURE.new_local_dir();
    let (local_file, content) = TEST_FIXTURE.new_local_file(&local_dir, "payload.bin", 1..32 * 1024);
    let remote_dir = TEST_FIXTURE.new_remote_dir();

    progmon_cmd()
        .arg("put")
        .arg(&local_file)
        .arg(&remote_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded:").and(predicate::str::contains("100%")));

    let remote_file = format!("{remote_dir}payload.bin");
    let stored = client.operator().read(&remote_file).await?;
    assert_eq!(stored.to_vec(), content);

    let download_dir = TEST_FIXTURE.new_local_dir();
    progmon_cmd()
        .arg("get")
        .arg(&remote_file)
        .arg(&download_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded:").and(predicate::str::contains("100%")));

    let actual = fs::read(download_dir.join("payload.bin")).await?;
    assert_eq!(actual, content);
    Ok(())
}

async fn e2e_test_put_directory_requires_recursive(client: StorageClient) -> Result<()> {
    let local_dir = TEST_FIXTURE.new_local_dir();
    TEST_FIXTURE.new_local_file(&local_dir, "a.txt", 1..256);
    let remote_dir = TEST_FIXTURE.new_remote_dir();

    progmon_cmd()
        .arg("put")
        .arg(&local_dir)
        .arg(&remote_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use -R to upload directories"));

    assert!(!client.operator().exists(&remote_dir).await?);

    progmon_cmd()
        .arg("put")
        .arg("-R")
        .arg(&local_dir)
        .arg(&remote_dir)
        .assert()
        .success();

    assert!(client.operator().exists(&format!("{remote_dir}a.txt")).await?);
    Ok(())
}

async fn e2e_test_get_missing_path_fails(_client: StorageClient) -> Result<()> {
    let remote = format!("{}absent.txt", TEST_FIXTURE.new_remote_dir());

    progmon_cmd()
        .arg("get")
        .arg(&remote)
        .arg(TEST_FIXTURE.new_local_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to download"));
    Ok(())
}
