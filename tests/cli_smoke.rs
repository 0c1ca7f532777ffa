use std::{
    path::Path,
    process::{Command, Output},
};

use serde_json::Value;

const BIN: &str = env!("CARGO_BIN_EXE_reportdeck");

fn setup_fixture(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(
        dir.join("outage-postmortem.md"),
        "---\ntitle: Outage Postmortem\nauthor: Alice\ntags: [infra]\n---\n# Timeline\n",
    )?;
    std::fs::write(
        dir.join("billing-bug.md"),
        "---\ntitle: Billing Bug\nauthor: Bob\ntags: [billing, urgent]\n---\n",
    )?;
    std::fs::write(dir.join("2024-report.md"), "No front-matter here.\n")?;
    Ok(())
}

fn reportdeck(source_dir: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new(BIN)
        .args(args)
        .arg("--source-dir")
        .arg(source_dir)
        .arg("--quiet")
        .env_remove("REPORTDECK_LOG")
        .env_remove("REPORTDECK_REVALIDATE")
        .output()
}

fn stdout_json(output: &Output) -> Result<Value, Box<dyn std::error::Error>> {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn search_json_filters_by_tag() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    setup_fixture(tmp.path())?;

    let json = stdout_json(&reportdeck(tmp.path(), &["search", "infra", "--json"])?)?;

    assert_eq!(json["resultCount"], 1);
    assert_eq!(json["results"][0]["title"], "Outage Postmortem");
    assert_eq!(json["results"][0]["slug"], "outage-postmortem");
    Ok(())
}

#[test]
fn search_human_shows_empty_state() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    setup_fixture(tmp.path())?;

    let output = reportdeck(tmp.path(), &["search", "zzz"])?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?.trim(),
        "No reports found matching your search."
    );
    Ok(())
}

#[test]
fn rebuild_prints_reports_and_window() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    setup_fixture(tmp.path())?;

    let json = stdout_json(&reportdeck(tmp.path(), &["rebuild"])?)?;

    assert_eq!(json["revalidate"], 3600);
    let reports = json["reports"].as_array().expect("reports array");
    assert_eq!(reports.len(), 3);

    // Local listings come back in name order.
    assert_eq!(reports[0]["slug"], "2024-report");
    assert_eq!(reports[0]["title"], "Untitled");
    assert_eq!(reports[0]["author"], "Anonymous");
    assert_eq!(reports[0]["tags"], serde_json::json!([]));
    Ok(())
}

#[test]
fn missing_source_lists_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;

    let output = reportdeck(&tmp.path().join("does-not-exist"), &["list"])?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?.trim(),
        "No reports available."
    );
    Ok(())
}

#[test]
fn no_source_configured_fails() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(BIN)
        .args(["list", "--quiet"])
        .env_remove("REPORTDECK_REPO")
        .env_remove("REPORTDECK_SOURCE_DIR")
        .output()?;

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("no report source configured")
    );
    Ok(())
}
