//! Drives the built binary end to end, without a real subsetting tool.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_icon-subsetter"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute icon-subsetter")
}

fn write_report(dir: &Path, version: &str, icons: &[&str], size: u64) {
    let reports = dir.join("assets/webfont/reports");
    fs::create_dir_all(&reports).unwrap();
    let usage: serde_json::Map<String, serde_json::Value> = icons
        .iter()
        .map(|i| (i.to_string(), serde_json::json!(["index.html"])))
        .collect();
    let report = serde_json::json!({
        "timestamp": version,
        "version": version,
        "fontType": "rounded",
        "fontName": "MaterialSymbolsRounded.woff2",
        "stats": {
            "totalIcons": icons.len(),
            "fileSize": size,
            "originalSize": 100000,
            "compressionRatio": "0.00%",
            "filesScanned": 1
        },
        "icons": icons,
        "iconUsage": usage,
        "fileTypes": [".html"]
    });
    fs::write(
        reports.join(format!("subset-report-rounded-{}.json", version)),
        serde_json::to_string_pretty(&report).unwrap(),
    )
    .unwrap();
}

#[test]
fn invalid_type_lists_valid_options_and_exits_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_in(tmp.path(), &["--type=filled"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("filled"), "stderr: {}", stderr);
    assert!(stderr.contains("rounded, outlined, sharp"), "stderr: {}", stderr);
    assert!(!tmp.path().join("assets").exists());
}

#[test]
fn missing_font_is_logged_with_path() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_in(tmp.path(), &["--type=outlined"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("MaterialSymbolsOutlined.woff2"), "stderr: {}", stderr);
    assert!(tmp.path().join("assets/webfont/subset").is_dir());
}

#[test]
fn compare_without_history_asks_for_more_reports() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(tmp.path(), "20240101-000000.000", &["home"], 10);

    let output = run_in(tmp.path(), &["--compare"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("At least two Rounded reports"), "stdout: {}", stdout);
}

#[test]
fn compare_prints_icon_delta() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(tmp.path(), "20240101-000000.000", &["settings", "menu"], 2048);
    write_report(tmp.path(), "20240201-000000.000", &["settings", "home"], 3072);

    let output = run_in(tmp.path(), &["--compare", "--type=rounded"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("+ Added: home"), "stdout: {}", stdout);
    assert!(stdout.contains("- Removed: menu"), "stdout: {}", stdout);
    assert!(stdout.contains("Increased 1.00KB (50.00%)"), "stdout: {}", stdout);
}

#[test]
fn failing_subsetter_still_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let original = tmp.path().join("assets/webfont/original");
    fs::create_dir_all(&original).unwrap();
    fs::write(original.join("MaterialSymbolsRounded.woff2"), b"font").unwrap();
    fs::write(
        tmp.path().join("index.html"),
        "<span class=\"ms-round\">home</span>",
    )
    .unwrap();

    let output = run_in(
        tmp.path(),
        &["--subsetter", "definitely-not-a-real-subsetter-binary"],
    );
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to start"), "stderr: {}", stderr);
    assert!(!tmp.path().join("assets/webfont/subset/MaterialSymbolsRounded.woff2").exists());
}
