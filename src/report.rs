//! Usage reports: one JSON snapshot per subsetting run, and the diff between two of them.
//!
//! Reports are named `subset-report-<type>-<version>.json` where the version is a
//! fixed-width UTC timestamp (`YYYYMMDD-HHMMSS.mmm`), so names sort in creation
//! order across clock changes. The human-readable `timestamp` field stays in local
//! time. Older reports without such a token fall back to their modification time.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractor::UsedIconSet;
use crate::font_type::FontType;
use crate::stats::collect_stats;

const REPORT_PREFIX: &str = "subset-report-";
const VERSION_FORMAT: &str = "%Y%m%d-%H%M%S%.3f";
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_icons: usize,
    /// Subset font size in bytes
    pub file_size: u64,
    pub original_size: u64,
    /// Percentage saved, formatted as `"NN.NN%"`
    pub compression_ratio: String,
    pub files_scanned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub timestamp: String,
    pub version: String,
    pub font_type: String,
    pub font_name: String,
    pub stats: ReportStats,
    pub icons: Vec<String>,
    /// Icon name to the names of the files whose raw text contains it
    pub icon_usage: BTreeMap<String, Vec<String>>,
    pub file_types: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("cannot compare reports of different font types ({older} vs {newer})")]
    FontTypeMismatch { older: String, newer: String },
}

/// Difference between two reports of the same font type
#[derive(Debug, Clone, PartialEq)]
pub struct ReportComparison {
    pub font_type: String,
    pub from: String,
    pub to: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
    /// Subset size difference in bytes
    pub size_change: i64,
    /// `None` when the older subset was empty
    pub size_change_percent: Option<f64>,
    pub icon_count_change: i64,
    /// Icons with file usage in the newer report only
    pub newly_referenced: Vec<String>,
    /// Icons with file usage in the older report only
    pub no_longer_referenced: Vec<String>,
}

/// `(1 - subset / original) * 100`, zero for an empty original
pub fn compression_ratio(original_size: u64, subset_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (1.0 - subset_size as f64 / original_size as f64) * 100.0
}

/// Map each icon to the files whose content contains its name.
///
/// This is plain substring matching on the raw text, so an icon named `home`
/// is also attributed to a file that only mentions `homepage`.
pub fn collect_icon_usage(
    used_icons: &UsedIconSet,
    scanned_files: &[PathBuf],
) -> BTreeMap<String, Vec<String>> {
    let mut usage: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for path in scanned_files {
        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                log::warn!("Failed to re-read {}: {}", path.display(), err);
                continue;
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        for icon in used_icons.iter().filter(|icon| content.contains(icon.as_str())) {
            usage.entry(icon.clone()).or_default().push(file_name.clone());
        }
    }

    usage
}

/// Build the report for one run, stamped with `now`.
///
/// The version token is taken from the UTC instant, the display timestamp from
/// its local-time rendering.
pub fn build_report(
    font_type: FontType,
    used_icons: &UsedIconSet,
    scanned_files: &[PathBuf],
    original_size: u64,
    subset_size: u64,
    now: DateTime<Utc>,
) -> ScanReport {
    let stats = collect_stats(scanned_files);

    ScanReport {
        timestamp: now.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
        version: now.format(VERSION_FORMAT).to_string(),
        font_type: font_type.key().to_string(),
        font_name: font_type.config().file.to_string(),
        stats: ReportStats {
            total_icons: used_icons.len(),
            file_size: subset_size,
            original_size,
            compression_ratio: format!(
                "{:.2}%",
                compression_ratio(original_size, subset_size)
            ),
            files_scanned: scanned_files.len(),
        },
        icons: used_icons.iter().cloned().collect(),
        icon_usage: collect_icon_usage(used_icons, scanned_files),
        file_types: stats.file_types(),
    }
}

pub fn report_file_name(font_type: &str, version: &str) -> String {
    format!("{}{}-{}.json", REPORT_PREFIX, font_type, version)
}

/// Build the report and write it to `reports_dir`, returning it with its path
pub fn generate(
    reports_dir: &Path,
    font_type: FontType,
    used_icons: &UsedIconSet,
    scanned_files: &[PathBuf],
    original_size: u64,
    subset_size: u64,
) -> Result<(ScanReport, PathBuf)> {
    let mut now = Utc::now();
    // Keep versions unique within the directory
    while reports_dir
        .join(report_file_name(font_type.key(), &now.format(VERSION_FORMAT).to_string()))
        .exists()
    {
        now += Duration::milliseconds(1);
    }

    let report = build_report(
        font_type,
        used_icons,
        scanned_files,
        original_size,
        subset_size,
        now,
    );
    let path = write_report(reports_dir, &report)?;
    Ok((report, path))
}

pub fn write_report(reports_dir: &Path, report: &ScanReport) -> Result<PathBuf> {
    let path = reports_dir.join(report_file_name(&report.font_type, &report.version));
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(&path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
    log::info!("Report written to {}", path.display());
    Ok(path)
}

pub fn load_report(path: &Path) -> Result<ScanReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse report {}", path.display()))
}

/// Creation instant of a report: the version token in its name, else its mtime
fn report_sort_key(path: &Path, token: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(token, VERSION_FORMAT) {
        return Some(parsed);
    }
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified).naive_utc())
}

/// Report files for `font_type`, newest first
pub fn list_reports(reports_dir: &Path, font_type: FontType) -> Result<Vec<PathBuf>> {
    let prefix = format!("{}{}-", REPORT_PREFIX, font_type.key());
    let entries = match fs::read_dir(reports_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to list reports in {}", reports_dir.display())
            });
        }
    };

    let mut reports = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read reports directory entry")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(token) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".json"))
        else {
            continue;
        };
        let path = entry.path();
        let key = report_sort_key(&path, token);
        reports.push((key, name, path));
    }

    reports.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    Ok(reports.into_iter().map(|(_, _, path)| path).collect())
}

/// The two most recent reports as `(older, newer)`, or `None` with fewer than two
pub fn load_latest_pair(
    reports_dir: &Path,
    font_type: FontType,
) -> Result<Option<(ScanReport, ScanReport)>> {
    let reports = list_reports(reports_dir, font_type)?;
    match reports.as_slice() {
        [newest, previous, ..] => Ok(Some((load_report(previous)?, load_report(newest)?))),
        _ => Ok(None),
    }
}

pub fn compare(older: &ScanReport, newer: &ScanReport) -> Result<ReportComparison, ReportError> {
    if older.font_type != newer.font_type {
        return Err(ReportError::FontTypeMismatch {
            older: older.font_type.clone(),
            newer: newer.font_type.clone(),
        });
    }

    let old_icons: HashSet<&str> = older.icons.iter().map(String::as_str).collect();
    let new_icons: HashSet<&str> = newer.icons.iter().map(String::as_str).collect();

    let (unchanged, added): (Vec<String>, Vec<String>) = newer
        .icons
        .iter()
        .cloned()
        .partition(|icon| old_icons.contains(icon.as_str()));
    let removed = older
        .icons
        .iter()
        .filter(|icon| !new_icons.contains(icon.as_str()))
        .cloned()
        .collect();

    let size_change = newer.stats.file_size as i64 - older.stats.file_size as i64;
    let size_change_percent = if older.stats.file_size == 0 {
        None
    } else {
        Some(size_change as f64 / older.stats.file_size as f64 * 100.0)
    };

    Ok(ReportComparison {
        font_type: newer.font_type.clone(),
        from: older.timestamp.clone(),
        to: newer.timestamp.clone(),
        added,
        removed,
        unchanged,
        size_change,
        size_change_percent,
        icon_count_change: newer.stats.total_icons as i64 - older.stats.total_icons as i64,
        newly_referenced: newer
            .icon_usage
            .keys()
            .filter(|icon| !older.icon_usage.contains_key(*icon))
            .cloned()
            .collect(),
        no_longer_referenced: older
            .icon_usage
            .keys()
            .filter(|icon| !newer.icon_usage.contains_key(*icon))
            .cloned()
            .collect(),
    })
}
