use anyhow::{Context, Result};
use ptree::{PrintConfig, TreeBuilder};
use std::io::Write;

use crate::font_type::FontType;
use crate::report::{ReportComparison, ScanReport};
use crate::stats::ScanStats;

/// Display name for a report's font type key
fn font_label(key: &str) -> String {
    key.parse::<FontType>()
        .map(|t| t.config().name.to_string())
        .unwrap_or_else(|_| key.to_string())
}

fn kib(bytes: f64) -> String {
    format!("{:.2}KB", bytes / 1024.0)
}

/// Write the summary of a single run
pub fn write_report_summary(
    writer: &mut impl Write,
    report: &ScanReport,
    stats: Option<&ScanStats>,
) -> Result<()> {
    writeln!(
        writer,
        "\n=== {} subset report ===",
        font_label(&report.font_type)
    )?;
    writeln!(writer, "Time: {}", report.timestamp)?;
    writeln!(writer, "\nStatistics:")?;
    writeln!(writer, "- Icons used: {}", report.stats.total_icons)?;
    writeln!(
        writer,
        "- Original size: {}",
        kib(report.stats.original_size as f64)
    )?;
    writeln!(writer, "- Subset size: {}", kib(report.stats.file_size as f64))?;
    writeln!(writer, "- Size reduction: {}", report.stats.compression_ratio)?;
    writeln!(writer, "- Files scanned: {}", report.stats.files_scanned)?;
    writeln!(writer, "- File types: {}", report.file_types.join(", "))?;

    if let Some(stats) = stats.filter(|s| !s.extension_counts.is_empty()) {
        writeln!(writer, "\nFiles by type ({} total):", stats.total_files)?;
        for (ext, count) in stats.by_frequency() {
            let ext_name = if ext.is_empty() { "[no extension]" } else { ext };
            writeln!(writer, "  {}: {} files", ext_name, count)?;
        }
    }

    writeln!(writer, "\nIcons used:")?;
    write_usage_tree(writer, report)?;
    Ok(())
}

/// Render icon usage as a tree, one branch per icon
fn write_usage_tree(writer: &mut impl Write, report: &ScanReport) -> Result<()> {
    let mut tree = TreeBuilder::new(format!("{} icons", report.icons.len()));
    for icon in &report.icons {
        tree.begin_child(icon.clone());
        match report.icon_usage.get(icon) {
            Some(files) => {
                for file in files {
                    tree.add_empty_child(file.clone());
                }
            }
            None => {
                tree.add_empty_child("(no file mentions this name)".to_string());
            }
        }
        tree.end_child();
    }

    ptree::write_tree_with(&tree.build(), writer, &PrintConfig::default())
        .context("Failed to write usage tree")
}

/// Write the difference between two runs
pub fn write_comparison(writer: &mut impl Write, comparison: &ReportComparison) -> Result<()> {
    writeln!(
        writer,
        "\n=== {} subset report comparison ===",
        font_label(&comparison.font_type)
    )?;
    writeln!(writer, "Period: {} -> {}", comparison.from, comparison.to)?;

    writeln!(writer, "\nIcon changes:")?;
    if !comparison.added.is_empty() {
        writeln!(writer, "+ Added: {}", comparison.added.join(", "))?;
    }
    if !comparison.removed.is_empty() {
        writeln!(writer, "- Removed: {}", comparison.removed.join(", "))?;
    }
    if comparison.added.is_empty() && comparison.removed.is_empty() {
        writeln!(writer, "  none ({} unchanged)", comparison.unchanged.len())?;
    }

    writeln!(writer, "\nSize change:")?;
    let direction = match comparison.size_change.signum() {
        1 => "Increased",
        -1 => "Decreased",
        _ => "Unchanged",
    };
    let percent = comparison
        .size_change_percent
        .map(|p| format!("{:.2}%", p))
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(
        writer,
        "{} {} ({})",
        direction,
        kib(comparison.size_change.unsigned_abs() as f64),
        percent
    )?;

    writeln!(writer, "\nIcon count change: {}", comparison.icon_count_change)?;

    if !comparison.newly_referenced.is_empty() {
        writeln!(
            writer,
            "Newly referenced: {}",
            comparison.newly_referenced.join(", ")
        )?;
    }
    if !comparison.no_longer_referenced.is_empty() {
        writeln!(
            writer,
            "No longer referenced: {}",
            comparison.no_longer_referenced.join(", ")
        )?;
    }
    Ok(())
}
