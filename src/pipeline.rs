use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{SCAN_PATTERNS, WebfontLayout};
use crate::display::{write_comparison, write_report_summary};
use crate::extractor::extract_icons;
use crate::font_type::FontType;
use crate::report::{self, ReportComparison, ScanReport};
use crate::scanner::find_files;
use crate::stats::collect_stats;
use crate::subsetter::{Subsetter, create_subset, ensure_font_exists};

/// Everything one invocation needs to know
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub font_type: String,
    pub compare: bool,
    pub exclude: Vec<String>,
}

/// Validate the font type, prepare directories and run the selected flow
pub fn run(options: &RunOptions, subsetter: &dyn Subsetter, out: &mut impl Write) -> Result<()> {
    let font_type: FontType = options.font_type.parse()?;

    let layout = WebfontLayout::new(&options.root);
    layout.ensure_directories()?;

    if options.compare {
        compare_latest(&layout, font_type, out)?;
    } else {
        subset_and_report(&layout, font_type, &options.exclude, subsetter, out)?;
    }
    Ok(())
}

/// Scan the project, subset the font and write the usage report
pub fn subset_and_report(
    layout: &WebfontLayout,
    font_type: FontType,
    exclude: &[String],
    subsetter: &dyn Subsetter,
    out: &mut impl Write,
) -> Result<Option<ScanReport>> {
    let config = font_type.config();
    let font_path = layout.original_font(font_type);
    let output_path = layout.subset_font(font_type);

    // Fail before scanning the project, not after the whole walk
    ensure_font_exists(&font_path)?;

    let files = find_files(&layout.root, SCAN_PATTERNS, exclude);
    log::info!("Scanning {} file(s) for .{}", files.len(), config.css_class);

    let used_icons = extract_icons(&files, config.css_class)?;
    if used_icons.is_empty() {
        writeln!(out, "No icons using the {} font were found!", config.name)?;
        return Ok(None);
    }
    log::info!("Found {} unique icon(s)", used_icons.len());

    let outcome = create_subset(subsetter, &font_path, &output_path, &used_icons)?;
    log::info!(
        "Subset written to {} ({} -> {} bytes)",
        output_path.display(),
        outcome.original_size,
        outcome.subset_size
    );

    let (report, _) = report::generate(
        &layout.reports_dir,
        font_type,
        &used_icons,
        &files,
        outcome.original_size,
        outcome.subset_size,
    )?;
    write_report_summary(out, &report, Some(&collect_stats(&files)))?;

    Ok(Some(report))
}

/// Compare the two latest reports for `font_type`
pub fn compare_latest(
    layout: &WebfontLayout,
    font_type: FontType,
    out: &mut impl Write,
) -> Result<Option<ReportComparison>> {
    let Some((older, newer)) = report::load_latest_pair(&layout.reports_dir, font_type)? else {
        writeln!(
            out,
            "At least two {} reports are needed for a comparison.",
            font_type.config().name
        )?;
        return Ok(None);
    };

    let comparison = report::compare(&older, &newer)?;
    write_comparison(out, &comparison)?;
    Ok(Some(comparison))
}
