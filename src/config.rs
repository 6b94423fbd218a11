use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::font_type::FontType;

/// Glob patterns for the template files that may reference icons
pub const SCAN_PATTERNS: &[&str] = &[
    "**/*.html",
    "**/*.aspx",
    "**/*.php",
    "**/*.jsx",
    "**/*.tsx",
    "**/*.vue",
    "**/*.cshtml",
    "**/*.razor",
];

/// Extensions that also go through the DOM pass
pub const MARKUP_EXTENSIONS: &[&str] = &["html", "aspx", "php", "cshtml", "razor"];

/// Dependency directory that is never scanned
pub const EXCLUDED_DIR: &str = "node_modules";

/// Container format requested from the subsetter
pub const DEFAULT_FLAVOR: &str = "woff2";

/// Locations of the webfont assets, all relative to the project root
#[derive(Debug, Clone)]
pub struct WebfontLayout {
    pub root: PathBuf,
    pub original_dir: PathBuf,
    pub subset_dir: PathBuf,
    pub reports_dir: PathBuf,
}

impl WebfontLayout {
    pub fn new(root: &Path) -> Self {
        let webfont = root.join("assets").join("webfont");
        Self {
            root: root.to_path_buf(),
            original_dir: webfont.join("original"),
            subset_dir: webfont.join("subset"),
            reports_dir: webfont.join("reports"),
        }
    }

    pub fn original_font(&self, font_type: FontType) -> PathBuf {
        self.original_dir.join(font_type.config().file)
    }

    pub fn subset_font(&self, font_type: FontType) -> PathBuf {
        self.subset_dir.join(font_type.config().file)
    }

    /// Create the original, subset and reports directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.original_dir, &self.subset_dir, &self.reports_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }
}
