//! Icon detection.
//!
//! Two independent passes look for elements carrying the font's marker class:
//! a line-oriented regex over the raw text, and a DOM query for markup files.
//! Each returns its own set, and callers merge them, so an icon seen by either
//! pass ends up in the result.

use anyhow::{Result, anyhow};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::MARKUP_EXTENSIONS;

/// Unique icon names found in a project
pub type UsedIconSet = BTreeSet<String>;

/// Build the regex matching `class="... <marker> ...">text` (or `className=` in JSX)
pub fn marker_regex(css_class: &str) -> Result<Regex> {
    let pattern = format!(
        r#"class(?:Name)?=["'].*?{}.*?["']\s*>([^<]+)"#,
        regex::escape(css_class)
    );
    Regex::new(&pattern).map_err(|e| anyhow!("Invalid marker pattern for {}: {}", css_class, e))
}

/// Regex pass: the text directly following any tag whose class attribute mentions the marker
pub fn regex_pass(content: &str, pattern: &Regex) -> UsedIconSet {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Structural pass: text of every element whose class list contains the marker
pub fn structural_pass(content: &str, css_class: &str) -> Result<UsedIconSet> {
    let selector = Selector::parse(&format!(".{}", css_class))
        .map_err(|e| anyhow!("Invalid selector for class {:?}: {}", css_class, e))?;
    let document = Html::parse_document(content);

    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// Whether the file also goes through the DOM pass
pub fn is_markup_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Run both passes over one file's content.
///
/// A failing structural pass is logged and the regex results are still returned.
pub fn extract_from_content(
    content: &str,
    css_class: &str,
    pattern: &Regex,
    markup: bool,
    origin: &Path,
) -> UsedIconSet {
    let mut icons = regex_pass(content, pattern);

    if markup {
        match structural_pass(content, css_class) {
            Ok(found) => icons.extend(found),
            Err(err) => log::warn!("Error while parsing {}: {:#}", origin.display(), err),
        }
    }

    icons
}

/// Collect the icons referenced across all `files`
pub fn extract_icons(files: &[PathBuf], css_class: &str) -> Result<UsedIconSet> {
    let pattern = marker_regex(css_class)?;
    let mut used = UsedIconSet::new();

    for path in files {
        // Legacy templates are not always UTF-8; icon names are ASCII either way
        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                log::warn!("Failed to read {}: {}", path.display(), err);
                continue;
            }
        };

        let found = extract_from_content(&content, css_class, &pattern, is_markup_file(path), path);
        if !found.is_empty() {
            log::debug!("{}: {} icon(s)", path.display(), found.len());
        }
        used.extend(found);
    }

    Ok(used)
}
