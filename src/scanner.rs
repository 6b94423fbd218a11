use glob::{MatchOptions, Pattern};
use ignore::{Walk, WalkBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::EXCLUDED_DIR;

/// Find every file under `root` matching at least one of `patterns`.
///
/// Matching is done on the path relative to `root`, so `**/*.html` also matches
/// `index.html` at the top level. The dependency directory and hidden entries are
/// never descended into, and binary files are dropped. A missing root or a project
/// without templates simply yields an empty list.
pub fn find_files(root: &Path, patterns: &[&str], exclude_patterns: &[String]) -> Vec<PathBuf> {
    let includes = compile_patterns(patterns.iter().copied());
    let excludes = compile_patterns(exclude_patterns.iter().map(String::as_str));

    let mut files = BTreeSet::new();
    for result in build_walker(root) {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Failed to access entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let relative = relative_slash_path(path, root);
        if !matches_any(&includes, &relative) || matches_any(&excludes, &relative) {
            continue;
        }

        if is_binary_file(path) {
            log::debug!("Skipping binary file {}", path.display());
            continue;
        }

        files.insert(path.to_path_buf());
    }

    files.into_iter().collect()
}

/// Build a walker that skips hidden entries and the dependency directory
fn build_walker(root: &Path) -> Walk {
    let mut builder = WalkBuilder::new(root);

    // Only our own rules apply, .gitignore files are not consulted
    builder.standard_filters(false).hidden(true);

    builder.filter_entry(|entry| entry.file_name() != EXCLUDED_DIR);

    builder.build()
}

fn compile_patterns<'a>(patterns: impl Iterator<Item = &'a str>) -> Vec<Pattern> {
    patterns
        .filter_map(|raw| match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                log::warn!("Ignoring invalid glob pattern {:?}: {}", raw, err);
                None
            }
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], relative: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(relative, options))
}

/// Path relative to `root` with `/` separators on every platform
fn relative_slash_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is binary
fn is_binary_file(path: &Path) -> bool {
    // Use the infer crate to detect file type; markup it recognises is still text
    if let Ok(buffer) = std::fs::read(path) {
        if infer::get(&buffer).is_some_and(|t| t.matcher_type() != infer::MatcherType::Text) {
            return true;
        }

        // Also check for null bytes which often indicate binary files
        return buffer.iter().take(8000).any(|byte| *byte == 0);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SCAN_PATTERNS;
    use std::fs;

    fn touch(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files.iter().map(|f| relative_slash_path(f, root)).collect()
    }

    #[test]
    fn finds_templates_at_any_depth() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "index.html", b"<p></p>");
        touch(tmp.path(), "pages/about.php", b"<?php ?>");
        touch(tmp.path(), "src/components/Nav.tsx", b"export {}");
        touch(tmp.path(), "src/App.vue", b"<template></template>");
        touch(tmp.path(), "styles/site.css", b"body {}");
        touch(tmp.path(), "README.md", b"# readme");

        let files = find_files(tmp.path(), SCAN_PATTERNS, &[]);
        assert_eq!(
            names(tmp.path(), &files),
            vec![
                "index.html",
                "pages/about.php",
                "src/App.vue",
                "src/components/Nav.tsx"
            ]
        );
    }

    #[test]
    fn skips_dependency_directory() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "node_modules/pkg/index.html", b"<p></p>");
        touch(tmp.path(), "web/node_modules/lib/demo.html", b"<p></p>");
        touch(tmp.path(), "web/home.html", b"<p></p>");

        let files = find_files(tmp.path(), SCAN_PATTERNS, &[]);
        assert_eq!(names(tmp.path(), &files), vec!["web/home.html"]);
    }

    #[test]
    fn overlapping_patterns_do_not_duplicate() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a/page.html", b"<p></p>");

        let files = find_files(tmp.path(), &["**/*.html", "a/*.html", "**/page.*"], &[]);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn applies_extra_exclusions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "dist/index.html", b"<p></p>");
        touch(tmp.path(), "src/index.html", b"<p></p>");

        let files = find_files(tmp.path(), SCAN_PATTERNS, &["dist/**".to_string()]);
        assert_eq!(names(tmp.path(), &files), vec!["src/index.html"]);
    }

    #[test]
    fn drops_binary_files() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "logo.html", &[0x89, b'P', b'N', b'G', 0, 0, 0, 1]);
        touch(tmp.path(), "ok.html", b"<span></span>");

        let files = find_files(tmp.path(), SCAN_PATTERNS, &[]);
        assert_eq!(names(tmp.path(), &files), vec!["ok.html"]);
    }

    #[test]
    fn recognised_markup_is_not_binary() {
        let tmp = tempfile::tempdir().unwrap();
        touch(
            tmp.path(),
            "page.html",
            b"<!DOCTYPE html>\n<html><body><span class=\"ms-round\">home</span></body></html>",
        );
        touch(tmp.path(), "bare.html", b"<html><p></p></html>");
        touch(tmp.path(), "icon.html", &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);

        let files = find_files(tmp.path(), SCAN_PATTERNS, &[]);
        assert_eq!(names(tmp.path(), &files), vec!["bare.html", "page.html"]);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let files = find_files(&tmp.path().join("nope"), SCAN_PATTERNS, &[]);
        assert!(files.is_empty());
    }
}
