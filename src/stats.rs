use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Statistics about the scanned template files
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    /// Total number of files
    pub total_files: usize,

    /// Count of files by extension (with leading dot, empty when none)
    pub extension_counts: BTreeMap<String, usize>,
}

impl ScanStats {
    /// Distinct extensions, as stored in the report's `fileTypes`
    pub fn file_types(&self) -> Vec<String> {
        self.extension_counts.keys().cloned().collect()
    }

    /// Extensions ordered by file count, most frequent first
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut extensions: Vec<_> = self
            .extension_counts
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        extensions.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        extensions
    }
}

/// Collect statistics about the given files
pub fn collect_stats(file_paths: &[PathBuf]) -> ScanStats {
    let mut stats = ScanStats {
        total_files: file_paths.len(),
        ..Default::default()
    };

    for path in file_paths {
        *stats.extension_counts.entry(dotted_extension(path)).or_insert(0) += 1;
    }

    stats
}

/// Extension in `.ext` form, or an empty string
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn counts_files_per_extension() {
        let stats = collect_stats(&paths(&["a.html", "b/c.html", "d.vue", "e.tsx", "f.html"]));
        assert_eq!(stats.total_files, 5);
        assert_eq!(stats.extension_counts[".html"], 3);
        assert_eq!(stats.file_types(), vec![".html", ".tsx", ".vue"]);
        assert_eq!(
            stats.by_frequency(),
            vec![(".html", 3), (".tsx", 1), (".vue", 1)]
        );
    }

    #[test]
    fn extensionless_files_map_to_empty_string() {
        assert_eq!(dotted_extension(Path::new("Makefile")), "");
        assert_eq!(collect_stats(&paths(&["x.php", "y.php"])).file_types(), vec![".php"]);
    }

    #[test]
    fn empty_input() {
        let stats = collect_stats(&[]);
        assert_eq!(stats, ScanStats::default());
    }
}
