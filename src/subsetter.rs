use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::extractor::UsedIconSet;

#[derive(Debug, thiserror::Error)]
pub enum SubsetError {
    #[error("font file not found: {}", .0.display())]
    FontMissing(PathBuf),

    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Anything able to cut a font down to the glyphs for a set of icon names
pub trait Subsetter {
    fn subset(&self, font_path: &Path, icons: &UsedIconSet) -> Result<Vec<u8>>;
}

/// The fontTools `pyftsubset` command
#[derive(Debug, Clone)]
pub struct Pyftsubset {
    pub program: String,
    pub flavor: String,
}

impl Pyftsubset {
    pub fn new(program: impl Into<String>, flavor: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flavor: flavor.into(),
        }
    }
}

impl Subsetter for Pyftsubset {
    fn subset(&self, font_path: &Path, icons: &UsedIconSet) -> Result<Vec<u8>> {
        let output = tempfile::Builder::new()
            .prefix("icon-subset-")
            .suffix(&format!(".{}", self.flavor))
            .tempfile()
            .context("Failed to create temporary output file")?;

        let unicodes = codepoints(icons);
        log::debug!("Running {} with unicodes {}", self.program, unicodes);

        let result = Command::new(&self.program)
            .arg(font_path)
            .arg(format!("--unicodes={}", unicodes))
            .arg(format!("--flavor={}", self.flavor))
            .arg(format!("--output-file={}", output.path().display()))
            .output()
            .map_err(|source| SubsetError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(SubsetError::CommandFailed {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            }
            .into());
        }

        fs::read(output.path())
            .with_context(|| format!("Failed to read subset output {}", output.path().display()))
    }
}

/// Hex codepoints of every character used by the icon names, ascending and deduplicated.
///
/// Material Symbols resolve icon names through ligatures, so the subset needs the
/// glyphs for each letter of each name.
pub fn codepoints(icons: &UsedIconSet) -> String {
    let chars: BTreeSet<char> = icons.iter().flat_map(|name| name.chars()).collect();
    chars
        .into_iter()
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join(",")
}

/// Byte sizes before and after subsetting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetOutcome {
    pub original_size: u64,
    pub subset_size: u64,
}

/// Error out unless `font_path` is an existing regular file
pub fn ensure_font_exists(font_path: &Path) -> Result<(), SubsetError> {
    if font_path.is_file() {
        Ok(())
    } else {
        Err(SubsetError::FontMissing(font_path.to_path_buf()))
    }
}

/// Subset `font_path` into `output_path` keeping only `icons`
pub fn create_subset(
    subsetter: &dyn Subsetter,
    font_path: &Path,
    output_path: &Path,
    icons: &UsedIconSet,
) -> Result<SubsetOutcome> {
    ensure_font_exists(font_path)?;

    let original_size = fs::metadata(font_path)
        .with_context(|| format!("Failed to stat {}", font_path.display()))?
        .len();

    let bytes = subsetter.subset(font_path, icons)?;
    fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write subset font {}", output_path.display()))?;

    Ok(SubsetOutcome {
        original_size,
        subset_size: bytes.len() as u64,
    })
}
