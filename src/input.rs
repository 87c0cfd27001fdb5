//! Flat list files: formatter option files and exclude-pattern lists.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read a list file: one entry per line, surrounding whitespace trimmed,
/// blank lines and `#` comment lines skipped.
pub fn read_list_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read list file {}", path.display()))?;
    Ok(parse_list(&text))
}

/// Split list-file text into entries.
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
