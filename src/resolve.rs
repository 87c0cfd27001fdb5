//! Rule resolution: one decision per candidate file.
//!
//! The engine is a pure function of its inputs: patterns and rules are
//! compiled up front, then every candidate file is mapped to at most one
//! [`FileDecision`]. No I/O happens here and no shared state is touched, so
//! callers may drive the iterators however they like.

use crate::patterns::{rooted_path, Pattern, PatternError};
use crate::rules::RuleSet;

/// The resolved outcome for one file: process it with these options.
/// Files excluded by the governing rule produce no decision at all.
///
/// `filename` is the caller's original string, not the normalized form, so
/// downstream I/O and diagnostics refer to paths the caller recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDecision {
    pub filename: String,
    pub options: Vec<String>,
}

/// Resolve every candidate file against a rule set, lazily, preserving the
/// input file order. A file whose governing rule has `check: false` is
/// skipped entirely.
pub fn resolve<'a>(
    files: &'a [String],
    rule_set: &'a RuleSet,
) -> impl Iterator<Item = FileDecision> + 'a {
    files.iter().filter_map(move |file| {
        let rule = rule_set.select(&rooted_path(file));
        if !rule.check {
            return None;
        }
        Some(FileDecision {
            filename: file.clone(),
            options: rule.options.clone(),
        })
    })
}

/// Degenerate single-rule mode: skip files matching any exclude pattern,
/// give every other file the shared option list.
///
/// Behaves exactly like [`resolve`] over a rule set holding one
/// `check: false` rule whose include set is the exclude patterns, with the
/// shared options on the default rule. Pattern compilation errors surface
/// here, before any file is evaluated.
pub fn resolve_simple<'a>(
    files: &'a [String],
    exclude_patterns: &[String],
    shared_options: &'a [String],
) -> Result<impl Iterator<Item = FileDecision> + 'a, PatternError> {
    let excludes = exclude_patterns
        .iter()
        .map(|glob| Pattern::new(glob))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(files.iter().filter_map(move |file| {
        let rooted = rooted_path(file);
        if excludes.iter().any(|pattern| pattern.matches(&rooted)) {
            return None;
        }
        Some(FileDecision {
            filename: file.clone(),
            options: shared_options.to_vec(),
        })
    }))
}
