//! restyle - Selective Formatting Driver
//!
//! restyle decides which files an external code formatter should touch, and
//! with which options. Selection is driven either by a flat exclude-pattern
//! list with one shared option list, or by a YAML rule document mapping
//! rule names to include patterns, a participation flag, and per-rule
//! options. When several rules match a file, the one declared last in the
//! document governs.
//!
//! ## Architecture
//!
//! - [`patterns`]: CODEOWNERS-style glob compilation and path normalization
//! - [`rules`]: the rule model and rule-document loading
//! - [`resolve`]: per-file decisions (rule mode and simple exclude mode)
//! - [`format`]: the external formatter seam
//! - [`input`]: flat option and exclude-list files

pub mod format;
pub mod input;
pub mod patterns;
pub mod resolve;
pub mod rules;

// Re-export commonly used items
pub use format::{FormatError, Formatter, FormatterCommand};
pub use patterns::{rooted_path, Pattern, PatternError};
pub use resolve::{resolve, resolve_simple, FileDecision};
pub use rules::{Rule, RuleError, RuleSet, DEFAULT_RULE_NAME};
