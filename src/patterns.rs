//! Glob pattern compilation and path normalization.
//!
//! Patterns use CODEOWNERS-style semantics: a pattern without a leading `/`
//! matches at any depth, a pattern with a trailing `/` matches the whole
//! subtree of that directory, `*` never crosses a `/`, and `**` is only
//! valid as a `**/` segment. Compiled patterns are matched against "rooted"
//! paths produced by [`rooted_path`].

use regex::Regex;
use std::path::{Component, Path};
use thiserror::Error;

/// Pattern compilation failure. Raised at load time, never at match time.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern '{pattern}': '**' must be followed by '/'")]
    BareDoubleStar { pattern: String },
    #[error("invalid pattern '{pattern}': {source}")]
    BadRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled glob pattern. Immutable once built.
#[derive(Debug, Clone)]
pub struct Pattern {
    glob: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a CODEOWNERS-style glob into a matcher.
    pub fn new(glob: &str) -> Result<Self, PatternError> {
        let source = glob_to_regex(glob)?;
        let regex = Regex::new(&source).map_err(|source| PatternError::BadRegex {
            pattern: glob.to_string(),
            source,
        })?;
        Ok(Pattern {
            glob: glob.to_string(),
            regex,
        })
    }

    /// The pattern that matches every path, used as the default include set.
    pub fn match_all() -> Self {
        Pattern::new("*").expect("the match-all pattern is valid")
    }

    /// Match against a rooted path (see [`rooted_path`]).
    pub fn matches(&self, rooted: &str) -> bool {
        self.regex.is_match(rooted)
    }

    /// The original glob string, for diagnostics.
    pub fn glob(&self) -> &str {
        &self.glob
    }
}

/// Translate one glob into a regular expression source string.
///
/// Single pass over the characters of the normalized pattern: `**/` becomes
/// an optional run of path segments, `*` matches within one segment, `?`
/// matches one character, and everything else is literal. A `**` that is not
/// followed by `/` is rejected.
fn glob_to_regex(glob: &str) -> Result<String, PatternError> {
    // Normalize: floating patterns match at any depth, directory patterns
    // cover their whole subtree.
    let mut pattern = String::new();
    if !glob.starts_with('/') {
        pattern.push_str("/**/");
    }
    pattern.push_str(glob);
    if glob.ends_with('/') {
        pattern.push_str("**/*");
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    if pattern.starts_with('/') {
        out.push('^');
    }

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    // Zero or more whole path segments.
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    return Err(PatternError::BareDoubleStar {
                        pattern: glob.to_string(),
                    });
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push('.');
                i += 1;
            }
            c => {
                if is_regex_meta(c) {
                    out.push('\\');
                }
                out.push(c);
                i += 1;
            }
        }
    }
    out.push('$');
    Ok(out)
}

fn is_regex_meta(c: char) -> bool {
    matches!(
        c,
        '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
    )
}

/// Canonicalize a candidate file path into the form compiled patterns match
/// against: `.` and `..` segments resolved lexically, platform separators
/// converted to `/`, and a `/` prefix so the path reads as rooted at the
/// directory where the tool was invoked.
///
/// Purely lexical: no filesystem access, and malformed input is passed
/// through best-effort rather than rejected.
pub fn rooted_path(path: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut absolute = false;

    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => match segments.last() {
                Some(last) if last != ".." => {
                    segments.pop();
                }
                // Cannot step above the root of an absolute path.
                _ if absolute => {}
                _ => segments.push("..".to_string()),
            },
            Component::RootDir | Component::Prefix(_) => {
                segments.clear();
                absolute = true;
            }
        }
    }

    format!("/{}", segments.join("/"))
}
