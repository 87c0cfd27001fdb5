//! Rule model and rule-document loading.
//!
//! A rule document is a YAML mapping from rule name to an entry with up to
//! three keys: `options` (one string of formatter options), `check`
//! (boolean, whether matching files are processed at all), and `include`
//! (list of glob patterns). An entry named `DEFAULT` overrides the built-in
//! default rule and seeds every other entry; any key an entry omits is
//! inherited from the default, key by key.
//!
//! Declaration order of the rules is significant: when several rules match
//! a file, the one declared last governs (see [`RuleSet::select`]).

use crate::patterns::{Pattern, PatternError};
use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

/// Name of the document entry that overrides the built-in default rule.
pub const DEFAULT_RULE_NAME: &str = "DEFAULT";

/// Rule-document load failure. Fatal: no partial rule set is ever returned.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unexpected key '{key}' in rule {rule}, expected one of: options, check, include")]
    UnknownKey { rule: String, key: String },
    #[error("unexpected value of '{key}' in rule {rule}, expected {expected}")]
    BadValue {
        rule: String,
        key: &'static str,
        expected: &'static str,
    },
    #[error("rule {rule} must be a mapping of rule keys")]
    EntryNotAMapping { rule: String },
    #[error("rule names must be strings, found {found}")]
    BadRuleName { found: String },
    #[error("rule document must be a mapping from rule name to rule entry")]
    NotAMapping,
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("invalid rule document: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// One formatting policy: which files it covers, whether they are processed,
/// and the formatter options they receive. Immutable after construction.
///
/// `options` keeps the declared order exactly; later options may override
/// earlier ones inside the external formatter, so the sequence is never
/// reordered or deduplicated.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub check: bool,
    pub include: Vec<Pattern>,
    pub options: Vec<String>,
}

impl Rule {
    /// The hard-coded default: process everything, with no options.
    pub fn built_in_default() -> Rule {
        Rule {
            name: DEFAULT_RULE_NAME.to_string(),
            check: true,
            include: vec![Pattern::match_all()],
            options: Vec::new(),
        }
    }

    /// True if any include pattern matches the rooted path.
    pub fn matches(&self, rooted: &str) -> bool {
        self.include.iter().any(|pattern| pattern.matches(rooted))
    }

    /// Build a rule from one document entry, inheriting every absent key
    /// from `defaults`.
    fn from_entry(name: &str, entry: &Value, defaults: &Rule) -> Result<Rule, RuleError> {
        let mapping = entry
            .as_mapping()
            .ok_or_else(|| RuleError::EntryNotAMapping {
                rule: name.to_string(),
            })?;

        let mut rule = Rule {
            name: name.to_string(),
            check: defaults.check,
            include: defaults.include.clone(),
            options: defaults.options.clone(),
        };

        for (key, value) in mapping {
            let key = key.as_str().ok_or_else(|| RuleError::UnknownKey {
                rule: name.to_string(),
                key: format!("{:?}", key),
            })?;
            match key {
                "options" => {
                    let text = value.as_str().ok_or_else(|| RuleError::BadValue {
                        rule: name.to_string(),
                        key: "options",
                        expected: "a string",
                    })?;
                    rule.options = text.split_whitespace().map(str::to_string).collect();
                }
                "check" => {
                    rule.check = value.as_bool().ok_or_else(|| RuleError::BadValue {
                        rule: name.to_string(),
                        key: "check",
                        expected: "a boolean",
                    })?;
                }
                "include" => {
                    let items = value.as_sequence().ok_or_else(|| RuleError::BadValue {
                        rule: name.to_string(),
                        key: "include",
                        expected: "a list of strings",
                    })?;
                    let mut include = Vec::with_capacity(items.len());
                    for item in items {
                        let glob = item.as_str().ok_or_else(|| RuleError::BadValue {
                            rule: name.to_string(),
                            key: "include",
                            expected: "a list of strings",
                        })?;
                        include.push(Pattern::new(glob)?);
                    }
                    rule.include = include;
                }
                other => {
                    return Err(RuleError::UnknownKey {
                        rule: name.to_string(),
                        key: other.to_string(),
                    })
                }
            }
        }

        Ok(rule)
    }
}

/// An ordered rule collection plus its resolved default. Read-only once
/// loaded.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    default: Rule,
}

impl RuleSet {
    /// Assemble a rule set directly, for callers that build rules in code
    /// rather than loading a document.
    pub fn new(rules: Vec<Rule>, default: Rule) -> RuleSet {
        RuleSet { rules, default }
    }

    /// Load a rule set from a YAML document, preserving declaration order.
    pub fn from_yaml(text: &str) -> Result<RuleSet, RuleError> {
        let document: Value = serde_yaml_ng::from_str(text)?;
        let mapping = document.as_mapping().ok_or(RuleError::NotAMapping)?;
        RuleSet::from_mapping(mapping)
    }

    fn from_mapping(mapping: &Mapping) -> Result<RuleSet, RuleError> {
        // The DEFAULT entry is resolved first, against the built-in default,
        // so it can seed every other rule.
        let mut default = Rule::built_in_default();
        if let Some(entry) = mapping.get(DEFAULT_RULE_NAME) {
            default = Rule::from_entry(DEFAULT_RULE_NAME, entry, &default)?;
        }

        let mut rules = Vec::new();
        for (key, entry) in mapping {
            let name = key.as_str().ok_or_else(|| RuleError::BadRuleName {
                found: format!("{:?}", key),
            })?;
            if name == DEFAULT_RULE_NAME {
                continue;
            }
            rules.push(Rule::from_entry(name, entry, &default)?);
        }

        Ok(RuleSet { rules, default })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_rule(&self) -> &Rule {
        &self.default
    }

    /// Pick the rule governing a rooted path: a linear scan in declaration
    /// order keeping the most recent match, falling back to the default.
    /// Last declared match wins; pattern specificity is not a tie-break.
    pub fn select(&self, rooted: &str) -> &Rule {
        let mut selected = &self.default;
        for rule in &self.rules {
            if rule.matches(rooted) {
                selected = rule;
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ document loading tests ============

    #[test]
    fn test_empty_document_keeps_built_in_default() {
        let rule_set = RuleSet::from_yaml("{}").unwrap();
        assert!(rule_set.rules().is_empty());
        assert!(rule_set.default_rule().check);
        assert!(rule_set.default_rule().options.is_empty());
    }

    #[test]
    fn test_default_entry_overrides_built_in() {
        let rule_set = RuleSet::from_yaml(
            "DEFAULT:\n  options: \"--opt1 --opt2=foo\"\n  check: true\n",
        )
        .unwrap();
        assert_eq!(rule_set.default_rule().options, vec!["--opt1", "--opt2=foo"]);
    }

    #[test]
    fn test_rules_inherit_from_default_per_key() {
        let rule_set = RuleSet::from_yaml(
            "DEFAULT:\n  options: \"--shared\"\nrule_1:\n  include:\n    - \"*.c\"\n",
        )
        .unwrap();
        let rule = &rule_set.rules()[0];
        assert_eq!(rule.name, "rule_1");
        // options not declared: inherited from DEFAULT
        assert_eq!(rule.options, vec!["--shared"]);
        assert!(rule.check);
        assert!(rule.matches("/sub/file.c"));
        assert!(!rule.matches("/sub/file.h"));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let rule_set = RuleSet::from_yaml(
            "zeta:\n  include: [\"*.c\"]\nalpha:\n  include: [\"*.h\"]\n",
        )
        .unwrap();
        let names: Vec<&str> = rule_set.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_options_split_on_whitespace_in_order() {
        let rule_set =
            RuleSet::from_yaml("r:\n  options: \"--b --a --b\"\n").unwrap();
        // order preserved, duplicates kept
        assert_eq!(rule_set.rules()[0].options, vec!["--b", "--a", "--b"]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = RuleSet::from_yaml("rule_1:\n  exclude: [\"*.c\"]\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unexpected key 'exclude' in rule rule_1"));
        assert!(message.contains("options, check, include"));
    }

    #[test]
    fn test_options_must_be_a_string() {
        let err = RuleSet::from_yaml("rule_1:\n  options: [\"--a\"]\n").unwrap_err();
        assert!(err.to_string().contains("'options' in rule rule_1"));
    }

    #[test]
    fn test_check_must_be_a_boolean() {
        let err = RuleSet::from_yaml("rule_1:\n  check: \"yes\"\n").unwrap_err();
        assert!(err.to_string().contains("'check' in rule rule_1"));
    }

    #[test]
    fn test_include_must_be_a_list_of_strings() {
        let err = RuleSet::from_yaml("rule_1:\n  include: \"*.c\"\n").unwrap_err();
        assert!(err.to_string().contains("'include' in rule rule_1"));

        let err = RuleSet::from_yaml("rule_1:\n  include: [1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("'include' in rule rule_1"));
    }

    #[test]
    fn test_invalid_pattern_aborts_the_load() {
        let err = RuleSet::from_yaml("rule_1:\n  include: [\"a**b\"]\n").unwrap_err();
        assert!(matches!(err, RuleError::Pattern(_)));
        assert!(err.to_string().contains("a**b"));
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let err = RuleSet::from_yaml("- a\n- b\n").unwrap_err();
        assert!(matches!(err, RuleError::NotAMapping));
    }

    // ============ selection tests ============

    #[test]
    fn test_select_falls_back_to_default() {
        let rule_set =
            RuleSet::from_yaml("rule_1:\n  include: [\"*.h\"]\n  check: false\n").unwrap();
        let selected = rule_set.select("/file.c");
        assert_eq!(selected.name, DEFAULT_RULE_NAME);
        assert!(selected.check);
    }

    #[test]
    fn test_select_last_declared_match_wins() {
        let rule_set = RuleSet::from_yaml(
            "first:\n  include: [\"*.c\"]\n  options: \"--a\"\nsecond:\n  include: [\"file.c\"]\n  options: \"--b\"\n",
        )
        .unwrap();
        // both match; the later declaration governs even though the earlier
        // pattern is no less specific
        assert_eq!(rule_set.select("/file.c").options, vec!["--b"]);
    }
}
