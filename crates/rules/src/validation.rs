//! Pre-save validation for rule trees.
//!
//! Returns a [`ValidationResult`] with errors (block save) and warnings
//! (advisory). Paths are JSON-path-like, relative to the document root,
//! e.g. `"filter.rules[2].filter.search"`.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::{Rule, RuleDocument, RuleFilter, RuleGroup};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A single finding with its location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a whole stored document.
pub fn validate_document(doc: &RuleDocument) -> ValidationResult {
    let mut result = ValidationResult::new();
    if !matches!(doc.rule.filter, RuleFilter::And(_)) {
        result.warn(
            "filter",
            format!(
                "root filter is '{}'; it will be wrapped in an and-group on save",
                doc.rule.filter.kind_str()
            ),
        );
    }
    validate_rule(&doc.rule, "filter", &mut result);
    result
}

fn validate_rule(rule: &Rule, filter_path: &str, result: &mut ValidationResult) {
    match &rule.filter {
        RuleFilter::And(group) => {
            if group.rules.is_empty() {
                result.warn(filter_path.to_string(), "empty and-group matches every appointment");
            }
            validate_children(group, filter_path, result);
        }
        RuleFilter::Or(group) => {
            if group.rules.is_empty() {
                result.warn(filter_path.to_string(), "empty or-group never matches");
            }
            validate_children(group, filter_path, result);
        }
        RuleFilter::Create { .. } => {
            result.warn(
                filter_path.to_string(),
                "unfinished rule row; it will be dropped on save",
            );
        }
        RuleFilter::Calendar { .. } => {}
        RuleFilter::Text(text) => {
            if text.regex {
                if let Err(err) = Regex::new(&text.search) {
                    result.error(
                        format!("{filter_path}.search"),
                        format!("search pattern does not compile: {err}"),
                    );
                }
            } else if text.search.is_empty() {
                result.warn(
                    format!("{filter_path}.search"),
                    "empty search text only matches empty fields",
                );
            }
        }
        RuleFilter::Unknown { kind } => {
            result.error(filter_path.to_string(), format!("unknown filter type '{kind}'"));
        }
    }
}

fn validate_children(group: &RuleGroup, filter_path: &str, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (index, child) in group.rules.iter().enumerate() {
        let child_path = format!("{filter_path}.rules[{index}]");
        if child.rule_nr >= group.next_rule_nr {
            result.error(
                format!("{child_path}.ruleNr"),
                format!(
                    "ruleNr {} is not below the group counter {}",
                    child.rule_nr, group.next_rule_nr
                ),
            );
        }
        if !seen.insert(child.rule_nr) {
            result.error(
                format!("{child_path}.ruleNr"),
                format!("duplicate ruleNr {} among siblings", child.rule_nr),
            );
        }
        validate_rule(child, &format!("{child_path}.filter"), result);
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::default_tree;
    use crate::schema::{RuleFilterKind, TextField, TextFilter};

    fn doc(rule: Rule) -> RuleDocument {
        RuleDocument { id: 0, rule }
    }

    fn text_rule(rule_nr: u32, search: &str, regex: bool) -> Rule {
        Rule {
            rule_nr,
            negate: false,
            filter: RuleFilter::Text(TextFilter {
                field: TextField::Title,
                search: search.to_string(),
                regex,
            }),
        }
    }

    #[test]
    fn default_tree_is_valid() {
        let report = validate_document(&doc(default_tree()));
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn malformed_pattern_blocks_save() {
        let mut root = default_tree();
        root.filter
            .as_group_mut()
            .unwrap()
            .adopt(text_rule(0, "(unclosed", true));

        let report = validate_document(&doc(root));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "filter.rules[1].filter.search");
    }

    #[test]
    fn exact_search_pattern_is_not_compiled() {
        // Parens are literal text in exact-match mode.
        let mut root = default_tree();
        root.filter
            .as_group_mut()
            .unwrap()
            .adopt(text_rule(0, "(unclosed", false));

        let report = validate_document(&doc(root));
        assert!(report.valid);
    }

    #[test]
    fn duplicate_sibling_numbers_are_an_error() {
        let root = Rule {
            rule_nr: 0,
            negate: false,
            filter: RuleFilter::And(RuleGroup {
                next_rule_nr: 5,
                rules: vec![text_rule(2, "a", false), text_rule(2, "b", false)],
            }),
        };

        let report = validate_document(&doc(root));
        assert!(!report.valid);
        assert!(report.errors[0].message.contains("duplicate ruleNr 2"));
    }

    #[test]
    fn counter_behind_children_is_an_error() {
        let root = Rule {
            rule_nr: 0,
            negate: false,
            filter: RuleFilter::And(RuleGroup {
                next_rule_nr: 1,
                rules: vec![text_rule(4, "a", false)],
            }),
        };

        let report = validate_document(&doc(root));
        assert!(!report.valid);
        assert!(report.errors[0].message.contains("not below the group counter"));
    }

    #[test]
    fn advisory_warnings_do_not_block() {
        let mut root = default_tree();
        {
            let group = root.filter.as_group_mut().unwrap();
            group.add_rule(RuleFilterKind::Create);
            group.add_rule(RuleFilterKind::Or);
            group.adopt(text_rule(0, "", false));
        }

        let report = validate_document(&doc(root));
        assert!(report.valid);

        let paths: Vec<&str> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"filter.rules[1].filter"));
        assert!(paths.contains(&"filter.rules[2].filter"));
        assert!(paths.contains(&"filter.rules[3].filter.search"));
    }

    #[test]
    fn non_and_root_warns() {
        let report = validate_document(&doc(Rule::make(RuleFilterKind::Or, 0)));
        assert!(report.valid);
        assert!(report.warnings.iter().any(|w| w.path == "filter"));
    }

    #[test]
    fn unknown_filter_kind_is_an_error() {
        let mut root = default_tree();
        root.filter.as_group_mut().unwrap().adopt(Rule {
            rule_nr: 0,
            negate: false,
            filter: RuleFilter::Unknown {
                kind: "daterange".to_string(),
            },
        });

        let report = validate_document(&doc(root));
        assert!(!report.valid);
        assert!(report.errors[0].message.contains("daterange"));
    }
}
