//! Construction of default-valued nodes and whole trees.
//!
//! [`RuleGroup::add_rule`] is the only sanctioned way to introduce a new
//! child: it stamps the child's `ruleNr` from the group counter, which
//! keeps sibling identifiers unique and monotonic for the lifetime of
//! the group.

use crate::schema::{
    Rule, RuleDocument, RuleFilter, RuleFilterKind, RuleGroup, TextField, TextFilter,
    WILDCARD_CALENDAR,
};

impl RuleFilter {
    /// A default-valued filter payload for `kind`.
    pub fn make(kind: RuleFilterKind) -> RuleFilter {
        match kind {
            RuleFilterKind::And => RuleFilter::And(RuleGroup::default()),
            RuleFilterKind::Or => RuleFilter::Or(RuleGroup::default()),
            RuleFilterKind::Create => RuleFilter::Create { pending: None },
            RuleFilterKind::Calendar => RuleFilter::Calendar {
                calendar_id: WILDCARD_CALENDAR,
            },
            RuleFilterKind::Text => RuleFilter::Text(TextFilter {
                field: TextField::Title,
                search: String::new(),
                regex: false,
            }),
        }
    }
}

impl Rule {
    /// A default-valued rule with the given per-sibling identifier.
    pub fn make(kind: RuleFilterKind, rule_nr: u32) -> Rule {
        Rule {
            rule_nr,
            negate: false,
            filter: RuleFilter::make(kind),
        }
    }
}

impl Default for Rule {
    /// The editor's blank row: an unfinished `create` placeholder.
    fn default() -> Self {
        Rule::make(RuleFilterKind::Create, 0)
    }
}

impl RuleGroup {
    /// Build a default rule of `kind`, append it, and bump the counter.
    pub fn add_rule(&mut self, kind: RuleFilterKind) -> &mut Rule {
        let rule = Rule::make(kind, self.next_rule_nr);
        self.adopt(rule)
    }

    /// Append a pre-built rule, re-stamping its `ruleNr` from the counter.
    pub fn adopt(&mut self, mut rule: Rule) -> &mut Rule {
        rule.rule_nr = self.next_rule_nr;
        self.next_rule_nr += 1;
        self.rules.push(rule);
        self.rules.last_mut().expect("rules is non-empty after push")
    }
}

/// The default tree for a category with no stored rules: one `and` group
/// holding a single wildcard calendar leaf.
pub fn default_tree() -> Rule {
    let mut root = Rule::make(RuleFilterKind::And, 0);
    if let Some(group) = root.filter.as_group_mut() {
        group.add_rule(RuleFilterKind::Calendar);
    }
    root
}

impl RuleDocument {
    /// Unsaved default document for a category with no stored tree.
    pub fn default_for_category() -> RuleDocument {
        RuleDocument {
            id: 0,
            rule: default_tree(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
