//! Snapshot reconciliation: merge a freshly loaded tree into a live one.
//!
//! The data layer re-fetches whole documents; replacing the live tree
//! wholesale would drop everything keyed to retained nodes (open editor
//! rows, cursor positions). [`reconcile`] instead walks both trees
//! top-down and mutates the live tree in place, matching group children
//! by `ruleNr`, so unchanged nodes keep their allocations. Planning
//! ([`plan_children`]) is pure and separate from application.

use indexmap::IndexMap;

use crate::schema::{Rule, RuleFilter, RuleGroup};

// ── Planning ────────────────────────────────────────────────────────

/// One merge step for the children of a single group.
#[derive(Debug, PartialEq)]
pub enum ChildOp<'a> {
    /// `dst[index]` has a counterpart in `src` with the same `ruleNr`;
    /// the pair is reconciled recursively.
    Merge { index: usize, src: &'a Rule },
    /// `dst[index]` has no counterpart in `src` and is dropped.
    Remove { index: usize },
    /// A `src` child whose `ruleNr` is absent from `dst`, appended at
    /// the end in `src` order.
    Append { src: &'a Rule },
}

/// Plan the child merge for one group.
///
/// Ops come out in application order: merges and removals follow `dst`'s
/// current child order, appends follow `src`'s. Retained children keep
/// `dst`'s relative order; new children land at the tail regardless of
/// their interior position in `src`.
pub fn plan_children<'a>(dst: &[Rule], src: &'a [Rule]) -> Vec<ChildOp<'a>> {
    let mut incoming: IndexMap<u32, &Rule> =
        src.iter().map(|rule| (rule.rule_nr, rule)).collect();
    let mut ops = Vec::with_capacity(dst.len() + src.len());

    for (index, child) in dst.iter().enumerate() {
        match incoming.shift_remove(&child.rule_nr) {
            Some(src_child) => ops.push(ChildOp::Merge {
                index,
                src: src_child,
            }),
            None => ops.push(ChildOp::Remove { index }),
        }
    }
    for src_child in incoming.into_values() {
        ops.push(ChildOp::Append { src: src_child });
    }
    ops
}

// ── Application ─────────────────────────────────────────────────────

/// Merge `src` into `dst` in place.
///
/// Idempotent: running it again with an unchanged `src` changes nothing,
/// and a `src` value-equal to `dst` is a no-op.
pub fn reconcile(dst: &mut Rule, src: &Rule) {
    dst.rule_nr = src.rule_nr;
    dst.negate = src.negate;
    reconcile_filter(&mut dst.filter, &src.filter);
}

fn reconcile_filter(dst: &mut RuleFilter, src: &RuleFilter) {
    match src {
        RuleFilter::And(src_group) | RuleFilter::Or(src_group) => {
            // Reuse the live child list when the node already is a group,
            // even across an and/or flip; otherwise start from an empty
            // one (a leaf position has no children to carry over).
            let mut group = match std::mem::replace(dst, RuleFilter::Create { pending: None }) {
                RuleFilter::And(group) | RuleFilter::Or(group) => group,
                _ => RuleGroup::default(),
            };
            group.next_rule_nr = src_group.next_rule_nr;
            merge_children(&mut group.rules, &src_group.rules);
            *dst = match src {
                RuleFilter::And(_) => RuleFilter::And(group),
                _ => RuleFilter::Or(group),
            };
        }
        RuleFilter::Create { pending } => {
            *dst = RuleFilter::Create { pending: *pending };
        }
        RuleFilter::Calendar { calendar_id } => {
            *dst = RuleFilter::Calendar {
                calendar_id: *calendar_id,
            };
        }
        RuleFilter::Text(src_text) => match dst {
            RuleFilter::Text(dst_text) => {
                dst_text.field = src_text.field;
                dst_text.regex = src_text.regex;
                // Keep the existing buffer when the value is unchanged.
                if dst_text.search != src_text.search {
                    dst_text.search = src_text.search.clone();
                }
            }
            _ => *dst = RuleFilter::Text(src_text.clone()),
        },
        RuleFilter::Unknown { kind } => match dst {
            RuleFilter::Unknown { kind: dst_kind } => {
                if dst_kind != kind {
                    *dst_kind = kind.clone();
                }
            }
            _ => {
                *dst = RuleFilter::Unknown { kind: kind.clone() };
            }
        },
    }
}

fn merge_children(dst: &mut Vec<Rule>, src: &[Rule]) {
    let ops = plan_children(dst, src);

    let mut removals = Vec::new();
    for op in &ops {
        match op {
            ChildOp::Merge { index, src } => reconcile(&mut dst[*index], src),
            ChildOp::Remove { index } => removals.push(*index),
            ChildOp::Append { .. } => {}
        }
    }
    // Highest index first so earlier removals do not shift later ones.
    for index in removals.into_iter().rev() {
        dst.remove(index);
    }
    for op in ops {
        if let ChildOp::Append { src } = op {
            dst.push(src.clone());
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
