//! Predicate evaluation: does an appointment satisfy a rule tree?
//!
//! Negation resolves per node: each node computes its expectation from
//! its own `negate` flag and compares every child's fully-resolved result
//! against it, so nested negation composes by recursion rather than by a
//! single top-level flip.

use regex::Regex;
use tracing::warn;

use herald_core::Appointment;

use crate::error::{Result, RuleError};
use crate::schema::{Rule, RuleFilter, TextField, TextFilter, WILDCARD_CALENDAR};

/// Evaluate one rule tree against one appointment.
///
/// Fails with [`RuleError::Configuration`] when the tree contains a
/// filter kind this build does not understand.
pub fn evaluate(rule: &Rule, appointment: &Appointment) -> Result<bool> {
    let expected = !rule.negate;

    match &rule.filter {
        RuleFilter::And(group) => {
            for child in &group.rules {
                if evaluate(child, appointment)? != expected {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        RuleFilter::Or(group) => {
            for child in &group.rules {
                if evaluate(child, appointment)? == expected {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        RuleFilter::Create { .. } => {
            // Placeholders are stripped before persisting; one reaching
            // evaluation means the stored tree is corrupt upstream.
            warn!(rule_nr = rule.rule_nr, "create placeholder reached evaluation");
            Ok(expected)
        }
        RuleFilter::Calendar { calendar_id } => {
            let matched =
                *calendar_id == WILDCARD_CALENDAR || appointment.calendar.id == *calendar_id;
            Ok(matched == expected)
        }
        RuleFilter::Text(text) => {
            let matched = match eval_text(text, appointment) {
                Ok(matched) => matched,
                Err(err) => {
                    // Scoped to this one rule: siblings and the record
                    // evaluation continue.
                    warn!(
                        rule_nr = rule.rule_nr,
                        error = %err,
                        "text filter failed; treating rule as non-matching"
                    );
                    false
                }
            };
            Ok(matched == expected)
        }
        RuleFilter::Unknown { kind } => Err(RuleError::Configuration(kind.clone())),
    }
}

/// Evaluate a tree against a batch of appointments, returning the ones
/// that match.
///
/// A tree that cannot be evaluated marks the record as non-matching and
/// logs a diagnostic; the rest of the batch continues.
pub fn select_matching<'a>(rule: &Rule, appointments: &'a [Appointment]) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|appointment| match evaluate(rule, appointment) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(
                    appointment_id = appointment.id,
                    error = %err,
                    "skipping appointment: rule tree not evaluable"
                );
                false
            }
        })
        .collect()
}

/// Raw verdict of a `text` leaf, before the node's negation is applied.
fn eval_text(filter: &TextFilter, appointment: &Appointment) -> Result<bool> {
    let value = match filter.field {
        TextField::Title => Some(appointment.title.as_str()),
        TextField::Subtitle => appointment.subtitle.as_deref(),
        TextField::Description => appointment.description.as_deref(),
    };
    let value = match value {
        Some(value) => value,
        None => return Ok(false),
    };

    if filter.regex {
        let pattern = Regex::new(&filter.search).map_err(|err| {
            RuleError::Validation(format!(
                "search pattern '{}' does not compile: {}",
                filter.search, err
            ))
        })?;
        Ok(pattern.is_match(value))
    } else {
        Ok(value == filter.search)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
