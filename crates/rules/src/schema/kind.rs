//! Filter kind discriminant for tagged (de)serialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported values of the `type` field carried by every filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFilterKind {
    And,
    Or,
    Create,
    Calendar,
    Text,
}

impl fmt::Display for RuleFilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFilterKind::And => write!(f, "and"),
            RuleFilterKind::Or => write!(f, "or"),
            RuleFilterKind::Create => write!(f, "create"),
            RuleFilterKind::Calendar => write!(f, "calendar"),
            RuleFilterKind::Text => write!(f, "text"),
        }
    }
}

impl FromStr for RuleFilterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "and" => Ok(RuleFilterKind::And),
            "or" => Ok(RuleFilterKind::Or),
            "create" => Ok(RuleFilterKind::Create),
            "calendar" => Ok(RuleFilterKind::Calendar),
            "text" => Ok(RuleFilterKind::Text),
            other => Err(format!("unknown filter kind: '{}'", other)),
        }
    }
}
