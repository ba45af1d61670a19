//! Rule tree node types and their tagged (de)serialization.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::RuleFilterKind;

/// `calendarId` value that matches any calendar.
pub const WILDCARD_CALENDAR: i64 = -1;

/// One node of the filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Identifier unique among the direct children of one group. Assigned
    /// from the parent group's counter and never reused within that
    /// group's lifetime, so it can match nodes across two snapshots.
    pub rule_nr: u32,
    pub negate: bool,
    pub filter: RuleFilter,
}

/// Child list and counter shared by the `and`/`or` connectives.
///
/// The group owns its children outright; there are no back-references,
/// so the tree is acyclic by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    /// Next `ruleNr` to hand out. Only ever increases.
    #[serde(default)]
    pub next_rule_nr: u32,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Appointment fields a `text` filter can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Title,
    Subtitle,
    Description,
}

/// Payload of a `text` filter leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFilter {
    pub field: TextField,
    pub search: String,
    pub regex: bool,
}

/// Payload of a [`Rule`], tagged by `type` in the stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleFilter {
    /// Every child must resolve to the node's expectation. Empty matches.
    And(RuleGroup),
    /// At least one child must resolve to the node's expectation. Empty
    /// never matches -- asymmetric with `And` on purpose.
    Or(RuleGroup),
    /// Unfinished editor row; `pending` holds the kind picked so far.
    /// Stripped before the tree is persisted.
    Create { pending: Option<RuleFilterKind> },
    /// Matches one calendar, or any calendar for [`WILDCARD_CALENDAR`].
    Calendar { calendar_id: i64 },
    /// Matches a text field exactly, or by pattern when `regex` is set.
    Text(TextFilter),
    /// Discriminant this build does not know. Kept so documents written
    /// by a newer module version still load; evaluating it is a
    /// configuration error.
    Unknown { kind: String },
}

impl RuleFilter {
    /// The discriminant string as stored in the `type` field.
    pub fn kind_str(&self) -> &str {
        match self {
            RuleFilter::And(_) => "and",
            RuleFilter::Or(_) => "or",
            RuleFilter::Create { .. } => "create",
            RuleFilter::Calendar { .. } => "calendar",
            RuleFilter::Text(_) => "text",
            RuleFilter::Unknown { kind } => kind,
        }
    }

    /// Group payload, for either connective.
    pub fn as_group(&self) -> Option<&RuleGroup> {
        match self {
            RuleFilter::And(group) | RuleFilter::Or(group) => Some(group),
            _ => None,
        }
    }

    /// Mutable group payload, for either connective.
    pub fn as_group_mut(&mut self) -> Option<&mut RuleGroup> {
        match self {
            RuleFilter::And(group) | RuleFilter::Or(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.as_group().is_some()
    }
}

// ── Tagged (de)serialization ────────────────────────────────────────
//
// Two-pass: read the raw object first, dispatch on the `type` string,
// then deserialize the payload into the concrete variant. Unknown
// discriminants become `RuleFilter::Unknown` instead of a parse error.

impl<'de> Deserialize<'de> for RuleFilter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?;

        let filter = match kind.parse::<RuleFilterKind>() {
            Ok(RuleFilterKind::And) => {
                RuleFilter::And(serde_json::from_value(value.clone()).map_err(D::Error::custom)?)
            }
            Ok(RuleFilterKind::Or) => {
                RuleFilter::Or(serde_json::from_value(value.clone()).map_err(D::Error::custom)?)
            }
            Ok(RuleFilterKind::Create) => {
                let pending = match value.get("create") {
                    Some(picked) => {
                        serde_json::from_value(picked.clone()).map_err(D::Error::custom)?
                    }
                    None => None,
                };
                RuleFilter::Create { pending }
            }
            Ok(RuleFilterKind::Calendar) => {
                let calendar_id = value
                    .get("calendarId")
                    .and_then(serde_json::Value::as_i64)
                    .ok_or_else(|| D::Error::missing_field("calendarId"))?;
                RuleFilter::Calendar { calendar_id }
            }
            Ok(RuleFilterKind::Text) => {
                RuleFilter::Text(serde_json::from_value(value.clone()).map_err(D::Error::custom)?)
            }
            Err(_) => RuleFilter::Unknown {
                kind: kind.to_string(),
            },
        };
        Ok(filter)
    }
}

impl Serialize for RuleFilter {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(tag = "type", rename_all = "lowercase")]
        enum Tagged<'a> {
            And(&'a RuleGroup),
            Or(&'a RuleGroup),
            Create { create: Option<RuleFilterKind> },
            Calendar {
                #[serde(rename = "calendarId")]
                calendar_id: i64,
            },
            Text(&'a TextFilter),
        }

        match self {
            RuleFilter::And(group) => Tagged::And(group).serialize(serializer),
            RuleFilter::Or(group) => Tagged::Or(group).serialize(serializer),
            RuleFilter::Create { pending } => {
                Tagged::Create { create: *pending }.serialize(serializer)
            }
            RuleFilter::Calendar { calendar_id } => Tagged::Calendar {
                calendar_id: *calendar_id,
            }
            .serialize(serializer),
            RuleFilter::Text(text) => Tagged::Text(text).serialize(serializer),
            RuleFilter::Unknown { kind } => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", kind)?;
                map.end()
            }
        }
    }
}
