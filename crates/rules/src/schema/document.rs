//! Stored rule document envelope.

use serde::{Deserialize, Serialize};

use super::Rule;

/// A category's rule tree as stored by the data layer.
///
/// `id == 0` marks a document that has never been saved; the save path
/// creates it and the store hands back the assigned id. `id > 0` updates
/// in place. The owning category scopes the store call and is not part
/// of the document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub id: i64,
    #[serde(flatten)]
    pub rule: Rule,
}
