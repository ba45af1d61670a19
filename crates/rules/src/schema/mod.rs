//! Rule tree schema with serde (de)serialization.
//!
//! Defines the complete type hierarchy for stored rule documents:
//! - [`Rule`]: one tree node -- a per-sibling identifier, a negation flag,
//!   and a filter payload
//! - [`RuleFilter`]: the payload, tagged by `type` in the JSON document
//! - [`RuleDocument`]: the stored envelope (`id` plus the root rule)
//!
//! Unrecognized `type` discriminants deserialize into
//! [`RuleFilter::Unknown`] so documents written by a newer module version
//! still load; they fail later, at evaluation time.

mod document;
mod kind;
mod rule;

pub use document::*;
pub use kind::*;
pub use rule::*;
