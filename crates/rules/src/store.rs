//! Persistence contract and the save path for rule documents.
//!
//! The real store is the hosting platform's per-category data API; this
//! module owns only the decision between create and update plus the
//! repairs a document needs before it may be persisted. The engine never
//! deletes a document itself.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{Result, RuleError};
use crate::schema::{Rule, RuleDocument, RuleFilter, RuleFilterKind};

// ── Collaborator contract ───────────────────────────────────────────

/// Persistence collaborator for rule documents, scoped by owning category.
#[async_trait]
pub trait RuleStore {
    /// Store a new document (`id == 0`); returns it with the assigned id.
    async fn create(&self, category_id: i64, doc: &RuleDocument) -> Result<RuleDocument>;

    /// Overwrite an existing document (`id > 0`).
    async fn update(&self, category_id: i64, doc: &RuleDocument) -> Result<RuleDocument>;

    /// Delete a stored document. Called by the surrounding category
    /// lifecycle, never by the engine.
    async fn delete(&self, category_id: i64, id: i64) -> Result<bool>;
}

// ── Save path ───────────────────────────────────────────────────────

/// Prepare a document for persisting and upsert it.
///
/// Wraps a non-`and` root in a fresh `and` group (keeping the document
/// id) and strips unfinished `create` rows, then dispatches on `id`.
pub async fn save_rules<S: RuleStore + ?Sized>(
    store: &S,
    category_id: i64,
    mut doc: RuleDocument,
) -> Result<RuleDocument> {
    normalize_root(&mut doc.rule);
    strip_placeholders(&mut doc.rule);

    if doc.id > 0 {
        store.update(category_id, &doc).await
    } else {
        store.create(category_id, &doc).await
    }
}

/// Ensure the root connective is `and`, wrapping any other root as the
/// sole child of a fresh `and` group. The wrapped rule keeps its
/// `ruleNr`; the new root takes that number over and its counter starts
/// above it.
pub fn normalize_root(root: &mut Rule) {
    if matches!(root.filter, RuleFilter::And(_)) {
        return;
    }
    warn!(
        kind = root.filter.kind_str(),
        "root filter is not an and-group; wrapping"
    );

    let inner = std::mem::replace(root, Rule::make(RuleFilterKind::And, 0));
    root.rule_nr = inner.rule_nr;
    if let Some(group) = root.filter.as_group_mut() {
        group.next_rule_nr = inner.rule_nr + 1;
        group.rules.push(inner);
    }
}

/// Drop unfinished `create` rows from the whole tree.
pub fn strip_placeholders(rule: &mut Rule) {
    if let Some(group) = rule.filter.as_group_mut() {
        group.rules.retain_mut(|child| {
            strip_placeholders(child);
            !matches!(child.filter, RuleFilter::Create { .. })
        });
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// In-memory store double for tests and local development.
///
/// Ids are assigned monotonically across all categories, the way the
/// platform's data API does.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    documents: RwLock<HashMap<(i64, i64), RuleDocument>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored document by category and id.
    pub fn get(&self, category_id: i64, id: i64) -> Option<RuleDocument> {
        self.documents
            .read()
            .expect("documents lock poisoned")
            .get(&(category_id, id))
            .cloned()
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn create(&self, category_id: i64, doc: &RuleDocument) -> Result<RuleDocument> {
        let mut documents = self.documents.write().expect("documents lock poisoned");
        let id = documents.keys().map(|(_, id)| *id).max().unwrap_or(0) + 1;
        let stored = RuleDocument {
            id,
            rule: doc.rule.clone(),
        };
        documents.insert((category_id, id), stored.clone());
        info!(category_id, id, "stored new rule document");
        Ok(stored)
    }

    async fn update(&self, category_id: i64, doc: &RuleDocument) -> Result<RuleDocument> {
        let mut documents = self.documents.write().expect("documents lock poisoned");
        let key = (category_id, doc.id);
        if !documents.contains_key(&key) {
            return Err(RuleError::Store(format!(
                "no stored rule document {} in category {}",
                doc.id, category_id
            )));
        }
        documents.insert(key, doc.clone());
        info!(category_id, id = doc.id, "updated rule document");
        Ok(doc.clone())
    }

    async fn delete(&self, category_id: i64, id: i64) -> Result<bool> {
        let mut documents = self.documents.write().expect("documents lock poisoned");
        Ok(documents.remove(&(category_id, id)).is_some())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
