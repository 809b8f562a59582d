//! Object catalog: id, alias and name lookup over the input collection

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::identifiers::{base_id, canonical_id};
use crate::model::{AppObject, ObjectType};

/// The catalog's view of one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub object_type: ObjectType,
}

/// A shortened key that two different objects both produce.
/// The first object inserted keeps the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCollision {
    pub key: String,
    pub kept: String,
    pub shadowed: String,
}

/// Read-only lookup built once per run.
///
/// Exact ids always win over aliases. Aliases (lowercased full id, base
/// form, canonical form) follow first-writer-wins, and every collision is
/// recorded.
#[derive(Default)]
pub struct ObjectCatalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    collisions: Vec<AliasCollision>,
}

impl std::fmt::Debug for ObjectCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCatalog")
            .field("objects", &self.entries.len())
            .field("aliases", &self.aliases.len())
            .field("collisions", &self.collisions.len())
            .finish()
    }
}

impl ObjectCatalog {
    pub fn build(objects: &[AppObject]) -> Self {
        let mut catalog = ObjectCatalog::default();
        for object in objects {
            catalog.insert(object);
        }
        debug!(
            "Catalog built: {} objects, {} aliases, {} collisions",
            catalog.entries.len(),
            catalog.aliases.len(),
            catalog.collisions.len()
        );
        catalog
    }

    fn insert(&mut self, object: &AppObject) {
        if let Some(&existing) = self.by_id.get(&object.id) {
            warn!(
                "Duplicate object id {} ({} and {}); keeping the first",
                object.id, self.entries[existing].name, object.name
            );
            return;
        }

        let idx = self.entries.len();
        self.entries.push(CatalogEntry {
            id: object.id.clone(),
            name: object.name.clone(),
            object_type: object.object_type.clone(),
        });
        self.by_id.insert(object.id.clone(), idx);
        self.by_name.entry(object.name.to_lowercase()).or_insert(idx);

        let mut keys = vec![object.id.to_lowercase()];
        keys.extend(base_id(&object.id).map(str::to_lowercase));
        keys.extend(canonical_id(&object.id).map(str::to_lowercase));
        keys.dedup();
        for key in keys {
            self.insert_alias(key, idx);
        }
    }

    fn insert_alias(&mut self, key: String, idx: usize) {
        match self.aliases.get(&key) {
            None => {
                self.aliases.insert(key, idx);
            }
            Some(&kept) if kept != idx => {
                let collision = AliasCollision {
                    key,
                    kept: self.entries[kept].id.clone(),
                    shadowed: self.entries[idx].id.clone(),
                };
                warn!(
                    "Alias {} already names {}; {} is reachable only by its full id",
                    collision.key, collision.kept, collision.shadowed
                );
                self.collisions.push(collision);
            }
            Some(_) => {}
        }
    }

    /// Exact id, then alias.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.get_exact(id).or_else(|| self.get_alias(id))
    }

    pub fn get_exact(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    fn get_alias(&self, key: &str) -> Option<&CatalogEntry> {
        self.aliases
            .get(&key.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Cross-application match on the canonical form of a prefixed id.
    pub fn get_canonical(&self, id: &str) -> Option<&CatalogEntry> {
        canonical_id(id).and_then(|key| self.get(key))
    }

    /// Match on the 36-character base form.
    pub fn get_base(&self, id: &str) -> Option<&CatalogEntry> {
        base_id(id).and_then(|key| self.get(key))
    }

    /// Full token, then canonical form, then base form.
    pub fn resolve_identifier(&self, token: &str) -> Option<&CatalogEntry> {
        self.get(token)
            .or_else(|| self.get_canonical(token))
            .or_else(|| self.get_base(token))
    }

    /// Case-insensitive name lookup; the first object with a name wins.
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// A raw reference value that may hold an id or an already-resolved name.
    pub fn resolve_reference(&self, value: &str) -> Option<&CatalogEntry> {
        if value.is_empty() {
            return None;
        }
        self.get(value).or_else(|| self.find_by_name(value))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn object_type(&self, id: &str) -> Option<&ObjectType> {
        self.get_exact(id).map(|entry| &entry.object_type)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn collisions(&self) -> &[AliasCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
