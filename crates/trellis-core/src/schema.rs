//! Record type schema cache: type, field and relationship names

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::identifiers::base_id;
use crate::model::{AppObject, ObjectType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub name: String,
    /// Raw id of the related record type, when declared.
    pub target_type: Option<String>,
}

/// Keys are lowercased; every record type is indexed under its full id and base form.
#[derive(Debug, Default)]
pub struct SchemaCache {
    types: HashMap<String, String>,
    fields: HashMap<(String, String), String>,
    relationships: HashMap<(String, String), Relationship>,
}

impl SchemaCache {
    pub fn build(objects: &[AppObject]) -> Self {
        let mut cache = SchemaCache::default();
        for object in objects
            .iter()
            .filter(|o| o.object_type == ObjectType::RecordType)
        {
            cache.insert_record_type(object);
        }
        debug!(
            "Schema cache built: {} type keys, {} fields, {} relationships",
            cache.types.len(),
            cache.fields.len(),
            cache.relationships.len()
        );
        cache
    }

    fn insert_record_type(&mut self, object: &AppObject) {
        let type_keys = key_forms(&object.id);
        for key in &type_keys {
            self.types
                .entry(key.clone())
                .or_insert_with(|| object.name.clone());
        }

        for field in object.attr_list("fields") {
            let Some(field_id) = str_field(field, "field_uuid") else {
                continue;
            };
            let name = str_field(field, "field_name").unwrap_or(field_id);
            for type_key in &type_keys {
                for field_key in key_forms(field_id) {
                    self.fields
                        .entry((type_key.clone(), field_key))
                        .or_insert_with(|| name.to_string());
                }
            }
        }

        for rel in object.attr_list("relationships") {
            let Some(rel_id) = str_field(rel, "relationship_uuid") else {
                continue;
            };
            let relationship = Relationship {
                name: str_field(rel, "relationship_name")
                    .unwrap_or(rel_id)
                    .to_string(),
                target_type: str_field(rel, "target_record_type_uuid").map(str::to_string),
            };
            for type_key in &type_keys {
                for rel_key in key_forms(rel_id) {
                    self.relationships
                        .entry((type_key.clone(), rel_key))
                        .or_insert_with(|| relationship.clone());
                }
            }
        }
    }

    /// Lowercased type key: the full id when known, otherwise its base form.
    pub fn normalize_type(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        if self.types.contains_key(&lowered) {
            return lowered;
        }
        base_id(&lowered).map(str::to_string).unwrap_or(lowered)
    }

    /// Name of a normalized type key.
    pub fn type_name(&self, type_key: &str) -> Option<&str> {
        self.types.get(type_key).map(String::as_str)
    }

    pub fn field(&self, type_key: &str, field_id: &str) -> Option<&str> {
        key_forms(field_id)
            .into_iter()
            .find_map(|key| self.fields.get(&(type_key.to_string(), key)))
            .map(String::as_str)
    }

    pub fn relationship(&self, type_key: &str, rel_id: &str) -> Option<&Relationship> {
        key_forms(rel_id)
            .into_iter()
            .find_map(|key| self.relationships.get(&(type_key.to_string(), key)))
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Lowercased full id, plus its base form when that differs.
/// Also the lookup order for URN segments.
fn key_forms(id: &str) -> Vec<String> {
    let lowered = id.to_lowercase();
    let mut keys = vec![lowered.clone()];
    if let Some(base) = base_id(&lowered) {
        if base != lowered {
            keys.push(base.to_string());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ORDER: &str = "aaaaaaaa-0000-4000-8000-000000000001";
    const CUSTOMER: &str = "aaaaaaaa-0000-4000-8000-000000000002";

    fn order_type() -> AppObject {
        AppObject::new(
            format!("{ORDER}-orders"),
            "Order",
            ObjectType::RecordType,
            json!({
                "fields": [
                    {"field_uuid": "bbbbbbbb-0000-4000-8000-000000000001", "field_name": "total"},
                    {"field_uuid": "bbbbbbbb-0000-4000-8000-000000000002"},
                    {"field_name": "ignored"}
                ],
                "relationships": [{
                    "relationship_uuid": "cccccccc-0000-4000-8000-000000000001",
                    "relationship_name": "customer",
                    "target_record_type_uuid": CUSTOMER
                }]
            }),
        )
    }

    #[test]
    fn types_are_indexed_by_full_and_base_id() {
        let cache = SchemaCache::build(&[order_type()]);
        assert_eq!(cache.type_count(), 2);
        let key = cache.normalize_type(&format!("{}-orders", ORDER.to_uppercase()));
        assert_eq!(cache.type_name(&key), Some("Order"));
        let key = cache.normalize_type(&format!("{ORDER}-other_suffix"));
        assert_eq!(key, ORDER);
        assert_eq!(cache.type_name(&key), Some("Order"));
    }

    #[test]
    fn field_name_falls_back_to_id() {
        let cache = SchemaCache::build(&[order_type()]);
        assert_eq!(
            cache.field(ORDER, "BBBBBBBB-0000-4000-8000-000000000001"),
            Some("total")
        );
        assert_eq!(
            cache.field(ORDER, "bbbbbbbb-0000-4000-8000-000000000002"),
            Some("bbbbbbbb-0000-4000-8000-000000000002")
        );
    }

    #[test]
    fn relationships_keep_their_target() {
        let cache = SchemaCache::build(&[order_type()]);
        let rel = cache
            .relationship(ORDER, "cccccccc-0000-4000-8000-000000000001-x")
            .unwrap();
        assert_eq!(rel.name, "customer");
        assert_eq!(rel.target_type.as_deref(), Some(CUSTOMER));
    }

    #[test]
    fn non_record_types_are_ignored() {
        let rule = AppObject::new(ORDER, "Rule", ObjectType::ExpressionRule, json!({}));
        assert!(SchemaCache::build(&[rule]).is_empty());
    }
}
