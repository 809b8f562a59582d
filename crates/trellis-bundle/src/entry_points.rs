//! Entry-point discovery: record actions and pages, sites, control panels,
//! web APIs, and process models nothing else starts.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;
use trellis_core::{
    AppObject, BundleCategory, EntryPoint, EntryPointDetail, EntryPointKind, ObjectCatalog,
    ObjectType,
};

pub struct EntryPointDiscovery<'a> {
    catalog: &'a ObjectCatalog,
}

impl<'a> EntryPointDiscovery<'a> {
    pub fn new(catalog: &'a ObjectCatalog) -> Self {
        EntryPointDiscovery { catalog }
    }

    pub fn discover(&self, objects: &[AppObject]) -> Vec<EntryPoint> {
        let mut entry_points = Vec::new();

        for object in objects {
            match object.object_type {
                ObjectType::RecordType => {
                    for action in object.attr_list("actions") {
                        entry_points.push(self.action_entry(object, action));
                    }
                    if let Some(page) = page_entry(object) {
                        entry_points.push(page);
                    }
                }
                ObjectType::Site => {
                    entry_points.push(plain_entry(object, EntryPointKind::Site, BundleCategory::Site))
                }
                ObjectType::ControlPanel => entry_points.push(plain_entry(
                    object,
                    EntryPointKind::ControlPanel,
                    BundleCategory::Dashboard,
                )),
                ObjectType::WebApi => {
                    entry_points.push(plain_entry(object, EntryPointKind::WebApi, BundleCategory::WebApi))
                }
                _ => {}
            }
        }

        let started = self.started_processes(objects);
        entry_points.extend(
            objects
                .iter()
                .filter(|o| o.object_type == ObjectType::ProcessModel && !started.contains(o.id.as_str()))
                .map(|o| plain_entry(o, EntryPointKind::ProcessModel, BundleCategory::Process)),
        );

        debug!("Discovered {} entry points", entry_points.len());
        entry_points
    }

    fn action_entry(&self, record_type: &AppObject, action: &Value) -> EntryPoint {
        let target = str_at(action, "target_uuid")
            .and_then(|raw| self.catalog.resolve_reference(raw))
            .map(|entry| entry.id.clone());
        let title = action
            .get("expressions")
            .and_then(|e| str_at(e, "TITLE"))
            .or_else(|| str_at(action, "reference_key"))
            .unwrap_or("Unknown");

        EntryPoint {
            id: target.unwrap_or_else(|| record_type.id.clone()),
            name: format!("{} - {}", record_type.name, strip_string_literal(title)),
            kind: EntryPointKind::RecordTypeAction,
            category: BundleCategory::Action,
            parent_name: Some(record_type.name.clone()),
            detail: EntryPointDetail::Action {
                action: action.clone(),
                record_type_id: record_type.id.clone(),
            },
        }
    }

    /// Process models that are record action targets or subprocesses of another process.
    fn started_processes(&self, objects: &[AppObject]) -> HashSet<&'a str> {
        let mut started = HashSet::new();
        for object in objects {
            let raw_refs: Vec<&str> = match object.object_type {
                ObjectType::RecordType => object
                    .attr_list("actions")
                    .iter()
                    .filter_map(|a| str_at(a, "target_uuid"))
                    .collect(),
                ObjectType::ProcessModel => object
                    .attr_list("nodes")
                    .iter()
                    .filter_map(|n| str_at(n, "subprocess_uuid"))
                    .collect(),
                _ => continue,
            };
            for raw in raw_refs {
                if let Some(entry) = self.catalog.resolve_reference(raw) {
                    started.insert(entry.id.as_str());
                }
            }
        }
        started
    }
}

fn page_entry(record_type: &AppObject) -> Option<EntryPoint> {
    let views = record_type.attr_list("views");
    if !views.iter().any(|v| str_at(v, "ui_expr").is_some()) {
        return None;
    }
    Some(EntryPoint {
        id: record_type.id.clone(),
        name: record_type.name.clone(),
        kind: EntryPointKind::RecordTypePage,
        category: BundleCategory::Page,
        parent_name: None,
        detail: EntryPointDetail::Page {
            views: views.to_vec(),
        },
    })
}

fn plain_entry(object: &AppObject, kind: EntryPointKind, category: BundleCategory) -> EntryPoint {
    EntryPoint {
        id: object.id.clone(),
        name: object.name.clone(),
        kind,
        category,
        parent_name: None,
        detail: EntryPointDetail::Plain,
    }
}

pub(crate) fn str_at<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `"Submit"` → `Submit`; anything else is returned as written.
fn strip_string_literal(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|inner| !inner.is_empty())
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_titles_lose_their_quotes() {
        assert_eq!(strip_string_literal("\"Create Order\""), "Create Order");
        assert_eq!(strip_string_literal("  \"Padded\" "), "Padded");
        assert_eq!(strip_string_literal("a!concat(\"x\")"), "a!concat(\"x\")");
        assert_eq!(strip_string_literal("\"\""), "\"\"");
    }
}
