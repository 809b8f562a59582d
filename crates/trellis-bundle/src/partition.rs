//! Entry-point-rooted reachability with stop-type and hub pruning

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use trellis_core::{
    AppObject, DependencyGraph, EngineConfig, EntryPoint, EntryPointDetail, EntryPointKind,
    ObjectCatalog, ObjectType, PolicyTable,
};
use trellis_resolver::ReferenceScanner;

use crate::entry_points::str_at;

const MAX_BUNDLE_ID_LEN: usize = 80;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static pattern should compile"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern should compile"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSettings {
    pub stop_types: Vec<ObjectType>,
    pub hub_types: Vec<ObjectType>,
    pub hub_threshold: usize,
}

impl From<&EngineConfig> for PartitionSettings {
    fn from(config: &EngineConfig) -> Self {
        PartitionSettings {
            stop_types: config.stop_types.clone(),
            hub_types: config.hub_types.clone(),
            hub_threshold: config.hub_threshold,
        }
    }
}

impl Default for PartitionSettings {
    fn default() -> Self {
        PartitionSettings::from(&EngineConfig::default())
    }
}

/// One entry point and the objects reachable from it.
#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    pub id: String,
    pub entry_point: EntryPoint,
    pub roots: BTreeSet<String>,
    pub members: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Partition {
    pub bundles: Vec<Bundle>,
    /// Object id → ids of the bundles it belongs to, in bundle order.
    pub assignments: BTreeMap<String, Vec<String>>,
    /// Catalog objects in no bundle, in catalog order.
    pub orphans: Vec<String>,
}

impl Partition {
    pub fn bundle(&self, id: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.id == id)
    }
}

pub struct Partitioner<'a> {
    catalog: &'a ObjectCatalog,
    graph: &'a DependencyGraph,
    scanner: ReferenceScanner<'a>,
    objects: HashMap<&'a str, &'a AppObject>,
    settings: PartitionSettings,
    hubs: HashSet<&'a str>,
}

impl<'a> Partitioner<'a> {
    pub fn new(
        objects: &'a [AppObject],
        catalog: &'a ObjectCatalog,
        policies: &'a PolicyTable,
        graph: &'a DependencyGraph,
        settings: PartitionSettings,
    ) -> Self {
        let hubs: HashSet<&'a str> = catalog
            .entries()
            .iter()
            .filter(|e| settings.hub_types.contains(&e.object_type))
            .filter(|e| graph.inbound_count(&e.id) >= settings.hub_threshold)
            .map(|e| e.id.as_str())
            .collect();
        if !hubs.is_empty() {
            debug!("{} hub objects at threshold {}", hubs.len(), settings.hub_threshold);
        }

        let mut by_id = HashMap::with_capacity(objects.len());
        for object in objects {
            by_id.entry(object.id.as_str()).or_insert(object);
        }

        Partitioner {
            catalog,
            graph,
            scanner: ReferenceScanner::new(catalog, policies),
            objects: by_id,
            settings,
            hubs,
        }
    }

    pub fn is_hub(&self, id: &str) -> bool {
        self.hubs.contains(id)
    }

    /// Category-specific starting set for one entry point.
    pub fn root_ids(&self, entry_point: &EntryPoint) -> BTreeSet<String> {
        let mut roots = BTreeSet::new();
        if self.catalog.contains(&entry_point.id) {
            roots.insert(entry_point.id.clone());
        }

        match (&entry_point.detail, entry_point.kind) {
            (EntryPointDetail::Action { action, record_type_id }, _) => {
                self.add_target(str_at(action, "target_uuid"), &mut roots);
                if let Some(expressions) = action.get("expressions").and_then(Value::as_object) {
                    for text in expressions.values().filter_map(Value::as_str) {
                        self.add_text_refs(text, &mut roots);
                    }
                }
                roots.remove(record_type_id);
            }
            (EntryPointDetail::Page { views }, _) => {
                for view in views {
                    for field in ["ui_expr", "visibility_expr"] {
                        if let Some(text) = str_at(view, field) {
                            self.add_text_refs(text, &mut roots);
                        }
                    }
                }
            }
            (EntryPointDetail::Plain, EntryPointKind::Site) => {
                if let Some(site) = self.objects.get(entry_point.id.as_str()) {
                    for page in site.attr_list("pages") {
                        self.add_page(page, &mut roots);
                    }
                }
            }
            (EntryPointDetail::Plain, EntryPointKind::ControlPanel) => {
                if let Some(panel) = self.objects.get(entry_point.id.as_str()) {
                    for list in ["interfaces", "custom_pages"] {
                        for item in panel.attr_list(list) {
                            self.add_target(str_at(item, "interface_uuid"), &mut roots);
                        }
                    }
                    self.add_target(panel.attr_str("primary_record_type_uuid"), &mut roots);
                }
            }
            _ => {}
        }
        roots
    }

    fn add_target(&self, raw: Option<&str>, roots: &mut BTreeSet<String>) {
        if let Some(entry) = raw.and_then(|r| self.catalog.resolve_reference(r)) {
            roots.insert(entry.id.clone());
        }
    }

    fn add_text_refs(&self, text: &str, roots: &mut BTreeSet<String>) {
        for hit in self.scanner.root_references(text) {
            roots.insert(hit.target.id.clone());
        }
    }

    fn add_page(&self, page: &Value, roots: &mut BTreeSet<String>) {
        let target = str_at(page, "ui_object_uuid").or_else(|| str_at(page, "target_uuid"));
        self.add_target(target, roots);
        if let Some(children) = page.get("children").and_then(Value::as_array) {
            for child in children {
                self.add_page(child, roots);
            }
        }
    }

    /// Breadth-first walk from `roots`. Stop types and non-root hubs are
    /// included but not expanded. Only catalog objects are returned.
    pub fn reachable(&self, roots: &BTreeSet<String>) -> BTreeSet<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = roots.iter().map(String::as_str).collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if self.is_stop_type(current) || (self.is_hub(current) && !roots.contains(current)) {
                continue;
            }
            for next in self.graph.outgoing(current) {
                if !visited.contains(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
            .into_iter()
            .filter(|id| self.catalog.contains(id))
            .map(str::to_string)
            .collect()
    }

    fn is_stop_type(&self, id: &str) -> bool {
        self.catalog
            .object_type(id)
            .is_some_and(|t| self.settings.stop_types.contains(t))
    }

    /// Partition every entry point. Traversals run in parallel. Bundles are
    /// ordered by (category, sanitized name, entry id, name) before ids are
    /// assigned, so collision suffixes do not depend on input order.
    pub fn partition(&self, entry_points: &[EntryPoint]) -> Partition {
        let mut walks: Vec<(&EntryPoint, String, BTreeSet<String>, BTreeSet<String>)> = entry_points
            .par_iter()
            .map(|ep| {
                let roots = self.root_ids(ep);
                let mut members = self.reachable(&roots);
                members.extend(roots.iter().cloned());
                (ep, sanitize_bundle_id(&ep.name), roots, members)
            })
            .collect();
        walks.sort_by(|(a, a_base, ..), (b, b_base, ..)| {
            (a.category, a_base, &a.id, &a.name).cmp(&(b.category, b_base, &b.id, &b.name))
        });

        let mut used = HashSet::new();
        let mut partition = Partition::default();
        for (entry_point, base, roots, members) in walks {
            let id = unique_bundle_id(base, &mut used);
            for member in &members {
                partition
                    .assignments
                    .entry(member.clone())
                    .or_default()
                    .push(id.clone());
            }
            debug!("Bundle {}: {} roots, {} members", id, roots.len(), members.len());
            partition.bundles.push(Bundle {
                id,
                entry_point: entry_point.clone(),
                roots,
                members,
            });
        }

        partition.orphans = self
            .catalog
            .entries()
            .iter()
            .filter(|e| !partition.assignments.contains_key(&e.id))
            .map(|e| e.id.clone())
            .collect();

        info!(
            "Partitioned {} objects into {} bundles ({} orphans)",
            self.catalog.len(),
            partition.bundles.len(),
            partition.orphans.len()
        );
        partition
    }
}

/// Filesystem-safe bundle id: punctuation dropped, whitespace runs → `_`.
pub fn sanitize_bundle_id(name: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(name, "");
    let joined = WHITESPACE.replace_all(cleaned.trim(), "_");
    let id: String = joined.chars().take(MAX_BUNDLE_ID_LEN).collect();
    if id.is_empty() { "unnamed".to_string() } else { id }
}

fn unique_bundle_id(base: String, used: &mut HashSet<String>) -> String {
    let mut id = base.clone();
    let mut counter = 2;
    while used.contains(&id) {
        id = format!("{base}_{counter}");
        counter += 1;
    }
    used.insert(id.clone());
    id
}
