//! Report material derived from a partition: bundle summaries, coverage,
//! orphans and dependency totals.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use trellis_core::{
    BundleCategory, DependencyEdge, DependencyGraph, EdgeKind, EntryPointKind, ObjectCatalog,
};

use crate::partition::{Bundle, Partition};

const KEY_OBJECT_COUNT: usize = 5;
const TOP_DEPENDENCY_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleSummary {
    pub id: String,
    pub category: BundleCategory,
    pub kind: EntryPointKind,
    pub root_name: String,
    pub parent_name: Option<String>,
    pub object_count: usize,
    pub counts_by_type: BTreeMap<String, usize>,
    /// Most connected members by edges inside the bundle.
    pub key_objects: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub total_objects: usize,
    pub objects_in_bundles: usize,
    pub orphaned_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedObject {
    pub id: String,
    pub name: String,
    pub object_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencySummary {
    pub total: usize,
    pub by_kind: BTreeMap<EdgeKind, usize>,
    pub most_depended_on: Vec<RankedObject>,
    pub most_dependencies: Vec<RankedObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Collection key (`expression_rules`, `processes`, ...) → object count.
    pub object_counts: BTreeMap<String, usize>,
    pub coverage: Coverage,
    pub dependencies: DependencySummary,
    pub bundles: Vec<BundleSummary>,
    /// Object type → orphans sorted by name.
    pub orphans: BTreeMap<String, Vec<ObjectRef>>,
}

impl AnalysisReport {
    pub fn build(
        catalog: &ObjectCatalog,
        graph: &DependencyGraph,
        edges: &[DependencyEdge],
        partition: &Partition,
    ) -> Self {
        let mut object_counts = BTreeMap::new();
        for entry in catalog.entries() {
            *object_counts.entry(entry.object_type.collection_key()).or_insert(0) += 1;
        }
        AnalysisReport {
            object_counts,
            coverage: coverage(catalog, partition),
            dependencies: summarize_dependencies(edges),
            bundles: summarize_bundles(partition, catalog, graph),
            orphans: orphans_by_type(partition, catalog),
        }
    }
}

pub fn summarize_bundle(bundle: &Bundle, catalog: &ObjectCatalog, graph: &DependencyGraph) -> BundleSummary {
    let mut counts_by_type = BTreeMap::new();
    let mut ranked = Vec::with_capacity(bundle.members.len());
    for id in &bundle.members {
        let Some(entry) = catalog.get_exact(id) else {
            continue;
        };
        *counts_by_type.entry(entry.object_type.to_string()).or_insert(0) += 1;
        ranked.push((graph.degree_within(id, &bundle.members), entry.name.as_str(), id.as_str()));
    }
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    BundleSummary {
        id: bundle.id.clone(),
        category: bundle.entry_point.category,
        kind: bundle.entry_point.kind,
        root_name: bundle.entry_point.name.clone(),
        parent_name: bundle.entry_point.parent_name.clone(),
        object_count: ranked.len(),
        counts_by_type,
        key_objects: ranked
            .into_iter()
            .take(KEY_OBJECT_COUNT)
            .map(|(_, name, _)| name.to_string())
            .collect(),
    }
}

/// Summaries sorted by (category, root name).
pub fn summarize_bundles(
    partition: &Partition,
    catalog: &ObjectCatalog,
    graph: &DependencyGraph,
) -> Vec<BundleSummary> {
    let mut summaries: Vec<BundleSummary> = partition
        .bundles
        .iter()
        .map(|b| summarize_bundle(b, catalog, graph))
        .collect();
    summaries.sort_by(|a, b| (a.category, &a.root_name, &a.id).cmp(&(b.category, &b.root_name, &b.id)));
    summaries
}

pub fn coverage(catalog: &ObjectCatalog, partition: &Partition) -> Coverage {
    let total_objects = catalog.len();
    let orphaned_count = partition.orphans.len();
    Coverage {
        total_objects,
        objects_in_bundles: total_objects - orphaned_count,
        orphaned_count,
    }
}

pub fn orphans_by_type(partition: &Partition, catalog: &ObjectCatalog) -> BTreeMap<String, Vec<ObjectRef>> {
    let mut grouped: BTreeMap<String, Vec<ObjectRef>> = BTreeMap::new();
    for entry in partition.orphans.iter().filter_map(|id| catalog.get_exact(id)) {
        grouped
            .entry(entry.object_type.to_string())
            .or_default()
            .push(ObjectRef {
                id: entry.id.clone(),
                name: entry.name.clone(),
            });
    }
    for list in grouped.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }
    grouped
}

pub fn summarize_dependencies(edges: &[DependencyEdge]) -> DependencySummary {
    let mut by_kind = BTreeMap::new();
    let mut inbound: HashMap<&str, (usize, &DependencyEdge)> = HashMap::new();
    let mut outbound: HashMap<&str, (usize, &DependencyEdge)> = HashMap::new();
    for edge in edges {
        *by_kind.entry(edge.kind).or_insert(0) += 1;
        inbound.entry(edge.target_id.as_str()).or_insert((0, edge)).0 += 1;
        outbound.entry(edge.source_id.as_str()).or_insert((0, edge)).0 += 1;
    }

    DependencySummary {
        total: edges.len(),
        by_kind,
        most_depended_on: rank(inbound, |e| {
            (&e.target_id, &e.target_name, e.target_type.to_string())
        }),
        most_dependencies: rank(outbound, |e| {
            (&e.source_id, &e.source_name, e.source_type.to_string())
        }),
    }
}

fn rank<F>(counts: HashMap<&str, (usize, &DependencyEdge)>, describe: F) -> Vec<RankedObject>
where
    F: Fn(&DependencyEdge) -> (&String, &String, String),
{
    let mut ranked: Vec<RankedObject> = counts
        .into_values()
        .map(|(count, edge)| {
            let (id, name, object_type) = describe(edge);
            RankedObject {
                id: id.clone(),
                name: name.clone(),
                object_type,
                count,
            }
        })
        .collect();
    ranked.sort_by_key(|r| (Reverse(r.count), r.name.clone(), r.id.clone()));
    ranked.truncate(TOP_DEPENDENCY_COUNT);
    ranked
}
