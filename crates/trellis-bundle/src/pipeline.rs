//! End-to-end run: caches → resolution → extraction → discovery → partition

use serde::Serialize;
use tracing::info;
use trellis_core::{
    AliasCollision, AppObject, DependencyEdge, DependencyGraph, EngineConfig, EntryPoint,
    LabelTable, Lookups,
};
use trellis_resolver::{DependencyExtractor, ReferenceResolver, ResolutionStats};

use crate::entry_points::EntryPointDiscovery;
use crate::partition::{Partition, PartitionSettings, Partitioner};
use crate::summary::AnalysisReport;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    /// Objects with their text fields resolved.
    pub objects: Vec<AppObject>,
    pub edges: Vec<DependencyEdge>,
    pub entry_points: Vec<EntryPoint>,
    pub partition: Partition,
    pub report: AnalysisReport,
    pub resolution: ResolutionStats,
    pub collisions: Vec<AliasCollision>,
}

pub fn analyze(mut objects: Vec<AppObject>, labels: LabelTable, config: &EngineConfig) -> AnalysisOutput {
    let lookups = Lookups::build(&objects, labels);
    let policies = config.policy_table();
    info!(
        "Built lookups: {} objects, {} record types, {} translations, {} labels",
        lookups.catalog.len(),
        lookups.schema.type_count(),
        lookups.translations.len(),
        lookups.labels.len()
    );

    let resolution = ReferenceResolver::new(&lookups, &policies, config).resolve_all(&mut objects, &config.locale);

    let edges = DependencyExtractor::new(&lookups.catalog, &policies).extract_all(&objects);
    let graph = DependencyGraph::from_edges(&edges);

    let entry_points = EntryPointDiscovery::new(&lookups.catalog).discover(&objects);
    let partition = Partitioner::new(
        &objects,
        &lookups.catalog,
        &policies,
        &graph,
        PartitionSettings::from(config),
    )
    .partition(&entry_points);

    let report = AnalysisReport::build(&lookups.catalog, &graph, &edges, &partition);
    let collisions = lookups.catalog.collisions().to_vec();

    AnalysisOutput {
        objects,
        edges,
        entry_points,
        partition,
        report,
        resolution,
        collisions,
    }
}

/// Resolve one text snippet against an object collection.
pub fn resolve_snippet(objects: &[AppObject], labels: LabelTable, config: &EngineConfig, text: &str) -> String {
    let lookups = Lookups::build(objects, labels);
    let policies = config.policy_table();
    ReferenceResolver::new(&lookups, &policies, config).resolve_text(text, &config.locale)
}
