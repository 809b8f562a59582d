//! Typed dependency edges from text fields and structural foreign keys

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};
use trellis_core::{AppObject, CatalogEntry, DependencyEdge, EdgeKind, ObjectCatalog, PolicyTable};

use crate::references::ReferenceScanner;

pub struct DependencyExtractor<'a> {
    catalog: &'a ObjectCatalog,
    policies: &'a PolicyTable,
    scanner: ReferenceScanner<'a>,
}

/// Per-object edge accumulator: one edge per target, self-references dropped.
struct EdgeSink<'o> {
    source: &'o AppObject,
    seen: HashSet<String>,
    edges: Vec<DependencyEdge>,
}

impl<'o> EdgeSink<'o> {
    fn new(source: &'o AppObject) -> Self {
        EdgeSink {
            source,
            seen: HashSet::new(),
            edges: Vec::new(),
        }
    }

    fn push(&mut self, target: &CatalogEntry, kind: EdgeKind, context: &str) {
        if target.id == self.source.id || !self.seen.insert(target.id.clone()) {
            return;
        }
        self.edges.push(DependencyEdge {
            source_id: self.source.id.clone(),
            source_name: self.source.name.clone(),
            source_type: self.source.object_type.clone(),
            target_id: target.id.clone(),
            target_name: target.name.clone(),
            target_type: target.object_type.clone(),
            kind,
            context: context.to_string(),
            resolved: true,
        });
    }
}

impl<'a> DependencyExtractor<'a> {
    pub fn new(catalog: &'a ObjectCatalog, policies: &'a PolicyTable) -> Self {
        DependencyExtractor {
            catalog,
            policies,
            scanner: ReferenceScanner::new(catalog, policies),
        }
    }

    /// Text fields first (named, URN, identifier families), then structural fields.
    pub fn extract(&self, object: &AppObject) -> Vec<DependencyEdge> {
        let policy = self.policies.policy(&object.object_type);
        let mut sink = EdgeSink::new(object);

        for path in &policy.code_fields {
            for text in path.collect(&object.attributes) {
                if text.is_empty() {
                    continue;
                }
                for hit in self.scanner.references(text) {
                    sink.push(hit.target, hit.kind, path.as_str());
                }
            }
        }

        for field in &policy.structural_fields {
            for value in field.path.collect(&object.attributes) {
                if let Some(target) = self.catalog.resolve_reference(value) {
                    sink.push(target, field.kind, field.path.as_str());
                }
            }
        }

        if !sink.edges.is_empty() {
            debug!("{} ({}): {} dependencies", object.name, object.object_type, sink.edges.len());
        }
        sink.edges
    }

    /// Extract for every object in parallel; edges keep input order.
    pub fn extract_all(&self, objects: &[AppObject]) -> Vec<DependencyEdge> {
        let per_object: Vec<Vec<DependencyEdge>> =
            objects.par_iter().map(|object| self.extract(object)).collect();
        let edges: Vec<DependencyEdge> = per_object.into_iter().flatten().collect();
        info!("Extracted {} dependency edges from {} objects", edges.len(), objects.len());
        edges
    }
}
