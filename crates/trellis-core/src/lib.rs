//! Trellis core: object catalog, identifier handling, caches and dependency graph

pub mod catalog;
pub mod config;
pub mod error;
pub mod field_path;
pub mod graph;
pub mod identifiers;
pub mod input;
pub mod localization;
pub mod lookups;
pub mod model;
pub mod patterns;
pub mod policy;
pub mod schema;

#[cfg(test)]
pub mod tests;

#[cfg(test)]
pub mod test_utils;

pub use catalog::{AliasCollision, CatalogEntry, ObjectCatalog};
pub use config::EngineConfig;
pub use error::{Result, TrellisError};
pub use field_path::FieldPath;
pub use graph::DependencyGraph;
pub use identifiers::{base_id, canonical_id, is_identifier, same_object};
pub use input::{load_labels, load_objects, parse_objects};
pub use localization::{LabelTable, TranslationCache, select_translation};
pub use lookups::Lookups;
pub use model::{
    AppObject, BundleCategory, DependencyEdge, EdgeKind, EntryPoint, EntryPointDetail,
    EntryPointKind, ObjectType,
};
pub use policy::{PolicyTable, StructuralField, TypePolicy};
pub use schema::{Relationship, SchemaCache};
