//! Entry-point discovery, reachability partitioning and analysis reports

pub mod entry_points;
pub mod partition;
pub mod pipeline;
pub mod summary;


pub use entry_points::EntryPointDiscovery;
pub use partition::{Bundle, Partition, PartitionSettings, Partitioner, sanitize_bundle_id};
pub use pipeline::{AnalysisOutput, analyze, resolve_snippet};
pub use summary::{AnalysisReport, BundleSummary, Coverage, DependencySummary, ObjectRef, RankedObject};
