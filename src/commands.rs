//! CLI command implementations

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use trellis_bundle::{AnalysisOutput, AnalysisReport, analyze as run_analysis, resolve_snippet};
use trellis_core::{
    AliasCollision, AppObject, DependencyEdge, EngineConfig, EntryPoint, load_labels, load_objects,
};
use trellis_resolver::ResolutionStats;

pub struct AnalyzeArgs {
    pub input: PathBuf,
    pub labels: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub locale: Option<String>,
    pub output: Option<PathBuf>,
    pub include_objects: bool,
}

/// JSON document written by `trellis analyze`.
#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    version: &'static str,
    locale: &'a str,
    summary: &'a AnalysisReport,
    resolution: ResolutionStats,
    bundles: Vec<BundleEntry<'a>>,
    /// Object id → bundle ids.
    assignments: &'a BTreeMap<String, Vec<String>>,
    dependencies: &'a [DependencyEdge],
    collisions: &'a [AliasCollision],
    #[serde(skip_serializing_if = "Option::is_none")]
    objects: Option<&'a [AppObject]>,
}

#[derive(Serialize)]
struct BundleEntry<'a> {
    id: &'a str,
    entry_point: &'a EntryPoint,
    roots: Vec<&'a str>,
    members: Vec<&'a str>,
}

fn load_config(path: Option<&Path>, locale: Option<String>) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(locale) = locale {
        config.locale = locale;
    }
    Ok(config)
}

pub fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.locale)?;
    let objects = load_objects(&args.input)
        .with_context(|| format!("Failed to load objects from {}", args.input.display()))?;
    let labels = load_labels(&args.labels);

    tracing::info!("Trellis v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Analyzing {} objects (locale {})", objects.len(), config.locale);

    let output = run_analysis(objects, labels, &config);
    let json = render_report(&output, &config, args.include_objects)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    let coverage = output.report.coverage;
    tracing::info!(
        "{} bundles, {} of {} objects bundled, {} orphans",
        output.partition.bundles.len(),
        coverage.objects_in_bundles,
        coverage.total_objects,
        coverage.orphaned_count
    );
    Ok(())
}

fn render_report(output: &AnalysisOutput, config: &EngineConfig, include_objects: bool) -> anyhow::Result<String> {
    let bundles = output
        .partition
        .bundles
        .iter()
        .map(|bundle| BundleEntry {
            id: &bundle.id,
            entry_point: &bundle.entry_point,
            roots: bundle.roots.iter().map(String::as_str).collect(),
            members: bundle.members.iter().map(String::as_str).collect(),
        })
        .collect();

    let report = Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        locale: &config.locale,
        summary: &output.report,
        resolution: output.resolution,
        bundles,
        assignments: &output.partition.assignments,
        dependencies: &output.edges,
        collisions: &output.collisions,
        objects: include_objects.then_some(output.objects.as_slice()),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}

pub fn resolve(
    input: PathBuf,
    text: String,
    labels: Vec<PathBuf>,
    config: Option<PathBuf>,
    locale: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config(config.as_deref(), locale)?;
    let objects = load_objects(&input)
        .with_context(|| format!("Failed to load objects from {}", input.display()))?;
    let labels = load_labels(&labels);

    println!("{}", resolve_snippet(&objects, labels, &config, &text));
    Ok(())
}
