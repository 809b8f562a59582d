//! Trellis CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Cross-reference resolution and dependency bundling for exported application objects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve references, extract dependencies and partition into bundles
    Analyze {
        /// Object collection (JSON array or {"objects": [...]})
        #[arg(short, long)]
        input: PathBuf,

        /// Label property files (key=value)
        #[arg(short, long)]
        labels: Vec<PathBuf>,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output locale, overrides the configuration
        #[arg(long)]
        locale: Option<String>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include the resolved objects in the report
        #[arg(long)]
        include_objects: bool,
    },
    /// Resolve a single text snippet against an object collection
    Resolve {
        #[arg(short, long)]
        input: PathBuf,

        /// Text to resolve
        #[arg(short, long)]
        text: String,

        #[arg(short, long)]
        labels: Vec<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        locale: Option<String>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("trellis={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            labels,
            config,
            locale,
            output,
            include_objects,
        } => commands::analyze(commands::AnalyzeArgs {
            input,
            labels,
            config,
            locale,
            output,
            include_objects,
        }),
        Commands::Resolve {
            input,
            text,
            labels,
            config,
            locale,
        } => commands::resolve(input, text, labels, config, locale),
        Commands::Version => {
            println!("Trellis v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
