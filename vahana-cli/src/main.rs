//! Vahana CLI: compare two-wheelers side by side from the terminal.
//!
//! Provides one-shot comparisons and an interactive comparison session.

mod commands;
mod session;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use vahana_core::SortKey;

/// Vahana: compare vehicles side by side
#[derive(Parser, Debug)]
#[command(name = "vahana", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Vehicle catalog JSON file (overrides `catalog.path`)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Browse the vehicle catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Compare vehicles by id and print the comparison matrix
    Compare {
        /// Vehicle ids, in selection order
        #[arg(required = true)]
        ids: Vec<String>,

        /// Column order: none, price-asc, price-desc, mileage-desc
        #[arg(short, long)]
        sort: Option<SortKey>,

        /// Only show rows where the vehicles differ
        #[arg(short, long)]
        diff_only: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Start an interactive comparison session
    Session,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum CatalogAction {
    /// List vehicles, optionally filtered by a search term
    List {
        /// Case-insensitive match on name, brand, category or id
        query: Option<String>,
    },
    /// Show one vehicle record as JSON
    Show {
        /// Vehicle id
        id: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Show current configuration and the files it was read from
    Show,
    /// Validate a single configuration file (defaults to the workspace file)
    Check {
        /// Configuration file path
        path: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "vahana", "vahana")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "vahana.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace, cli.catalog.as_deref(), cli.quiet)
}
