//! CLI subcommand handlers.

use crate::CatalogAction;
use crate::Commands;
use crate::ConfigAction;
use crate::OutputFormat;
use crate::session::{ConsoleSink, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vahana_core::{
    Catalog, ComparisonMatrix, NotificationSink, TracingSink, VahanaConfig, ViewOptions,
    render_html, render_text,
};

/// Handle a CLI subcommand.
pub fn handle_command(
    command: Commands,
    workspace: &Path,
    catalog_override: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace),
        Commands::Catalog { action } => {
            let (config, catalog) = load_context(workspace, catalog_override)?;
            handle_catalog(action, &config, &catalog)
        }
        Commands::Compare {
            ids,
            sort,
            diff_only,
            format,
        } => {
            let (config, catalog) = load_context(workspace, catalog_override)?;
            let mut view = config.initial_view();
            if let Some(sort) = sort {
                view.sort = sort;
            }
            view.diff_only |= diff_only;

            // Quiet runs still record notifications in the log.
            let sink: Arc<dyn NotificationSink> = if quiet {
                Arc::new(TracingSink)
            } else {
                Arc::new(ConsoleSink)
            };
            let matrix = compare(&config, &catalog, &ids, view, sink)?;
            println!("{}", render_matrix(&matrix, format)?);
            Ok(())
        }
        Commands::Session => {
            let (config, catalog) = load_context(workspace, catalog_override)?;
            Session::new(&config, catalog, Arc::new(ConsoleSink)).run()
        }
    }
}

/// Load configuration and the catalog it points at.
fn load_context(
    workspace: &Path,
    catalog_override: Option<&Path>,
) -> anyhow::Result<(VahanaConfig, Catalog)> {
    let config = vahana_core::config::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let path = catalog_path(workspace, catalog_override, &config);
    let catalog = Catalog::load_or_builtin(path.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;
    tracing::debug!(vehicles = catalog.len(), "catalog ready");
    Ok((config, catalog))
}

/// The catalog file to load, if any. Relative config paths resolve against the
/// workspace; a path given on the command line is used as is.
fn catalog_path(
    workspace: &Path,
    catalog_override: Option<&Path>,
    config: &VahanaConfig,
) -> Option<PathBuf> {
    if let Some(path) = catalog_override {
        return Some(path.to_path_buf());
    }
    config.catalog.path.as_ref().map(|p| {
        if p.is_absolute() {
            p.clone()
        } else {
            workspace.join(p)
        }
    })
}

/// Select `ids` in order through a fresh store and build the matrix.
///
/// Unknown ids are an error. Duplicate and over-capacity ids are reported through
/// `sink` and otherwise skipped, as they would be in an interactive session.
pub fn compare(
    config: &VahanaConfig,
    catalog: &Catalog,
    ids: &[String],
    view: ViewOptions,
    sink: Arc<dyn NotificationSink>,
) -> anyhow::Result<ComparisonMatrix> {
    let store = config.selection_store(sink);
    for id in ids {
        store.add(catalog.require(id)?);
    }
    Ok(config.matrix_builder().build(&store.list(), view))
}

pub fn render_matrix(matrix: &ComparisonMatrix, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(matrix),
        OutputFormat::Json => serde_json::to_string_pretty(matrix)?,
        OutputFormat::Html => render_html(matrix),
    })
}

fn handle_catalog(
    action: CatalogAction,
    config: &VahanaConfig,
    catalog: &Catalog,
) -> anyhow::Result<()> {
    match action {
        CatalogAction::List { query } => {
            let vehicles = catalog.search(query.as_deref().unwrap_or_default());
            if vehicles.is_empty() {
                println!("No vehicles match.");
                return Ok(());
            }
            println!("Vehicles ({}):", vehicles.len());
            for v in &vehicles {
                println!(
                    "  {:<26} {:<14} {:<18} {:<10} {}",
                    v.id,
                    v.brand,
                    v.name,
                    v.category,
                    config.currency.format(&v.price.on_road)
                );
            }
            Ok(())
        }
        CatalogAction::Show { id } => {
            let vehicle = catalog.require(&id)?;
            println!("{}", serde_json::to_string_pretty(vehicle.as_ref())?);
            Ok(())
        }
    }
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            match vahana_core::config::write_default_config(workspace)? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!(
                    "Configuration file already exists at: {}",
                    vahana_core::config::workspace_config_path(workspace).display()
                ),
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = vahana_core::config::load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            println!("{}", config_sources_header(workspace));
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
        ConfigAction::Check { path } => {
            let path =
                path.unwrap_or_else(|| vahana_core::config::workspace_config_path(workspace));
            vahana_core::config::load_config_file(&path)?;
            println!("Configuration OK: {}", path.display());
            Ok(())
        }
    }
}

/// TOML comment lines naming the files `config show` merged.
fn config_sources_header(workspace: &Path) -> String {
    if !vahana_core::config::config_exists(Some(workspace)) {
        return "# No configuration file found; showing built-in defaults".to_string();
    }
    vahana_core::config::config_files(Some(workspace))
        .iter()
        .map(|p| format!("# Loaded from: {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
