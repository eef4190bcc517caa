//! Configuration system for Vahana.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment -> explicit overrides.
//! Configuration is loaded from `~/.config/vahana/config.toml` and/or
//! `.vahana/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use crate::error::ConfigError;
use crate::facts::{FactRow, FactRowConfig, rows_from_config};
use crate::format::CurrencyConfig;
use crate::matrix::{DEFAULT_VISUAL_MAX, MatrixBuilder, SortKey, ViewOptions};
use crate::notify::NotificationSink;
use crate::selection::{DEFAULT_MAX_COMPARISON, SelectionStore};

const CONFIG_DIR: &str = ".vahana";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VahanaConfig {
    pub selection: SelectionConfig,
    pub matrix: MatrixConfig,
    pub currency: CurrencyConfig,
    pub catalog: CatalogConfig,
}

/// Selection store limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Maximum number of vehicles compared at once.
    pub max_comparison: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_comparison: DEFAULT_MAX_COMPARISON,
        }
    }
}

/// Comparison matrix layout and initial view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Number of display slots; independent of `selection.max_comparison`.
    pub visual_max: usize,
    pub default_sort: SortKey,
    pub diff_only: bool,
    /// Custom fact rows. When empty the built-in rows are used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<FactRowConfig>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            visual_max: DEFAULT_VISUAL_MAX,
            default_sort: SortKey::None,
            diff_only: false,
            rows: Vec::new(),
        }
    }
}

/// Where the vehicle catalog comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file. The bundled catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl VahanaConfig {
    /// Problems that make the configuration unusable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.selection.max_comparison == 0 {
            problems.push("selection.max_comparison must be at least 1".to_string());
        }
        if self.matrix.visual_max == 0 {
            problems.push("matrix.visual_max must be at least 1".to_string());
        }
        if self.currency.symbol.trim().is_empty() {
            problems.push("currency.symbol must not be empty".to_string());
        }
        for (i, row) in self.matrix.rows.iter().enumerate() {
            if row.path.trim().is_empty() {
                problems.push(format!("matrix.rows[{i}].path must not be empty"));
            }
        }

        problems
    }

    /// Non-fatal observations worth logging.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.selection.max_comparison > self.matrix.visual_max {
            warnings.push(format!(
                "selection.max_comparison ({}) exceeds matrix.visual_max ({}); extra vehicles will not be shown",
                self.selection.max_comparison, self.matrix.visual_max
            ));
        }
        warnings
    }

    pub fn fact_rows(&self) -> Vec<FactRow> {
        rows_from_config(&self.matrix.rows, &self.currency)
    }

    pub fn matrix_builder(&self) -> MatrixBuilder {
        MatrixBuilder::new(self.fact_rows())
            .with_visual_max(self.matrix.visual_max)
            .with_currency(self.currency.clone())
    }

    pub fn selection_store(&self, sink: Arc<dyn NotificationSink>) -> SelectionStore {
        SelectionStore::with_sink(self.selection.max_comparison, sink)
    }

    /// The view the comparison screen opens with.
    pub fn initial_view(&self) -> ViewOptions {
        ViewOptions {
            sort: self.matrix.default_sort,
            diff_only: self.matrix.diff_only,
        }
    }
}

/// Path of the workspace-level configuration file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(CONFIG_DIR).join(CONFIG_FILE)
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "vahana", "vahana")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `VAHANA_`)
/// 3. Workspace-local config (`.vahana/config.toml`)
/// 4. User config (`~/.config/vahana/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&VahanaConfig>,
) -> Result<VahanaConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(VahanaConfig::default()));

    for file in config_files(workspace) {
        figment = figment.merge(Toml::file(&file));
    }

    // VAHANA_SELECTION__MAX_COMPARISON, VAHANA_MATRIX__DEFAULT_SORT, ...
    figment = figment.merge(Env::prefixed("VAHANA_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: VahanaConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;

    let problems = config.validate();
    if !problems.is_empty() {
        return Err(ConfigError::Invalid {
            message: problems.join("; "),
        });
    }
    for warning in config.warnings() {
        warn!("{warning}");
    }
    Ok(config)
}

/// Load a single configuration file with no other layers.
pub fn load_config_file(path: &Path) -> Result<VahanaConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let config: VahanaConfig = Figment::from(Serialized::defaults(VahanaConfig::default()))
        .merge(Toml::file(path))
        .extract()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
    let problems = config.validate();
    if problems.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Invalid {
            message: problems.join("; "),
        })
    }
}

/// Configuration files that [`load_config`] would read, lowest priority first.
pub fn config_files(workspace: Option<&Path>) -> Vec<PathBuf> {
    user_config_path()
        .into_iter()
        .chain(workspace.map(workspace_config_path))
        .filter(|p| p.exists())
        .collect()
}

/// Whether any configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    !config_files(workspace).is_empty()
}

/// Write the default configuration to `<workspace>/.vahana/config.toml`.
///
/// Returns `Ok(None)` without touching anything if the file already exists.
pub fn write_default_config(workspace: &Path) -> crate::error::Result<Option<PathBuf>> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        return Ok(None);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(&VahanaConfig::default()).map_err(|e| {
        ConfigError::ParseError {
            message: e.to_string(),
        }
    })?;
    std::fs::write(&path, toml_str)?;
    Ok(Some(path))
}
