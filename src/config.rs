use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{GraphError, Result};

/// Name of the configuration file stored inside the `.notegraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store workspace metadata.
pub const NOTEGRAPH_DIR: &str = ".notegraph";

/// How the connection index is kept in sync with the resource store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// The owner calls `rebuild` after mutating the store.
    #[default]
    Manual,
    /// Every store mutation triggers a full rebuild.
    Monitored,
}

/// What a bare wikilink key resolves to when several resources match it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Pick the candidate with the smallest path.
    #[default]
    Alphabetical,
    /// Leave the link unresolved, pointing it at a placeholder for the key.
    Unresolved,
}

/// Configuration for a notegraph workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Root that absolute link paths are resolved against. Empty means the
    /// identity root itself.
    pub root_dir: String,
    /// Extension appended to extensionless path links, including the dot.
    pub default_extension: String,
    /// Whether identities differing only in case are distinct.
    pub case_sensitive: bool,
    pub mode: ResolutionMode,
    pub ambiguity: AmbiguityPolicy,
    /// Glob patterns for resources skipped when loading snapshots.
    pub exclude: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            root_dir: String::new(),
            default_extension: ".md".to_string(),
            case_sensitive: true,
            mode: ResolutionMode::Manual,
            ambiguity: AmbiguityPolicy::Alphabetical,
            exclude: vec![
                ".git/**".to_string(),
                ".notegraph/**".to_string(),
                "node_modules/**".to_string(),
                "**/_layouts/**".to_string(),
            ],
        }
    }
}

/// Returns the path to the `.notegraph` directory within the given workspace root.
pub fn get_notegraph_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(NOTEGRAPH_DIR)
}

/// Returns the path to the configuration file within the `.notegraph` directory.
pub fn get_config_path(workspace_root: &Path) -> PathBuf {
    get_notegraph_dir(workspace_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default
/// configuration.
pub fn load_config(workspace_root: &Path) -> Result<WorkspaceConfig> {
    let config_path = get_config_path(workspace_root);

    if !config_path.exists() {
        return Ok(WorkspaceConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| GraphError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: WorkspaceConfig =
        serde_json::from_str(&contents).map_err(|e| GraphError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    if !config.default_extension.starts_with('.') {
        return Err(GraphError::Config {
            message: format!(
                "default_extension must start with '.', got '{}'",
                config.default_extension
            ),
        });
    }

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(workspace_root: &Path, config: &WorkspaceConfig) -> Result<()> {
    let notegraph_dir = get_notegraph_dir(workspace_root);
    fs::create_dir_all(&notegraph_dir).map_err(|e| GraphError::Config {
        message: format!(
            "failed to create notegraph directory '{}': {}",
            notegraph_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(workspace_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| GraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| GraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| GraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Determines whether a resource path survives the configured exclude
/// patterns. Leading slashes are ignored so that `/docs/a.md` and
/// `docs/a.md` are matched alike.
pub fn should_include_resource(path: &str, config: &WorkspaceConfig) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: config.case_sensitive,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let relative = path.trim_start_matches('/');

    for pattern_str in &config.exclude {
        if let Ok(pattern) = Pattern::new(pattern_str) {
            if pattern.matches_with(relative, match_opts) {
                return false;
            }
        }
    }

    true
}
