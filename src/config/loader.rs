//! Configuration loader with tier-based merging.

use super::merge::merge_tiers;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults
    Defaults = 0,
    /// `./prefab-estimate/config.yaml`
    Project = 1,
    /// `~/.prefab-estimate/config.yaml`
    User = 2,
    /// `PREFAB_ESTIMATE_*` variables
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Locations searched for configuration files.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// A single file that replaces the project and user tiers.
    pub explicit: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let explicit = std::env::var("PREFAB_ESTIMATE_CONFIG_PATH")
            .ok()
            .map(PathBuf::from);

        let project_dir = std::env::var("PREFAB_ESTIMATE_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("prefab-estimate")));

        let user_dir = std::env::var("PREFAB_ESTIMATE_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".prefab-estimate")));

        Self {
            explicit,
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            explicit: None,
            project_dir,
            user_dir,
        }
    }

    /// Use a single file instead of the project and user tiers.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
            project_dir: None,
            user_dir: None,
        }
    }
}

/// Read a YAML tier file. Missing files are skipped; malformed ones are
/// logged and skipped.
fn read_tier(path: &Path, tier: ConfigTier) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(%tier, path = %path.display(), "cannot read config file: {}", e);
            return None;
        }
    };
    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) => {
            debug!(%tier, path = %path.display(), "loaded config tier");
            Some(value)
        }
        Err(e) => {
            warn!(%tier, path = %path.display(), "ignoring malformed config file: {}", e);
            None
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// Tiers that contributed, with the file they came from.
    sources: Vec<(ConfigTier, Option<PathBuf>)>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        let mut tiers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = vec![(ConfigTier::Defaults, None)];

        if let Some(ref explicit) = paths.explicit {
            // An explicit file must exist and parse.
            let content = std::fs::read_to_string(explicit)
                .with_context(|| format!("reading config file {}", explicit.display()))?;
            let value: Value = serde_yaml::from_str(&content)
                .with_context(|| format!("parsing config file {}", explicit.display()))?;
            tiers.push(value);
            sources.push((ConfigTier::Project, Some(explicit.clone())));
        } else {
            for (tier, dir) in [
                (ConfigTier::Project, &paths.project_dir),
                (ConfigTier::User, &paths.user_dir),
            ] {
                let Some(dir) = dir else { continue };
                let file = dir.join(CONFIG_FILE);
                if let Some(value) = read_tier(&file, tier) {
                    tiers.push(value);
                    sources.push((tier, Some(file)));
                }
            }
        }

        let overrides = Self::env_overrides();
        if overrides.as_object().is_some_and(|o| !o.is_empty()) {
            tiers.push(overrides);
            sources.push((ConfigTier::Environment, None));
        }

        let config: Config = serde_json::from_value(merge_tiers(tiers))
            .context("invalid configuration")?;

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    /// Environment variable overrides as a merge tier.
    fn env_overrides() -> Value {
        let mut overlay = json!({});

        if let Ok(endpoint) = std::env::var("PREFAB_ESTIMATE_ENDPOINT") {
            overlay["pricing"]["endpoint"] = json!(endpoint);
        }

        if let Ok(timeout) = std::env::var("PREFAB_ESTIMATE_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => overlay["pricing"]["timeout_seconds"] = json!(secs),
                Err(_) => warn!("ignoring PREFAB_ESTIMATE_TIMEOUT_SECS={:?}", timeout),
            }
        }

        if let Ok(port) = std::env::var("PREFAB_ESTIMATE_PORT") {
            match port.parse::<u16>() {
                Ok(port) => overlay["server"]["port"] = json!(port),
                Err(_) => warn!("ignoring PREFAB_ESTIMATE_PORT={:?}", port),
            }
        }

        overlay
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Tiers that contributed to the configuration, lowest first.
    pub fn sources(&self) -> &[(ConfigTier, Option<PathBuf>)] {
        &self.sources
    }
}
