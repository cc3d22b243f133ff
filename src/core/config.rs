use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Configuration level a value is read at. Narrower scopes fall back to wider ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Default,
    Website,
    Store,
}

impl Scope {
    /// Scopes consulted for a lookup, narrowest first.
    pub fn lookup_order(self) -> &'static [Scope] {
        match self {
            Scope::Store => &[Scope::Store, Scope::Website, Scope::Default],
            Scope::Website => &[Scope::Website, Scope::Default],
            Scope::Default => &[Scope::Default],
        }
    }
}

pub trait ConfigSource: Send + Sync {
    /// Returns the value for `key` at `scope`, or `None` if unset or empty.
    fn get_value(&self, key: &str, scope: Scope) -> Option<String>;
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ScopedValues {
    #[serde(default)]
    pub default: HashMap<String, String>,
    #[serde(default)]
    pub website: HashMap<String, String>,
    #[serde(default)]
    pub store: HashMap<String, String>,
}

impl ScopedValues {
    fn at(&self, scope: Scope) -> &HashMap<String, String> {
        match scope {
            Scope::Default => &self.default,
            Scope::Website => &self.website,
            Scope::Store => &self.store,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub scopes: ScopedValues,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "cnbrates", "cnbrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "cnbrates", "cnbrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

impl ConfigSource for AppConfig {
    fn get_value(&self, key: &str, scope: Scope) -> Option<String> {
        scope
            .lookup_order()
            .iter()
            .filter_map(|s| self.scopes.at(*s).get(key))
            .find(|v| !v.trim().is_empty())
            .cloned()
    }
}
