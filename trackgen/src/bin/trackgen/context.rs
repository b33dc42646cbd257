use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use trackgen_build::Capability;

pub const CONFIG_FILE: &str = "trackgen.toml";

/// Project context for trackgen operations
pub struct ProjectContext {
    /// Root directory of the project (where Cargo.toml is)
    pub project_root: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Option<TrackgenConfig>,
}

/// Configuration stored in trackgen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackgenConfig {
    #[serde(default)]
    pub generate: GenerateSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSettings {
    /// Package directories, relative to the project root
    #[serde(default = "default_packages")]
    pub package: Vec<String>,
    /// Output directory; next to the package when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            package: default_packages(),
            output: None,
            types: default_types(),
            runtime_crate: default_runtime_crate(),
        }
    }
}

fn default_packages() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_types() -> Vec<String> {
    Capability::ALL.iter().map(|capability| capability.name().to_string()).collect()
}

fn default_runtime_crate() -> String {
    "trackgen".to_string()
}

/// Command-line values that override the config file
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub packages: Vec<PathBuf>,
    pub types: Vec<Capability>,
    pub output: Option<PathBuf>,
    pub runtime_crate: Option<String>,
}

/// Fully resolved generation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGenerate {
    pub packages: Vec<PathBuf>,
    pub types: Vec<Capability>,
    pub output: Option<PathBuf>,
    pub runtime_crate: String,
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory.
    ///
    /// Outside a Cargo project the start directory is used without configuration.
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = match Self::find_project_root(start) {
            Some(root) => root,
            None => {
                log::debug!("no Cargo.toml above {}, using it as project root", start.display());
                start.to_path_buf()
            }
        };
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        // Load config if it exists
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: TrackgenConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            log::debug!("loaded {}", config_path.display());
            Some(config)
        } else {
            None
        };

        Ok(Self {
            project_root,
            config_path,
            config,
        })
    }

    /// Find project root by looking for Cargo.toml
    fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join("Cargo.toml").exists() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    pub fn settings(&self) -> GenerateSettings {
        self.config.as_ref().map(|config| config.generate.clone()).unwrap_or_default()
    }

    /// Merge command-line overrides over the config file. Config paths are relative to the
    /// project root, command-line paths are taken as given.
    pub fn resolve(&self, overrides: GenerateOverrides) -> Result<ResolvedGenerate> {
        let settings = self.settings();

        let packages = if overrides.packages.is_empty() {
            settings.package.iter().map(|package| self.project_root.join(package)).collect()
        } else {
            overrides.packages
        };

        let types = if overrides.types.is_empty() {
            settings
                .types
                .iter()
                .map(|name| {
                    name.parse::<Capability>()
                        .map_err(|err| anyhow::anyhow!("{err} in {}", self.config_path.display()))
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            overrides.types
        };

        let output = overrides
            .output
            .or_else(|| settings.output.as_ref().map(|output| self.project_root.join(output)));

        Ok(ResolvedGenerate {
            packages,
            types,
            output,
            runtime_crate: overrides.runtime_crate.unwrap_or(settings.runtime_crate),
        })
    }
}
