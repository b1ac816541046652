//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML config file (platform config dir, or `--config FILE`)
//! 3. Environment variables prefixed with `DIRDUPE_` (e.g. `DIRDUPE_IO_THREADS=8`,
//!    `DIRDUPE_IGNORE=[.git,target]`)
//! 4. Command-line flags
//!
//! # Example file
//!
//! ```toml
//! ignore = [".git", ".hg", ".svn", "node_modules"]
//! io_threads = 8
//! min_depth = 1
//! output = "json"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ScanArgs};
use crate::scanner::{ScanConfig, DEFAULT_IGNORE, DEFAULT_IO_THREADS};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DIRDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entry names ignored at every level of the tree.
    pub ignore: Vec<String>,
    /// Threads used to list directories.
    pub io_threads: usize,
    /// Minimum depth of reported groups.
    pub min_depth: usize,
    /// Default output format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|s| (*s).to_string()).collect(),
            io_threads: DEFAULT_IO_THREADS,
            min_depth: 0,
            output: OutputFormat::Text,
        }
    }
}

/// Values taken from the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    /// `--io-threads`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_threads: Option<usize>,
    /// `--min-depth`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_depth: Option<usize>,
    /// `--output`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,
}

impl From<&ScanArgs> for ConfigOverrides {
    fn from(args: &ScanArgs) -> Self {
        Self {
            io_threads: args.io_threads,
            min_depth: args.min_depth,
            output: args.output,
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// # Arguments
    ///
    /// * `file` - Explicit config file; must exist when given. When `None`,
    ///   the platform default is used if present.
    /// * `overrides` - Command-line values, applied last
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if any layer
    /// holds a value of the wrong type.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let figment = Self::figment(file)?.merge(Serialized::defaults(overrides));
        let config: Self = figment
            .extract()
            .context("Failed to load configuration")?;
        log::debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Defaults, config file and environment, without command-line values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file does not exist.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match file {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                log::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    if path.is_file() {
                        log::debug!("Loading config from {}", path.display());
                    }
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dirdupe", "dirdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the scan configuration for one run.
    ///
    /// # Arguments
    ///
    /// * `extra_ignore` - Names added on the command line
    /// * `no_default_ignores` - Drop the built-in version-control names
    #[must_use]
    pub fn scan_config(&self, extra_ignore: &[String], no_default_ignores: bool) -> ScanConfig {
        let names = self
            .ignore
            .iter()
            .filter(|name| !(no_default_ignores && DEFAULT_IGNORE.contains(&name.as_str())))
            .chain(extra_ignore)
            .cloned();

        ScanConfig::new(names, self.io_threads)
    }
}
