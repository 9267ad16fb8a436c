//! Config Command
//!
//! Resolve the effective configuration and print it.
//!
//! Usage:
//!   evaltex --show-config [--config evaltex.toml] [overrides...]

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Command-line values that take precedence over every config source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub split_column: Option<i64>,
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub output_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(column) = self.split_column {
            config.output.split_column = column;
        }
        if let Some(seed) = self.seed {
            config.render.seed = Some(seed);
        }
        if self.no_shuffle {
            config.render.shuffle = false;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(template) = &self.template {
            config.output.template = template.clone();
        }
    }
}

/// Load config (defaults → file → env) and apply command-line overrides
pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = ConfigLoader::load(path)?;
    overrides.apply(&mut config);
    debug!(
        "Effective config: split_column={}, shuffle={}, seed={:?}",
        config.output.split_column, config.render.shuffle, config.render.seed
    );
    Ok(config)
}

/// Print the effective configuration as TOML
pub fn show(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<()> {
    let config = resolve(path, overrides)?;
    print!("{}", ConfigLoader::to_toml(&config)?);
    Ok(())
}
