//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (explicit `--config` path, or `evaltex.toml` if present)
//! 3. Environment variables (EVALTEX_* prefix, `__` between levels)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::constants::defaults;
use crate::types::{ReportError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → config file → env vars
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ReportError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!("Loading config from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    debug!("Loading config from: {}", default_path.display());
                    figment = figment.merge(Toml::file(&default_path));
                }
            }
        }

        // Merge environment variables (e.g., EVALTEX_OUTPUT__SPLIT_COLUMN -> output.split_column)
        figment = figment.merge(Env::prefixed(defaults::ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ReportError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ReportError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Path of the config file picked up when `--config` is not given
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(defaults::CONFIG_FILE)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(config: &Config) -> Result<String> {
        toml::to_string_pretty(config).map_err(|e| ReportError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Directive;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[output]
split_column = 1
file_name = "report.tex"

[render]
shuffle = false
seed = 7

[[schema]]
kind = "rating"
column = 2

[[schema]]
kind = "section"
children = [
    { kind = "name", column = 1 },
    { kind = "normal", column = 3 },
]
"#;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("evaltex.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_file(&write_sample(&dir)).unwrap();

        assert_eq!(config.output.split_column, 1);
        assert_eq!(config.output.file_name, "report.tex");
        assert!(!config.render.shuffle);
        assert_eq!(config.render.seed, Some(7));
        // Untouched sections keep their defaults
        assert_eq!(config.render.max_depth, 4);
        assert_eq!(config.figures.directory, PathBuf::from("figures"));

        let directives = config.schema.directives();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0], Directive::Rating { column: 2 });
        assert!(matches!(directives[1], Directive::Section { .. }));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let err = ConfigLoader::load(Some(Path::new("/nonexistent/evaltex.toml"))).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_invalid_schema_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[schema]]\nkind = \"bogus\"\n").unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("EVALTEX_OUTPUT__FILE_NAME", "from-env.tex");
        }
        let config = ConfigLoader::load(Some(&path)).unwrap();
        unsafe {
            std::env::remove_var("EVALTEX_OUTPUT__FILE_NAME");
        }
        assert_eq!(config.output.file_name, "from-env.tex");
        assert_eq!(config.output.split_column, 1);
    }

    #[test]
    fn test_to_toml_round_trips_schema() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_file(&write_sample(&dir)).unwrap();
        let rendered = ConfigLoader::to_toml(&config).unwrap();
        assert!(rendered.contains("kind = \"rating\""));
        assert!(rendered.contains("split_column = 1"));
    }
}
