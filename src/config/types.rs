//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::defaults;
use crate::types::{ReportError, Result, Schema};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output document settings
    pub output: OutputConfig,

    /// Chart figure settings
    pub figures: FigureConfig,

    /// Rendering behavior
    pub render: RenderConfig,

    /// Ordered directive list
    pub schema: Schema,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            figures: FigureConfig::default(),
            render: RenderConfig::default(),
            schema: Schema::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ReportError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.render.max_depth == 0 {
            return Err(ReportError::Config(
                "render.max_depth must be greater than 0".to_string(),
            ));
        }

        if self.render.max_score_buckets == 0 {
            return Err(ReportError::Config(
                "render.max_score_buckets must be greater than 0".to_string(),
            ));
        }

        if self.output.file_name.trim().is_empty() {
            return Err(ReportError::Config(
                "output.file_name must not be empty".to_string(),
            ));
        }

        if self.figures.width.trim().is_empty() {
            return Err(ReportError::Config(
                "figures.width must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Fan-out column, if fan-out is enabled
    pub fn split_column(&self) -> Option<usize> {
        usize::try_from(self.output.split_column).ok()
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// LaTeX template holding the body placeholder
    pub template: PathBuf,

    /// Directory the documents are written to
    pub directory: PathBuf,

    /// File name in single-document mode
    pub file_name: String,

    /// Column to fan out by; negative disables fan-out
    pub split_column: i64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from(defaults::TEMPLATE_FILE),
            directory: PathBuf::from("."),
            file_name: defaults::OUTPUT_FILE.to_string(),
            split_column: defaults::SPLIT_COLUMN,
        }
    }
}

// =============================================================================
// Figure Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Directory chart images are written to
    pub directory: PathBuf,

    /// Width argument of the embedded image
    pub width: String,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(defaults::FIGURE_DIR),
            width: defaults::FIGURE_WIDTH.to_string(),
        }
    }
}

// =============================================================================
// Render Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Shuffle records before each leaf directive (anonymization)
    pub shuffle: bool,

    /// Fixed seed for reproducible shuffling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Deepest header tier a directive list may render at.
    /// Deeper sections are silently dropped.
    pub max_depth: usize,

    /// Run `text` directives through the escaping pass
    pub escape_text_literals: bool,

    /// Score charts needing more buckets than this are skipped
    pub max_score_buckets: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
            max_depth: defaults::MAX_DEPTH,
            escape_text_literals: true,
            max_score_buckets: defaults::MAX_SCORE_BUCKETS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
