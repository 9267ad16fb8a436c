//! Unified Error Type System
//!
//! Centralized error types for the report pipeline.
//!
//! ## Error Policy
//!
//! - **Fatal**: unreadable input, ragged tables, bad configuration, missing
//!   template, chart output failures. These surface as `ReportError` and end
//!   the run with a non-zero exit code.
//! - **Soft**: a malformed `section` or empty data never reaches this module.
//!   They are rendered inline (error marker) or as empty output.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
    /// Expected value or format
    pub expected: Option<String>,
    /// Actual value received
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "Validation failed for '{}': {}", field, self.message)?,
            None => write!(f, "Validation failed: {}", self.message)?,
        }
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {}, got {})", expected, actual)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add expected/actual values
    pub fn with_comparison(
        mut self,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Column index outside the header width
    ColumnRange,
    /// Record width differs from the header width
    RowWidth,
    /// Table has no header row
    MissingHeader,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ReportError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error for {path}: {message}")]
    Template { path: PathBuf, message: String },

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Input error for {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// Foreign error with a note on what was being done
    #[error("{0}")]
    Context(String),
}

impl From<ValidationError> for ReportError {
    fn from(err: ValidationError) -> Self {
        ReportError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl ReportError {
    /// Create a template error
    pub fn template(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Template {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an input error
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the failure came from the user's files rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Csv(_)
                | Self::Validation(_)
                | Self::Config(_)
                | Self::Template { .. }
                | Self::Input { .. }
        )
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| ReportError::Context(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| ReportError::Context(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
