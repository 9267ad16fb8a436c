//! LaTeX Template
//!
//! The template is a complete LaTeX document with placeholders for the body,
//! the category name (fan-out mode) and the generation date. Substitution
//! happens on the template before the body is inserted, so text inside the
//! body is never treated as a placeholder.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::constants::placeholder;
use crate::types::{ReportError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    path: PathBuf,
    text: String,
}

impl Template {
    /// Read and trim a template file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ReportError::template(path, format!("cannot read template: {}", e)))?;
        debug!("Loaded template {} ({} bytes)", path.display(), text.len());
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            text: text.as_ref().trim().to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_body_placeholder(&self) -> bool {
        self.text.contains(placeholder::BODY)
    }

    /// Fill in dates, the category name and finally the body
    pub fn render(&self, body: &str, name: Option<&str>, today: NaiveDate) -> String {
        let mut output = self.text.clone();
        for (key, format) in placeholder::DATES {
            if output.contains(key) {
                output = output.replace(key, &today.format(format).to_string());
            }
        }
        if let Some(name) = name {
            output = output.replace(placeholder::NAME, name);
        }
        output.replace(placeholder::BODY, body)
    }
}
