pub mod directive;
pub mod error;
pub mod table;

pub use directive::{Directive, Schema, SectionKey, section_key};
pub use error::{ReportError, Result, ResultExt, ValidationError, ValidationErrorKind};
pub use table::Table;

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;
use std::path::Path;

/// Reference to a generated chart image, as embedded in the document
///
/// Always uses forward slashes so the reference is valid LaTeX on every
/// platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Build from a filesystem path
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension, lowercased
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.0)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ArtifactRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
