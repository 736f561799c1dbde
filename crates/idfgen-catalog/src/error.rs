//! Error types for the template catalog.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or querying templates.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No template is registered under the id.
    #[error("Template '{id}' not found. Available: {available:?}")]
    TemplateNotFound {
        /// Requested id.
        id: String,
        /// Ids that are registered.
        available: Vec<String>,
    },

    /// A metadata file could not be turned into a template.
    #[error("Malformed template metadata in {}: {reason}", path.display())]
    MalformedTemplateMetadata {
        /// Metadata file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// I/O error reading a catalog file.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Create a malformed-metadata error.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedTemplateMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
