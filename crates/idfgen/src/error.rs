//! Error types for model generation.

use std::path::PathBuf;

use idfgen_catalog::CatalogError;
use idfgen_format::FormatError;
use thiserror::Error;

/// Errors that abort a generation call.
///
/// Only template resolution and loading fail a call. Content edits that
/// cannot be applied are recorded as skipped instead.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Unknown template id.
    #[error("Template '{id}' not found. Available: {available:?}")]
    TemplateNotFound {
        /// Requested id.
        id: String,
        /// Ids registered in the catalog.
        available: Vec<String>,
    },

    /// No template carries the requested building-type tag.
    #[error("No template available for building type: {0}")]
    NoTemplateForType(String),

    /// The template's files could not be read.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The template document is not valid IDF.
    #[error("Template '{template}' is not a valid IDF document: {source}")]
    Format {
        /// Template id.
        template: String,
        /// Parse error.
        #[source]
        source: FormatError,
    },

    /// Writing the generated document failed.
    #[error("I/O error writing {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
