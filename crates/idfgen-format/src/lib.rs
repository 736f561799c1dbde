#![warn(missing_docs)]

//! Object/field model for IDF building-energy documents.
//!
//! An IDF document is a sequence of objects, each a keyword followed by
//! comma-separated fields and terminated by a semicolon. `!` starts a comment
//! that runs to the end of the line.
//!
//! This crate parses that format into a typed model that remembers where every
//! field lives in the source text. Edits splice the source at those positions,
//! so everything the edit does not touch (comments, alignment, blank lines)
//! survives byte-for-byte.
//!
//! # Example
//!
//! ```
//! use idfgen_format::{patch_scalar_field, Anchor, Document, FieldSelector};
//!
//! let doc = Document::parse("Building,\n  HQ,  !- Name\n  0.0;  !- North Axis {deg}\n").unwrap();
//! let anchor = Anchor::new("Building", FieldSelector::Named("North Axis".into()));
//! let patched = patch_scalar_field(&doc, &anchor, "30").unwrap();
//!
//! assert!(patched.change.is_some());
//! assert!(patched.document.text().contains("30;  !- North Axis {deg}"));
//! ```

mod document;
mod error;
mod lexer;
mod parser;
mod patch;
mod scale;

pub use document::Document;
pub use error::{FormatError, Result};
pub use parser::{Comment, Field, IdfObject, Span, Terminator};
pub use patch::{
    format_coordinate, format_scalar, patch_scalar_field, Anchor, FieldChange, FieldLocation,
    FieldSelector, Patched,
};
pub use scale::{
    is_geometry_keyword, scale_geometry, ScaleFactors, Scaled, GEOMETRY_KEYWORDS,
    IDENTITY_EPSILON,
};
