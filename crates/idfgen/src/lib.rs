#![warn(missing_docs)]

//! Building energy model generation from templates.
//!
//! A [`BuildingSpecification`] describes a building at a high level
//! (location, footprint, equipment loads, setpoints). [`Generator`] picks a
//! template from a [`TemplateCatalog`], applies each section of the
//! specification to a copy of the template's IDF document and prepends a
//! provenance header:
//!
//! ```no_run
//! use idfgen::{BuildingSpecification, Generator, TemplateCatalog};
//!
//! let catalog = TemplateCatalog::load("templates");
//! let spec = BuildingSpecification::from_json(
//!     r#"{"building_type": "data_center", "data_center": {"it_load_kw": 50, "rack_count": 10}}"#,
//! )?;
//! let result = Generator::new(&catalog).generate(&spec, None)?;
//! result.write_to("out/model.idf")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Edits whose anchor is missing from the template are listed in
//! [`GenerationResult::skipped`]; only template resolution and loading fail
//! a call.

mod error;
mod generator;
mod header;
mod select;
mod spec;
mod steps;

pub use error::{GenerateError, Result};
pub use generator::{GenerationResult, Generator};
pub use header::provenance_header;
pub use select::select_template;
pub use spec::{
    BuildingSpecification, BuildingType, DataCenterParams, Geometry, Location,
    ManufacturingParams, Setpoints, SimulationOptions, TypeParams,
};
pub use steps::{customize, timezone_offset, ChangeLog};

pub use idfgen_catalog::{Template, TemplateCatalog, TemplateSummary};
pub use idfgen_format::Document;
