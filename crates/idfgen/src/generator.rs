//! Model generation: resolve a template, customize it, prepend provenance.

use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};
use idfgen_catalog::{Template, TemplateCatalog};
use idfgen_format::Document;
use serde::Serialize;
use tracing::info;

use crate::error::{GenerateError, Result};
use crate::header::provenance_header;
use crate::select::select_template;
use crate::spec::BuildingSpecification;
use crate::steps::customize;

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    /// Full output document: provenance header followed by the customized template.
    #[serde(skip_serializing)]
    pub document: String,
    /// Id of the template that was customized.
    pub template_used: String,
    /// Applied changes, in order.
    pub modifications: Vec<String>,
    /// Requested changes that could not be applied.
    pub skipped: Vec<String>,
    /// Generation time.
    pub timestamp: DateTime<FixedOffset>,
}

impl GenerationResult {
    /// Write the document to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &self.document)
        };
        write().map_err(|source| GenerateError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "model written");
        Ok(())
    }
}

/// Applies building specifications to templates from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    catalog: &'a TemplateCatalog,
}

impl<'a> Generator<'a> {
    /// Create a generator over `catalog`.
    pub fn new(catalog: &'a TemplateCatalog) -> Self {
        Self { catalog }
    }

    /// The template a call would use: `template_id` when given, else by building type.
    pub fn resolve(
        &self,
        spec: &BuildingSpecification,
        template_id: Option<&str>,
    ) -> Result<&'a Template> {
        match template_id {
            Some(id) => self
                .catalog
                .get(id)
                .ok_or_else(|| GenerateError::TemplateNotFound {
                    id: id.to_string(),
                    available: self.catalog.ids(),
                }),
            None => select_template(self.catalog, spec.building_type()),
        }
    }

    /// Generate a model stamped with the current local time.
    pub fn generate(
        &self,
        spec: &BuildingSpecification,
        template_id: Option<&str>,
    ) -> Result<GenerationResult> {
        self.generate_at(spec, template_id, Local::now().fixed_offset())
    }

    /// Generate a model stamped with `timestamp`.
    ///
    /// Identical inputs give identical output.
    pub fn generate_at(
        &self,
        spec: &BuildingSpecification,
        template_id: Option<&str>,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<GenerationResult> {
        let template = self.resolve(spec, template_id)?;
        info!(template = %template.id, building_type = %spec.building_type(), "generating model");

        let text = template.read_document()?;
        let document = Document::parse(text).map_err(|source| GenerateError::Format {
            template: template.id.clone(),
            source,
        })?;
        let (document, log) = customize(document, spec, template);

        let mut output = provenance_header(spec, &template.id, &timestamp);
        output.push_str(document.body());

        info!(
            template = %template.id,
            modifications = log.modifications.len(),
            skipped = log.skipped.len(),
            "model generated"
        );
        Ok(GenerationResult {
            document: output,
            template_used: template.id.clone(),
            modifications: log.modifications,
            skipped: log.skipped,
            timestamp,
        })
    }
}
