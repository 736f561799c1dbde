//! Template records loaded from metadata files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};

/// A registered building model template. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Building-type tag (e.g. `data_center`).
    pub building_type: String,
    /// HVAC-system tag.
    pub hvac_system: String,
    /// The IDF document this template customizes.
    pub document_path: PathBuf,
    /// The metadata file the template was loaded from.
    pub metadata_path: PathBuf,
    /// Declared defaults, e.g. `{"geometry": {"length_m": 15.24}}`.
    pub defaults: Map<String, Value>,
}

/// Listing view of a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateSummary {
    /// Unique identifier.
    pub template_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Building-type tag.
    pub building_type: String,
    /// HVAC-system tag.
    pub hvac_system: String,
    /// Declared defaults.
    pub defaults: Map<String, Value>,
}

impl Template {
    /// Listing view of this template.
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            template_id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            building_type: self.building_type.clone(),
            hvac_system: self.hvac_system.clone(),
            defaults: self.defaults.clone(),
        }
    }

    /// A default from `defaults[section][key]`, falling back to a top-level `defaults[key]`.
    pub fn default_value(&self, section: &str, key: &str) -> Option<&Value> {
        self.defaults
            .get(section)
            .and_then(|s| s.get(key))
            .or_else(|| self.defaults.get(key))
    }

    /// Numeric default.
    pub fn default_f64(&self, section: &str, key: &str) -> Option<f64> {
        self.default_value(section, key)?.as_f64()
    }

    /// String default.
    pub fn default_str(&self, section: &str, key: &str) -> Option<&str> {
        self.default_value(section, key)?.as_str()
    }

    /// Read the template's IDF text.
    pub fn read_document(&self) -> Result<String> {
        std::fs::read_to_string(&self.document_path)
            .map_err(|e| CatalogError::io(&self.document_path, e))
    }

    /// Read the raw metadata file.
    pub fn read_metadata(&self) -> Result<Value> {
        let text = std::fs::read_to_string(&self.metadata_path)
            .map_err(|e| CatalogError::io(&self.metadata_path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| CatalogError::malformed(&self.metadata_path, e.to_string()))
    }
}

/// On-disk metadata layout.
#[derive(Debug, Deserialize)]
struct TemplateMetadata {
    template_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    building_type: Option<String>,
    hvac_system: Option<String>,
    idf_file: Option<String>,
    #[serde(default)]
    defaults: Map<String, Value>,
}

/// Load one template from a metadata file. The IDF path is resolved against
/// the metadata file's directory and must exist.
pub(crate) fn load_template(metadata_path: &Path) -> Result<Template> {
    let text = std::fs::read_to_string(metadata_path)
        .map_err(|e| CatalogError::io(metadata_path, e))?;
    let meta: TemplateMetadata = serde_json::from_str(&text)
        .map_err(|e| CatalogError::malformed(metadata_path, e.to_string()))?;

    let id = meta
        .template_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CatalogError::malformed(metadata_path, "missing template_id"))?;
    let idf_file = meta
        .idf_file
        .ok_or_else(|| CatalogError::malformed(metadata_path, "missing idf_file"))?;

    let dir = metadata_path.parent().unwrap_or_else(|| Path::new("."));
    let document_path = dir.join(idf_file);
    if !document_path.is_file() {
        return Err(CatalogError::malformed(
            metadata_path,
            format!("IDF file not found for template {id}: {}", document_path.display()),
        ));
    }

    Ok(Template {
        name: meta.name.unwrap_or_else(|| id.clone()),
        description: meta.description.unwrap_or_default(),
        building_type: meta.building_type.unwrap_or_else(|| "unknown".to_string()),
        hvac_system: meta.hvac_system.unwrap_or_else(|| "unknown".to_string()),
        document_path,
        metadata_path: metadata_path.to_path_buf(),
        defaults: meta.defaults,
        id,
    })
}
