//! Template selection by building type.

use idfgen_catalog::{Template, TemplateCatalog};
use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::spec::BuildingType;

/// Resolve the template for `building_type`.
///
/// The type's preferred template wins when the catalog has it; otherwise the
/// first template (in id order) tagged with the type is used.
pub fn select_template(
    catalog: &TemplateCatalog,
    building_type: BuildingType,
) -> Result<&Template> {
    if let Some(template) = building_type
        .preferred_template()
        .and_then(|id| catalog.get(id))
    {
        return Ok(template);
    }
    debug!(%building_type, "no preferred template, falling back to type tag");
    catalog
        .first_of_type(building_type.as_str())
        .ok_or_else(|| GenerateError::NoTemplateForType(building_type.to_string()))
}
