#![warn(missing_docs)]

//! Template catalog for idfgen.
//!
//! Templates live in category directories under a catalog root:
//!
//! ```text
//! templates/
//!   data_center/
//!     DataCenter_SingleZone.json   <- metadata, names the IDF file
//!     DataCenter_SingleZone.idf
//!   manufacturing/
//!     ...
//! ```
//!
//! The catalog is scanned once. A broken template is logged and skipped; it
//! never aborts loading the rest. After loading the catalog is read-only and
//! can be shared freely between threads.

mod error;
mod template;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use error::{CatalogError, Result};
pub use template::{Template, TemplateSummary};

/// Read-only index of templates by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    root: PathBuf,
    templates: BTreeMap<String, Template>,
}

impl TemplateCatalog {
    /// Scan `root` for templates.
    ///
    /// A missing root yields an empty catalog.
    pub fn load(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let mut catalog = Self {
            root: root.clone(),
            templates: BTreeMap::new(),
        };

        let categories = match sorted_entries(&root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "templates directory unavailable");
                return catalog;
            }
        };

        for category in categories.into_iter().filter(|p| p.is_dir()) {
            let files = match sorted_entries(&category) {
                Ok(files) => files,
                Err(e) => {
                    warn!(error = %e, "skipping template category");
                    continue;
                }
            };
            for metadata in files
                .into_iter()
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            {
                match template::load_template(&metadata) {
                    Ok(t) => catalog.insert(t),
                    Err(e) => warn!(error = %e, "skipping template"),
                }
            }
        }

        info!(
            count = catalog.len(),
            root = %root.display(),
            "template catalog loaded"
        );
        catalog
    }

    /// Build a catalog from already-loaded templates.
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut catalog = Self::default();
        for t in templates {
            catalog.insert(t);
        }
        catalog
    }

    fn insert(&mut self, template: Template) {
        if let Some(existing) = self.templates.get(&template.id) {
            warn!(
                id = %template.id,
                kept = %existing.metadata_path.display(),
                ignored = %template.metadata_path.display(),
                "duplicate template id"
            );
            return;
        }
        debug!(id = %template.id, "loaded template");
        self.templates.insert(template.id.clone(), template);
    }

    /// Directory the catalog was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// Registered ids in order.
    pub fn ids(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Summaries, optionally restricted to one building type.
    pub fn list(&self, building_type: Option<&str>) -> Vec<TemplateSummary> {
        self.iter()
            .filter(|t| building_type.map_or(true, |bt| t.building_type == bt))
            .map(Template::summary)
            .collect()
    }

    /// Template by id.
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Template by id, failing with the list of known ids.
    pub fn require(&self, id: &str) -> Result<&Template> {
        self.get(id).ok_or_else(|| CatalogError::TemplateNotFound {
            id: id.to_string(),
            available: self.ids(),
        })
    }

    /// First template (in id order) tagged with `building_type`.
    pub fn first_of_type(&self, building_type: &str) -> Option<&Template> {
        self.iter().find(|t| t.building_type == building_type)
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))? {
        entries.push(entry.map_err(|e| CatalogError::io(dir, e))?.path());
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_template(root: &Path, category: &str, id: &str, building_type: &str) {
        let dir = root.join(category);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{id}.idf")), "Version,25.2;\n").unwrap();
        fs::write(
            dir.join(format!("{id}.json")),
            format!(
                r#"{{
                    "template_id": "{id}",
                    "name": "{id} template",
                    "building_type": "{building_type}",
                    "hvac_system": "crac",
                    "idf_file": "{id}.idf",
                    "defaults": {{"geometry": {{"length_m": 30.0, "width_m": 20.0}}, "height_m": 6}}
                }}"#
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_load_and_query() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "data_center", "DataCenter_SingleZone", "data_center");
        write_template(dir.path(), "manufacturing", "Manufacturing_Warehouse", "manufacturing");

        let catalog = TemplateCatalog::load(dir.path());
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.ids(),
            vec!["DataCenter_SingleZone", "Manufacturing_Warehouse"]
        );

        let t = catalog.get("DataCenter_SingleZone").unwrap();
        assert_eq!(t.name, "DataCenter_SingleZone template");
        assert_eq!(t.description, "");
        assert_eq!(t.default_f64("geometry", "length_m"), Some(30.0));
        assert_eq!(t.default_f64("geometry", "height_m"), Some(6.0));
        assert_eq!(t.default_f64("geometry", "missing"), None);
        assert_eq!(t.read_document().unwrap(), "Version,25.2;\n");
        assert_eq!(t.read_metadata().unwrap()["hvac_system"], "crac");

        let listed = catalog.list(Some("manufacturing"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].template_id, "Manufacturing_Warehouse");
        assert_eq!(catalog.list(None).len(), 2);
        assert_eq!(
            catalog.first_of_type("data_center").map(|t| t.id.as_str()),
            Some("DataCenter_SingleZone")
        );
    }

    #[test]
    fn test_broken_templates_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "data_center", "Good", "data_center");

        let broken = dir.path().join("broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("syntax.json"), "{ not json").unwrap();
        fs::write(broken.join("no_id.json"), r#"{"idf_file": "x.idf"}"#).unwrap();
        fs::write(
            broken.join("no_idf.json"),
            r#"{"template_id": "Ghost", "idf_file": "ghost.idf"}"#,
        )
        .unwrap();
        fs::write(broken.join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("stray.json"), "{}").unwrap();

        let catalog = TemplateCatalog::load(dir.path());
        assert_eq!(catalog.ids(), vec!["Good"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::load(dir.path().join("nope"));
        assert!(catalog.is_empty());
        assert!(catalog.list(None).is_empty());
    }

    #[test]
    fn test_require_reports_available() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "data_center", "A", "data_center");
        let catalog = TemplateCatalog::load(dir.path());

        match catalog.require("B") {
            Err(CatalogError::TemplateNotFound { id, available }) => {
                assert_eq!(id, "B");
                assert_eq!(available, vec!["A"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "a_first", "Same", "data_center");
        write_template(dir.path(), "b_second", "Same", "warehouse");
        let catalog = TemplateCatalog::load(dir.path());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Same").unwrap().building_type, "data_center");
    }
}
