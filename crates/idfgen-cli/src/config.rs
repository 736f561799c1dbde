//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use idfgen::BuildingType;
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "idfgen.toml";

const DEFAULT_TEMPLATES_DIR: &str = "templates";
const DEFAULT_OUTPUT_DIR: &str = "output/models";

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Template catalog root
    pub templates_dir: Option<PathBuf>,

    /// Where generated models go when no output path is given
    pub output_dir: Option<PathBuf>,

    /// Building type for specifications that do not declare one
    pub default_building_type: Option<BuildingType>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `./idfgen.toml` is used if
    /// present, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a config file. Relative directories are resolved against the
    /// file's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for dir in [&mut config.templates_dir, &mut config.output_dir]
            .into_iter()
            .flatten()
        {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }

    /// Template catalog root, falling back to `./templates`.
    pub fn templates_dir(&self) -> PathBuf {
        self.templates_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR))
    }

    /// Output directory, falling back to `./output/models`.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.templates_dir(), PathBuf::from("templates"));
        assert_eq!(config.output_dir(), PathBuf::from("output/models"));
        assert!(config.default_building_type.is_none());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idfgen.toml");
        std::fs::write(
            &path,
            "templates_dir = \"tpl\"\noutput_dir = \"/srv/models\"\ndefault_building_type = \"manufacturing\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.templates_dir(), dir.path().join("tpl"));
        assert_eq!(config.output_dir(), PathBuf::from("/srv/models"));
        assert_eq!(
            config.default_building_type,
            Some(BuildingType::Manufacturing)
        );
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/idfgen.toml"))).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idfgen.toml");
        std::fs::write(&path, "template_dir = \"typo\"\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("template_dir"));
    }
}
