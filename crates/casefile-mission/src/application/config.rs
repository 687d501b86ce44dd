//! Catalogue manifest: which mission documents to load and how to check them.

use std::path::{Path, PathBuf};

use casefile_core::error::DomainError;
use serde::Deserialize;

use crate::domain::source::MissionFormat;
use crate::domain::validation::ValidationMode;

/// One mission listed in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MissionEntry {
    /// Path of the mission document.
    pub document: PathBuf,
    /// Directory holding the mission's images and audio.
    #[serde(default)]
    pub assets: Option<PathBuf>,
}

/// The mission catalogue, in "New Game" order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// How loaded graphs are checked.
    #[serde(default)]
    pub validation: ValidationMode,
    /// Missions to load.
    #[serde(default)]
    pub missions: Vec<MissionEntry>,
}

impl CatalogConfig {
    /// Parses a manifest and resolves relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the manifest is malformed.
    pub fn parse(text: &str, format: MissionFormat, base_dir: &Path) -> Result<Self, DomainError> {
        let mut config: Self = match format {
            MissionFormat::Json => serde_json::from_str(text)
                .map_err(|e| DomainError::Validation(format!("invalid catalogue JSON: {e}")))?,
            MissionFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| DomainError::Validation(format!("invalid catalogue YAML: {e}")))?,
        };
        for entry in &mut config.missions {
            entry.document = base_dir.join(&entry.document);
            entry.assets = entry.assets.take().map(|assets| base_dir.join(assets));
        }
        Ok(config)
    }

    /// Reads the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the file cannot be read and
    /// `DomainError::Validation` if it is malformed.
    pub async fn load(path: &Path) -> Result<Self, DomainError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::Infrastructure(format!("failed to read catalogue {}: {e}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, MissionFormat::from_path(path), base_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolves_paths_against_base_dir() {
        // Arrange
        let text = r"
validation: strict
missions:
  - document: first-case/mission.json
    assets: first-case/assets
  - document: /abs/second.yaml
";

        // Act
        let config = CatalogConfig::parse(text, MissionFormat::Yaml, Path::new("/srv/casefile")).unwrap();

        // Assert
        assert_eq!(config.validation, ValidationMode::Strict);
        assert_eq!(config.missions.len(), 2);
        assert_eq!(
            config.missions[0].document,
            PathBuf::from("/srv/casefile/first-case/mission.json")
        );
        assert_eq!(
            config.missions[0].assets,
            Some(PathBuf::from("/srv/casefile/first-case/assets"))
        );
        assert_eq!(config.missions[1].document, PathBuf::from("/abs/second.yaml"));
        assert_eq!(config.missions[1].assets, None);
    }

    #[test]
    fn test_validation_defaults_to_lenient() {
        let config = CatalogConfig::parse(
            r#"{ "missions": [ { "document": "m.json" } ] }"#,
            MissionFormat::Json,
            Path::new("."),
        )
        .unwrap();

        assert_eq!(config.validation, ValidationMode::Lenient);
    }

    #[test]
    fn test_unknown_validation_mode_is_rejected() {
        let result = CatalogConfig::parse("validation: paranoid\n", MissionFormat::Yaml, Path::new("."));

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_load_missing_manifest_is_infrastructure_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = CatalogConfig::load(&dir.path().join("missing.yaml")).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
