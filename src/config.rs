/// Form configuration
///
/// Describes the upload fields the form shows. Stored as JSON and looked up
/// in this order:
/// - The path in `PHOTO_INTAKE_FORM`
/// - Linux: ~/.config/photo-intake/form.json
/// - macOS: ~/Library/Application Support/photo-intake/form.json
/// - Windows: %APPDATA%\photo-intake\form.json
///
/// If none exists the built-in fields are used.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::intake::{IntakeLimits, DEFAULT_MAX_SIZE_MB};

/// Environment variable pointing at an explicit form file
pub const FORM_PATH_ENV: &str = "PHOTO_INTAKE_FORM";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid form configuration: {0}")]
    Invalid(String),
}

/// One upload field on the form
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Stable identifier (also used as the submission key)
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub max_files: usize,
    /// HTML-style accept string, e.g. "image/*,application/pdf"
    #[serde(default)]
    pub accept: String,
    #[serde(default = "default_max_size_mb", rename = "maxSizeMB")]
    pub max_size_mb: u64,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_max_size_mb() -> u64 {
    DEFAULT_MAX_SIZE_MB
}

fn default_required() -> bool {
    true
}

impl FieldConfig {
    pub fn limits(&self) -> IntakeLimits {
        IntakeLimits::new(self.max_files, self.max_size_mb)
    }
}

/// All fields of the form, in display order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub title: String,
    pub fields: Vec<FieldConfig>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: "Application Form".to_string(),
            fields: vec![
                FieldConfig {
                    id: "photos".to_string(),
                    label: "Photos".to_string(),
                    description: "Upload up to 3 clear photos.".to_string(),
                    max_files: 3,
                    accept: "image/*".to_string(),
                    max_size_mb: DEFAULT_MAX_SIZE_MB,
                    required: true,
                },
                FieldConfig {
                    id: "documents".to_string(),
                    label: "Supporting documents".to_string(),
                    description: "Scans or PDFs of supporting documents.".to_string(),
                    max_files: 2,
                    accept: "image/*,application/pdf".to_string(),
                    max_size_mb: DEFAULT_MAX_SIZE_MB,
                    required: true,
                },
            ],
        }
    }
}

impl FormConfig {
    /// Load from the environment override, the user config file, or defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(FORM_PATH_ENV) {
            return Self::from_file(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("no form file found, using built-in fields");
                Ok(Self::default())
            }
        }
    }

    /// Where the form file is expected in the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("photo-intake");
        path.push("form.json");
        Some(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), fields = config.fields.len(), "form configuration loaded");
        Ok(config)
    }

    /// Parse and validate a JSON form description
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::Invalid("form has no fields".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate field id '{}'", field.id)));
            }
            if field.max_files == 0 {
                return Err(ConfigError::Invalid(format!(
                    "field '{}' accepts no files",
                    field.id
                )));
            }
            if field.max_size_mb == 0 {
                return Err(ConfigError::Invalid(format!(
                    "field '{}' has a zero size limit",
                    field.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = FormConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fields[0].limits(), IntakeLimits::new(3, 10));
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let config = FormConfig::default();
        let restored = FormConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_optional_fields_take_defaults() {
        let config = FormConfig::from_json(
            r#"{"title": "T", "fields": [{"id": "id_card", "label": "ID card", "maxFiles": 1}]}"#,
        )
        .unwrap();

        let field = &config.fields[0];
        assert_eq!(field.max_size_mb, 10);
        assert!(field.required);
        assert_eq!(field.accept, "");
    }

    #[test]
    fn test_size_key_spelling() {
        let config = FormConfig::from_json(
            r#"{"title": "T", "fields": [{"id": "a", "label": "A", "maxFiles": 2, "maxSizeMB": 25}]}"#,
        )
        .unwrap();
        assert_eq!(config.fields[0].max_size_mb, 25);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = FormConfig::from_json(
            r#"{"title": "T", "fields": [
                {"id": "a", "label": "A", "maxFiles": 1},
                {"id": "a", "label": "B", "maxFiles": 1}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_max_files_rejected() {
        let err = FormConfig::from_json(
            r#"{"title": "T", "fields": [{"id": "a", "label": "A", "maxFiles": 0}]}"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Invalid(message) => assert!(message.contains("'a'")),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_form_rejected() {
        let err = FormConfig::from_json(r#"{"title": "T", "fields": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, "{ not json").unwrap();

        match FormConfig::from_file(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_missing() {
        let err = FormConfig::from_file(Path::new("/nonexistent/form.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
