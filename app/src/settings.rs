//! Generator settings
//!
//! Settings live in `contract-generator.json` in the working directory.
//! A missing file means defaults; a file that fails to parse is logged and
//! also yields defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name
pub const SETTINGS_FILE: &str = "contract-generator.json";

/// Template used when nothing else is configured
pub const DEFAULT_TEMPLATE_PATH: &str = "contrato_particular_de_compromisso_de_compra_e_venda.docx";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorSettings {
    /// DOCX template to fill
    pub template_path: PathBuf,
    /// Directory generated contracts are written to
    pub output_dir: PathBuf,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorSettings {
    /// Apply command-line overrides
    pub fn with_overrides(mut self, template: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if let Some(template) = template {
            self.template_path = template;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
}

/// Loads [`GeneratorSettings`] from a directory
pub struct SettingsManager {
    settings_path: PathBuf,
    current: GeneratorSettings,
}

impl SettingsManager {
    /// Create a manager for the settings file in `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: dir.as_ref().join(SETTINGS_FILE),
            current: GeneratorSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_sync(&mut self) -> std::io::Result<&GeneratorSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<GeneratorSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                    self.current = GeneratorSettings::default();
                }
            }
        } else {
            self.current = GeneratorSettings::default();
        }
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.template_path, PathBuf::from(DEFAULT_TEMPLATE_PATH));
        assert_eq!(settings.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.load_sync().unwrap(), &GeneratorSettings::default());
    }

    #[test]
    fn test_load_saved_settings() {
        let temp_dir = TempDir::new().unwrap();
        let saved = GeneratorSettings {
            template_path: PathBuf::from("modelos/contrato.docx"),
            output_dir: PathBuf::from("saida"),
        };
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            serde_json::to_string_pretty(&saved).unwrap(),
        )
        .unwrap();

        let mut reloaded = SettingsManager::new(temp_dir.path());
        let settings = reloaded.load_sync().unwrap();
        assert_eq!(settings.template_path, PathBuf::from("modelos/contrato.docx"));
        assert_eq!(settings.output_dir, PathBuf::from("saida"));
    }

    #[test]
    fn test_partial_file_fills_missing_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), r#"{"output_dir": "saida"}"#).unwrap();

        let mut manager = SettingsManager::new(temp_dir.path());
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings.template_path, PathBuf::from(DEFAULT_TEMPLATE_PATH));
        assert_eq!(settings.output_dir, PathBuf::from("saida"));
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let mut manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.load_sync().unwrap(), &GeneratorSettings::default());
    }

    #[test]
    fn test_cli_overrides() {
        let settings = GeneratorSettings::default()
            .with_overrides(Some(PathBuf::from("outro.docx")), None);
        assert_eq!(settings.template_path, PathBuf::from("outro.docx"));
        assert_eq!(settings.output_dir, PathBuf::from("."));
    }
}
