//! Configuration management for the WiFU UI
//!
//! Handles loading, parsing and validation of the YAML configuration file.

use crate::faces::FaceTable;
use crate::state::Value;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::fs;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    /// Plugin name -> enabled
    #[serde(default)]
    pub plugins: HashMap<String, bool>,
}

/// Display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Render ticks per second
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Face shown at startup
    #[serde(default = "default_initial_face")]
    pub initial_face: String,
    /// Glyph overrides by face name
    #[serde(default)]
    pub faces: HashMap<String, String>,
    /// Ordered page identifiers
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,
    /// Extra state elements created at startup
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub elements: BTreeMap<String, Value>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            initial_face: default_initial_face(),
            faces: HashMap::new(),
            pages: default_pages(),
            elements: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        let ui = &self.ui;

        if !(ui.fps > 0.0 && ui.fps.is_finite()) {
            anyhow::bail!("ui.fps must be a positive number (got {})", ui.fps);
        }
        if ui.width == 0 || ui.height == 0 {
            anyhow::bail!(
                "ui canvas size must be non-zero (got {}x{})",
                ui.width,
                ui.height
            );
        }
        if ui.pages.is_empty() {
            anyhow::bail!("At least one page must be defined");
        }
        for (idx, page) in ui.pages.iter().enumerate() {
            if page.is_empty() {
                anyhow::bail!("Page {} name cannot be empty", idx);
            }
        }

        let faces = self.face_table();
        if !faces.contains(&ui.initial_face) {
            anyhow::bail!("ui.initial_face '{}' is not a known face", ui.initial_face);
        }

        Ok(())
    }

    /// Face table with the configured overrides applied
    pub fn face_table(&self) -> FaceTable {
        FaceTable::with_overrides(&self.ui.faces)
    }

    /// Whether a plugin is enabled (plugins are opt-in)
    pub fn plugin_enabled(&self, name: &str) -> bool {
        self.plugins.get(name).copied().unwrap_or(false)
    }
}

// Default value functions
fn default_fps() -> f64 { 1.0 }
fn default_width() -> usize { 40 }
fn default_height() -> usize { 8 }
fn default_initial_face() -> String { "AWAKE".to_string() }
fn default_pages() -> Vec<String> { vec!["main".to_string(), "stats".to_string()] }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.ui.fps, 1.0);
        assert_eq!(config.ui.pages, vec!["main", "stats"]);
        assert_eq!(config.ui.initial_face, "AWAKE");
        assert!(!config.plugin_enabled("example"));
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
ui:
  fps: 2.5
  width: 32
  height: 6
  initial_face: cool_face
  faces:
    cool: "(B-)"
  pages: [main, stats, plugins]
  elements:
    channel: 6
    mode: AUTO
plugins:
  example: true
"#;
        // initial_face must be a known name
        assert!(AppConfig::from_yaml(yaml).is_err());

        let config = AppConfig::from_yaml(&yaml.replace("cool_face", "COOL")).unwrap();
        assert_eq!(config.ui.fps, 2.5);
        assert_eq!(config.ui.pages.len(), 3);
        assert_eq!(config.face_table().get("COOL"), Some("(B-)"));
        assert_eq!(config.ui.elements.get("channel"), Some(&Value::Int(6)));
        assert_eq!(config.ui.elements.get("mode"), Some(&Value::from("AUTO")));
        assert!(config.plugin_enabled("example"));
    }

    #[test]
    fn test_validation_errors() {
        assert!(AppConfig::from_yaml("ui: { fps: 0 }").is_err());
        assert!(AppConfig::from_yaml("ui: { width: 0 }").is_err());
        assert!(AppConfig::from_yaml("ui: { pages: [] }").is_err());
        assert!(AppConfig::from_yaml("ui: { pages: [main, ''] }").is_err());
        assert!(AppConfig::from_yaml("ui: [not, a, map]").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("wifu.yaml");
        std::fs::write(&config_path, "ui:\n  pages: [main]\n  initial_face: SLEEP\n")?;

        let config = AppConfig::load(&config_path).await?;
        assert_eq!(config.ui.pages, vec!["main"]);
        assert_eq!(config.ui.initial_face, "SLEEP");

        let missing = AppConfig::load(temp_dir.path().join("missing.yaml")).await;
        assert!(missing.is_err());
        Ok(())
    }
}
