use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// CLI settings, read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub base: BaseSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseSettings {
    /// `module type` pairs enumerated into the report's `base` block.
    #[serde(default = "default_base_objects")]
    pub objects: Vec<String>,
}

impl Default for BaseSettings {
    fn default() -> Self {
        Self {
            objects: default_base_objects(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl Settings {
    pub fn base_objects(&self) -> Vec<&str> {
        self.base.objects.iter().map(String::as_str).collect()
    }

    /// Serialize `value` as JSON, pretty or compact per the output settings.
    pub fn to_json<T: serde::Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.output.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

fn default_base_objects() -> Vec<String> {
    tmos_core::DEFAULT_BASE_OBJECTS
        .iter()
        .map(|kind| (*kind).to_string())
        .collect()
}

fn default_pretty() -> bool {
    true
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_settings(&raw, path.display().to_string())
}

/// Built-in settings compiled into the binary.
pub fn default_settings() -> Settings {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/settings/default.toml"
    ));
    parse_settings(embedded, "embedded settings".to_string()).unwrap_or_default()
}

/// Settings from `path` when given, otherwise the embedded defaults.
pub fn resolve_settings(path: Option<&Path>) -> Result<Settings, SettingsLoadError> {
    match path {
        Some(path) => load_settings(path),
        None => Ok(default_settings()),
    }
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, SettingsLoadError> {
    toml::from_str(raw).map_err(|source| SettingsLoadError::Parse { path, source })
}
