//! Editor configuration document
//!
//! A JSON object with an `"Application"` section and one free-form section
//! per module, keyed by module name:
//!
//! ```json
//! {
//!     "Application": { "App Name": "Nimbus3D", "Max FPS": 60, "Time Scale": 1.0 },
//!     "Camera": { "Speed": 5.0 }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::Result;
use crate::log::LogSeverity;
use crate::engine_err;

const SOURCE: &str = "nimbus3d::Config";

/// The `"Application"` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    #[serde(rename = "App Name")]
    pub app_name: String,
    #[serde(rename = "Org Name")]
    pub org_name: String,
    /// 0 = uncapped
    #[serde(rename = "Max FPS")]
    pub max_fps: u32,
    #[serde(rename = "VSYNC")]
    pub vsync: bool,
    #[serde(rename = "Time Scale")]
    pub time_scale: f32,
    /// Scene document used for save/load; in-memory when absent
    #[serde(rename = "Scene File", skip_serializing_if = "Option::is_none")]
    pub scene_file: Option<String>,
    /// Records below this severity are dropped
    #[serde(rename = "Log Level")]
    pub log_level: LogSeverity,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            app_name: "Nimbus3D".to_string(),
            org_name: "Nimbus3D Contributors".to_string(),
            max_fps: 0,
            vsync: false,
            time_scale: 1.0,
            scene_file: None,
            log_level: LogSeverity::Trace,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(rename = "Application", default)]
    pub application: ApplicationSettings,
    /// Per-module sections
    #[serde(flatten)]
    pub modules: BTreeMap<String, Value>,
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| engine_err!(ConfigError, SOURCE, "Malformed configuration: {}", err))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| engine_err!(ConfigError, SOURCE, "Cannot encode configuration: {}", err))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| engine_err!(ConfigError, SOURCE, "Cannot read '{}': {}", path.display(), err))?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        fs::write(path, text)
            .map_err(|err| engine_err!(Io, SOURCE, "Cannot write '{}': {}", path.display(), err))
    }

    /// Section for a module, if present.
    pub fn module_section(&self, name: &str) -> Option<&Value> {
        self.modules.get(name)
    }

    pub fn set_module_section(&mut self, name: &str, section: Value) {
        self.modules.insert(name.to_string(), section);
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
