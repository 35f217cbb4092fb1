use crate::core::errors::ApiDiffError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "apidiff.json";

/// Types the engine always reports but that are never part of the public surface.
pub const DEFAULT_EXCLUDED_TYPES: &[&str] = &["XLua.DelegateBridge"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub marker: String,
    pub deleted: String,
    pub modified: String,
    pub added: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            marker: "#ff9900".to_string(),
            deleted: "#ff3300".to_string(),
            modified: "#ff6600".to_string(),
            added: "#66ccff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub excluded_types: Vec<String>,
    pub palette: Palette,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            excluded_types: DEFAULT_EXCLUDED_TYPES.iter().map(|s| s.to_string()).collect(),
            palette: Palette::default(),
        }
    }
}

impl ExportOptions {
    pub fn is_excluded(&self, type_name: &str) -> bool {
        self.excluded_types.iter().any(|t| t == type_name)
    }

    /// Reads `path` when given, otherwise `apidiff.json` from `dir` if it exists.
    pub fn load(path: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(ExportOptions::default());
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let options = serde_json::from_str(&content)
            .map_err(|e| ApiDiffError::ConfigError(format!("{:?}: {}", path, e)))?;
        Ok(options)
    }
}

pub fn apply_preset(opts: &mut ExportOptions, preset: &str) -> Result<(), ApiDiffError> {
    match preset {
        "default" => {
            opts.excluded_types = ExportOptions::default().excluded_types;
        }
        "plain" => {
            // Report every type, including engine bridges
            opts.excluded_types.clear();
        }
        _ => return Err(ApiDiffError::ConfigError(format!("Unknown preset: {}", preset))),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_exclude_delegate_bridge() {
        let opts = ExportOptions::default();
        assert!(opts.is_excluded("XLua.DelegateBridge"));
        assert!(!opts.is_excluded("XLua.LuaEnv"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let opts: ExportOptions =
            serde_json::from_str(r##"{ "palette": { "added": "#00ff00" } }"##).unwrap();
        assert_eq!(opts.palette.added, "#00ff00");
        assert_eq!(opts.palette.deleted, "#ff3300");
        assert_eq!(opts.excluded_types, vec!["XLua.DelegateBridge".to_string()]);
    }

    #[test]
    fn test_presets() {
        let mut opts = ExportOptions::default();
        apply_preset(&mut opts, "plain").unwrap();
        assert!(opts.excluded_types.is_empty());
        apply_preset(&mut opts, "default").unwrap();
        assert!(opts.is_excluded("XLua.DelegateBridge"));
        assert!(apply_preset(&mut opts, "loud").is_err());
    }

    #[test]
    fn test_missing_default_config_falls_back() {
        let dir = std::env::temp_dir().join("apidiff-md-no-config");
        let opts = ExportOptions::load(None, &dir).unwrap();
        assert_eq!(opts, ExportOptions::default());
    }
}
