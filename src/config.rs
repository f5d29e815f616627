//! Font root configuration.
//!
//! Handles loading, validating, and merging `fontface.toml`. Stock defaults
//! are serialized to a TOML table and the user's file is merged on top, so a
//! config only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! fonts/
//! ├── fontface.toml      # Optional; stock defaults apply without it
//! ├── chinese/
//! └── english/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # JSON descriptor list; when set it replaces the directory scan.
//! # fonts_file = "fonts.json"
//!
//! [defaults]
//! weight = "normal"
//! style = "normal"
//! display = "swap"        # auto | block | swap | fallback | optional
//! category = "unknown"
//!
//! [css]
//! keep_cjk = true         # Keep CJK ideographs in font-family names
//!
//! [[scan]]
//! category = "chinese"
//! path = "chinese"
//!
//! [[scan]]
//! category = "english"
//! path = "english"
//! ```
//!
//! Arrays are replaced, not merged: a config with its own `[[scan]]` entries
//! scans only those directories. Unknown keys are rejected to catch typos.

use crate::css::CssEmitter;
use crate::descriptor::DescriptorDefaults;
use crate::provider::{DescriptorList, DescriptorProvider, DirectoryScan, ProviderError, ScanDir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "fontface.toml";

/// Valid `font-display` keywords.
const DISPLAY_VALUES: &[&str] = &["auto", "block", "swap", "fallback", "optional"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Descriptor list file, relative to the font root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts_file: Option<PathBuf>,
    /// Values for descriptor fields left unset.
    pub defaults: DescriptorDefaults,
    pub css: CssConfig,
    /// Directories scanned when no `fonts_file` is configured.
    pub scan: Vec<ScanDir>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            fonts_file: None,
            defaults: DescriptorDefaults::default(),
            css: CssConfig::default(),
            scan: vec![
                ScanDir::new("chinese", "chinese"),
                ScanDir::new("english", "english"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssConfig {
    /// Keep CJK ideographs when sanitizing family names.
    pub keep_cjk: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self { keep_cjk: true }
    }
}

impl FontConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DISPLAY_VALUES.contains(&self.defaults.display.as_str()) {
            return Err(ConfigError::Validation(format!(
                "defaults.display must be one of {}",
                DISPLAY_VALUES.join(", ")
            )));
        }
        for (key, value) in [
            ("defaults.weight", &self.defaults.weight),
            ("defaults.style", &self.defaults.style),
            ("defaults.category", &self.defaults.category),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        for dir in &self.scan {
            if dir.category.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "scan.category must not be empty".into(),
                ));
            }
            if dir.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "scan.path for category '{}' must not be empty",
                    dir.category
                )));
            }
        }
        Ok(())
    }

    pub fn emitter(&self) -> CssEmitter {
        CssEmitter::new(self.css.keep_cjk)
    }

    /// Scan directories with relative paths resolved against `root`.
    pub fn scan_dirs(&self, root: &Path) -> Vec<ScanDir> {
        self.scan
            .iter()
            .map(|d| ScanDir::new(d.category.clone(), root.join(&d.path)))
            .collect()
    }

    /// The provider this config describes: the descriptor list when
    /// `fonts_file` is set, the directory scan otherwise.
    pub fn provider(&self, root: &Path) -> Result<Box<dyn DescriptorProvider>, ProviderError> {
        match &self.fonts_file {
            Some(file) => Ok(Box::new(DescriptorList::from_json_file(&root.join(file))?)),
            None => Ok(Box::new(DirectoryScan::new(self.scan_dirs(root)))),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FontConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `fontface.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FontConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FontConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `fontface.toml` in the font root.
pub fn load_config(root: &Path) -> Result<FontConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `fontface.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# fontface configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# JSON file listing hosted fonts, relative to this directory. When set, it is
# used instead of scanning the directories below. Each entry looks like:
#   { "name": "Inter", "url": "https://cdn.example.com/inter.woff2",
#     "type": "english", "weight": "400" }
# fonts_file = "fonts.json"

# ---------------------------------------------------------------------------
# Descriptor defaults (used when a font does not set its own)
# ---------------------------------------------------------------------------
[defaults]
weight = "normal"
style = "normal"
# One of: auto, block, swap, fallback, optional
display = "swap"
category = "unknown"

# ---------------------------------------------------------------------------
# CSS output
# ---------------------------------------------------------------------------
[css]
# Keep CJK ideographs in font-family names. When false, only ASCII letters,
# digits, '-' and '_' survive.
keep_cjk = true

# ---------------------------------------------------------------------------
# Directories scanned for .otf/.ttf files. The file name without extension
# becomes the font name. Missing directories are skipped.
# ---------------------------------------------------------------------------
[[scan]]
category = "chinese"
path = "chinese"

[[scan]]
category = "english"
path = "english"
"##
}
