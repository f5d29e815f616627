//! Font descriptors: the metadata stored per registered font name.
//!
//! A [`DescriptorInput`] is what callers (or a [`crate::provider`]) hand in.
//! It is deliberately loose: every field except `name` is optional so that a
//! missing source can be reported as a registration error instead of a parse
//! error. [`DescriptorInput::resolve`] turns it into a complete
//! [`FontDescriptor`] by detecting the format and filling defaults.
//!
//! ## Input Format
//!
//! ```json
//! [
//!   { "name": "Inter", "url": "https://cdn.example.com/inter.woff2", "type": "english" },
//!   { "name": "思源黑体", "source": "/srv/fonts/SourceHanSans.otf", "weight": "700" }
//! ]
//! ```
//!
//! `url` is an alias of `source` and `type` an alias of `category`.
//! `file_name` is not accepted here; only the directory scan sets it.
//!
//! ## Normalization
//!
//! Surrounding whitespace is trimmed from `source`, `category`, `weight`,
//! `style` and `display` before they are stored. A value that is blank after
//! trimming counts as unset: a blank source is rejected, any other blank
//! field takes its default.

use crate::format::FontFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a [`DescriptorInput`] could not become a [`FontDescriptor`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("source is missing")]
    MissingSource,
    #[error("source is empty")]
    EmptySource,
}

/// Where a font asset lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSource {
    Path(PathBuf),
    Url(String),
}

impl FontSource {
    /// Classify a raw source string: anything with a URL scheme or a
    /// protocol-relative/absolute web prefix is a URL, the rest is a path.
    pub fn parse(raw: &str) -> FontSource {
        if raw.starts_with("//") || raw.starts_with("data:") || has_url_scheme(raw) {
            FontSource::Url(raw.to_string())
        } else {
            FontSource::Path(PathBuf::from(raw))
        }
    }

    /// The text placed inside `url('...')`.
    pub fn as_css_url(&self) -> String {
        match self {
            FontSource::Path(p) => css_path(p),
            FontSource::Url(u) => u.clone(),
        }
    }

    /// Format implied by the source's file extension.
    pub fn format(&self) -> FontFormat {
        match self {
            FontSource::Path(p) => FontFormat::from_path(p),
            FontSource::Url(u) => FontFormat::from_url(u),
        }
    }
}

#[cfg(windows)]
fn css_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// Backslash is an ordinary file-name character outside Windows.
#[cfg(not(windows))]
fn css_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_css_url())
    }
}

/// Complete metadata for one registered font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub source: FontSource,
    pub format: FontFormat,
    /// Free-form tag used only for filtering (`chinese`, `english`, ...).
    pub category: String,
    pub weight: String,
    pub style: String,
    pub display: String,
    /// Original file name, recorded by the directory scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Values applied when a descriptor leaves a field unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescriptorDefaults {
    pub weight: String,
    pub style: String,
    pub display: String,
    pub category: String,
}

impl Default for DescriptorDefaults {
    fn default() -> Self {
        Self {
            weight: "normal".to_string(),
            style: "normal".to_string(),
            display: "swap".to_string(),
            category: "unknown".to_string(),
        }
    }
}

/// Caller-supplied descriptor before validation and default filling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorInput {
    pub name: String,
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FontFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl DescriptorInput {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn format(mut self, format: FontFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Validate the source and produce a complete descriptor.
    ///
    /// The registry wraps a failure into `InvalidDescriptor` with the font
    /// name.
    pub fn resolve(&self, defaults: &DescriptorDefaults) -> Result<FontDescriptor, DescriptorError> {
        let raw = match self.source.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            Some(_) => return Err(DescriptorError::EmptySource),
            None => return Err(DescriptorError::MissingSource),
        };
        let source = FontSource::parse(raw);
        let format = self.format.unwrap_or_else(|| source.format());
        Ok(FontDescriptor {
            source,
            format,
            category: pick(self.category.as_deref(), &defaults.category),
            weight: pick(self.weight.as_deref(), &defaults.weight),
            style: pick(self.style.as_deref(), &defaults.style),
            display: pick(self.display.as_deref(), &defaults.display),
            file_name: self.file_name.clone(),
        })
    }
}

/// `scheme://...` where scheme is `[A-Za-z0-9+.-]+`.
fn has_url_scheme(raw: &str) -> bool {
    raw.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Use the supplied value unless it is absent or blank.
fn pick(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
