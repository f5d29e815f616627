//! `@font-face` CSS emission.
//!
//! Emission is a pure function of the registry plus per-call overrides. Every
//! block has exactly this shape (two-space indent, no trailing newline):
//!
//! ```text
//! @font-face {
//!   font-family: 'Inter';
//!   src: url('https://cdn.example.com/inter.woff2') format('woff2');
//!   font-weight: normal;
//!   font-style: normal;
//!   font-display: swap;
//! }
//! ```
//!
//! Multiple blocks are joined with one blank line. The combined text is
//! trimmed, so a file never starts or ends with whitespace.
//!
//! ## Family Names
//!
//! The registry key is used verbatim for lookup, but the `font-family` value
//! is sanitized: only ASCII letters, digits, `-` and `_` survive, plus CJK
//! unified ideographs when [`CssEmitter::keep_cjk`] is set (the default).
//! `"Noto Sans (Bold)"` is emitted as `NotoSansBold`.
//!
//! ## Batches
//!
//! [`CssEmitter::generate_css_file`] never fails: a name that is not
//! registered is logged as a warning and left out.

use crate::registry::FontRegistry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CssError {
    #[error("Font not found: '{0}'")]
    FontNotFound(String),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Per-call replacements for the descriptor's stored weight/style/display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssOverrides {
    pub weight: Option<String>,
    pub style: Option<String>,
    pub display: Option<String>,
}

impl CssOverrides {
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
}

/// Is `c` in the CJK Unified Ideographs block (U+4E00–U+9FFF)?
fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Strip everything that is not safe inside a quoted CSS family name.
pub fn sanitize_family(name: &str, keep_cjk: bool) -> String {
    name.chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric()
                || c == '-'
                || c == '_'
                || (keep_cjk && is_cjk_ideograph(c))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssEmitter {
    pub keep_cjk: bool,
}

impl Default for CssEmitter {
    fn default() -> Self {
        Self { keep_cjk: true }
    }
}

impl CssEmitter {
    pub fn new(keep_cjk: bool) -> Self {
        Self { keep_cjk }
    }

    /// One `@font-face` block for `name`.
    pub fn generate_font_css(
        &self,
        registry: &FontRegistry,
        name: &str,
        overrides: &CssOverrides,
    ) -> Result<String, CssError> {
        let font = registry
            .font_info(name)
            .ok_or_else(|| CssError::FontNotFound(name.to_string()))?;
        let weight = supplied(overrides.weight.as_deref()).unwrap_or(&font.weight);
        let style = supplied(overrides.style.as_deref()).unwrap_or(&font.style);
        let display = supplied(overrides.display.as_deref()).unwrap_or(&font.display);

        Ok(format!(
            r#"@font-face {{
  font-family: '{family}';
  src: url('{src}') format('{format}');
  font-weight: {weight};
  font-style: {style};
  font-display: {display};
}}"#,
            family = sanitize_family(name, self.keep_cjk),
            src = font.source.as_css_url(),
            format = font.format.css_name(),
        ))
    }

    /// Blocks for every registered name in `names`, in the given order.
    ///
    /// Unregistered names are logged and skipped.
    pub fn generate_css_file<I, S>(
        &self,
        registry: &FontRegistry,
        names: I,
        overrides: &CssOverrides,
    ) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocks: Vec<String> = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                match self.generate_font_css(registry, name, overrides) {
                    Ok(block) => Some(block),
                    Err(e) => {
                        log::warn!("skipping font '{name}': {e}");
                        None
                    }
                }
            })
            .collect();
        blocks.join("\n\n").trim().to_string()
    }

    /// Generate the batch and write it to `output_path`, replacing any
    /// existing file.
    pub fn write_css_file<I, S>(
        &self,
        registry: &FontRegistry,
        names: I,
        output_path: &Path,
        overrides: &CssOverrides,
    ) -> Result<(), CssError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let css = self.generate_css_file(registry, names, overrides);
        fs::write(output_path, &css).map_err(|source| CssError::Io {
            path: output_path.display().to_string(),
            source,
        })?;
        log::info!("wrote {} bytes of CSS to {}", css.len(), output_path.display());
        Ok(())
    }
}

/// An override that is absent or blank leaves the stored value in place.
fn supplied(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// [`CssEmitter::generate_font_css`] with the default emitter.
pub fn generate_font_css(
    registry: &FontRegistry,
    name: &str,
    overrides: &CssOverrides,
) -> Result<String, CssError> {
    CssEmitter::default().generate_font_css(registry, name, overrides)
}

/// [`CssEmitter::generate_css_file`] with the default emitter.
pub fn generate_css_file<I, S>(registry: &FontRegistry, names: I, overrides: &CssOverrides) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CssEmitter::default().generate_css_file(registry, names, overrides)
}

/// [`CssEmitter::write_css_file`] with the default emitter.
pub fn write_css_file<I, S>(
    registry: &FontRegistry,
    names: I,
    output_path: &Path,
    overrides: &CssOverrides,
) -> Result<(), CssError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    CssEmitter::default().write_css_file(registry, names, output_path, overrides)
}
