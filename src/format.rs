//! Font file formats as they appear in `@font-face` `format()` hints.
//!
//! The format is always derivable from a source: an explicit value wins,
//! otherwise the file extension decides, and anything unrecognized falls back
//! to [`FontFormat::TrueType`]. A descriptor never carries an empty format.
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.woff2`  | `woff2` |
//! | `.woff`   | `woff` |
//! | `.ttf`    | `truetype` |
//! | `.otf`    | `opentype` |
//! | `.eot`    | `embedded-opentype` |
//! | `.svg`    | `svg` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFormat {
    #[serde(rename = "woff2")]
    Woff2,
    #[serde(rename = "woff")]
    Woff,
    #[default]
    #[serde(rename = "truetype")]
    TrueType,
    #[serde(rename = "opentype")]
    OpenType,
    #[serde(rename = "embedded-opentype")]
    EmbeddedOpenType,
    #[serde(rename = "svg")]
    Svg,
}

impl FontFormat {
    /// The value written inside `format('...')`.
    pub fn css_name(self) -> &'static str {
        match self {
            FontFormat::Woff2 => "woff2",
            FontFormat::Woff => "woff",
            FontFormat::TrueType => "truetype",
            FontFormat::OpenType => "opentype",
            FontFormat::EmbeddedOpenType => "embedded-opentype",
            FontFormat::Svg => "svg",
        }
    }

    /// Map a bare extension (no dot, any case) to a format.
    pub fn from_extension(ext: &str) -> FontFormat {
        match ext.to_ascii_lowercase().as_str() {
            "woff2" => FontFormat::Woff2,
            "woff" => FontFormat::Woff,
            "ttf" => FontFormat::TrueType,
            "otf" => FontFormat::OpenType,
            "eot" => FontFormat::EmbeddedOpenType,
            "svg" => FontFormat::Svg,
            _ => FontFormat::TrueType,
        }
    }

    /// Format of a filesystem path, from its file extension.
    ///
    /// `?` and `#` are ordinary file-name characters here.
    pub fn from_path(path: &Path) -> FontFormat {
        path.extension()
            .map(|ext| FontFormat::from_extension(&ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Format of a URL, from the extension of its last path segment.
    ///
    /// Query strings and fragments are ignored, so
    /// `https://cdn.example/a.woff2?v=3#x` is still `woff2`.
    pub fn from_url(url: &str) -> FontFormat {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        let path = &url[..end];
        let file = path.rsplit('/').next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => FontFormat::from_extension(ext),
            _ => FontFormat::TrueType,
        }
    }

    /// MIME type used for `<link rel="preload" type="...">`.
    pub fn mime_type(self) -> &'static str {
        match self {
            FontFormat::Woff2 => "font/woff2",
            FontFormat::Woff => "font/woff",
            FontFormat::TrueType => "font/ttf",
            FontFormat::OpenType => "font/otf",
            FontFormat::EmbeddedOpenType => "application/vnd.ms-fontobject",
            FontFormat::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for FontFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "woff2" => Ok(FontFormat::Woff2),
            "woff" => Ok(FontFormat::Woff),
            "truetype" => Ok(FontFormat::TrueType),
            "opentype" => Ok(FontFormat::OpenType),
            "embedded-opentype" => Ok(FontFormat::EmbeddedOpenType),
            "svg" => Ok(FontFormat::Svg),
            other => Err(format!("unknown font format '{other}'")),
        }
    }
}
