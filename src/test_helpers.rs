//! Shared test utilities for the fontface test suite.
//!
//! Provides fixture builders (a scannable font tree on disk, small in-memory
//! registries) and extractors for generated CSS.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_font_tree();
//! let registry = scanned_registry(tmp.path());
//! assert_eq!(registry.fonts_by_category("english"), vec!["Inter", "Lora"]);
//!
//! let css = generate_css_file(&registry, ["Inter"], &CssOverrides::default());
//! assert_eq!(css_families(&css), vec!["Inter"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::descriptor::{DescriptorDefaults, DescriptorInput};
use crate::provider::DirectoryScan;
use crate::registry::FontRegistry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a few placeholder bytes at `path`, creating parent directories.
///
/// Nothing in the crate parses font data, so the content is irrelevant.
pub fn write_dummy_font(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"\x00\x01\x00\x00").unwrap();
}

/// Build the standard two-category tree in a temp directory:
///
/// ```text
/// chinese/SimSun.TTF
/// chinese/思源黑体.otf
/// chinese/readme.txt
/// english/Inter.ttf
/// english/Inter.woff2
/// english/Lora.otf
/// english/notes.txt
/// ```
pub fn setup_font_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for file in [
        "chinese/SimSun.TTF",
        "chinese/思源黑体.otf",
        "chinese/readme.txt",
        "english/Inter.ttf",
        "english/Inter.woff2",
        "english/Lora.otf",
        "english/notes.txt",
    ] {
        write_dummy_font(&tmp.path().join(file));
    }
    tmp
}

// =========================================================================
// Registries
// =========================================================================

pub fn empty_registry() -> FontRegistry {
    FontRegistry::new(DescriptorDefaults::default())
}

/// Registry with one hosted `woff2` font per name at
/// `https://fonts.example.com/<name>.woff2`.
pub fn registry_with(names: &[&str]) -> FontRegistry {
    let mut registry = empty_registry();
    for name in names {
        registry
            .register_font(
                name,
                DescriptorInput::new(*name, format!("https://fonts.example.com/{name}.woff2")),
            )
            .unwrap();
    }
    registry
}

/// Registry built from the standard directory scan of `root`.
pub fn scanned_registry(root: &Path) -> FontRegistry {
    FontRegistry::from_provider(&DirectoryScan::standard(root), DescriptorDefaults::default())
        .unwrap()
}

// =========================================================================
// CSS extractors
// =========================================================================

/// The `font-family` values of every block in `css`, in order.
pub fn css_families(css: &str) -> Vec<&str> {
    css.lines()
        .filter_map(|l| l.trim().strip_prefix("font-family: '"))
        .filter_map(|l| l.strip_suffix("';"))
        .collect()
}
