//! Descriptor providers: where a registry's initial contents come from.
//!
//! A provider answers one question: "which fonts exist?". Two providers ship
//! with the crate:
//!
//! - [`DirectoryScan`] walks a fixed set of category directories for `.otf`
//!   and `.ttf` files. The file stem becomes the font name.
//! - [`DescriptorList`] returns a caller-supplied list, typically hosted
//!   fonts loaded from a JSON file.
//!
//! ## Directory Layout
//!
//! ```text
//! fonts/
//! ├── fontface.toml          # Optional config
//! ├── chinese/               # category = "chinese"
//! │   ├── SourceHanSans.otf  # → "SourceHanSans", opentype
//! │   └── SimSun.TTF         # → "SimSun", truetype (extension case ignored)
//! └── english/               # category = "english"
//!     ├── Inter.ttf
//!     └── notes.txt          # skipped
//! ```
//!
//! A configured directory that does not exist is skipped, not an error.

use crate::descriptor::DescriptorInput;
use crate::format::FontFormat;
use crate::registry::RegistryError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Descriptor list parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Source of descriptors for [`crate::registry::FontRegistry::from_provider`].
pub trait DescriptorProvider {
    fn descriptors(&self) -> Result<Vec<DescriptorInput>, ProviderError>;
}

/// Extensions picked up by [`DirectoryScan`].
const SCAN_EXTENSIONS: &[&str] = &["otf", "ttf"];

/// One directory to scan and the category its fonts get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanDir {
    pub category: String,
    pub path: PathBuf,
}

impl ScanDir {
    pub fn new(category: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            category: category.into(),
            path: path.into(),
        }
    }
}

/// Scan category directories for `.otf`/`.ttf` files.
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    pub dirs: Vec<ScanDir>,
}

impl DirectoryScan {
    pub fn new(dirs: Vec<ScanDir>) -> Self {
        Self { dirs }
    }

    /// The stock `chinese/` and `english/` layout under `root`.
    pub fn standard(root: &Path) -> Self {
        Self::new(vec![
            ScanDir::new("chinese", root.join("chinese")),
            ScanDir::new("english", root.join("english")),
        ])
    }

    fn scan_dir(dir: &ScanDir, out: &mut Vec<DescriptorInput>) -> Result<(), ProviderError> {
        if !dir.path.is_dir() {
            log::debug!("skipping missing font directory {}", dir.path.display());
            return Ok(());
        }

        let entries = WalkDir::new(&dir.path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
                continue;
            };
            if !SCAN_EXTENSIONS.contains(&ext.as_str()) {
                log::debug!("skipping non-font file {}", path.display());
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let file_name = entry.file_name().to_string_lossy().to_string();

            out.push(DescriptorInput {
                name: stem,
                source: Some(path.to_string_lossy().to_string()),
                category: Some(dir.category.clone()),
                format: Some(FontFormat::from_extension(&ext)),
                file_name: Some(file_name),
                ..DescriptorInput::default()
            });
        }
        Ok(())
    }
}

impl DescriptorProvider for DirectoryScan {
    fn descriptors(&self) -> Result<Vec<DescriptorInput>, ProviderError> {
        let mut found = Vec::new();
        for dir in &self.dirs {
            Self::scan_dir(dir, &mut found)?;
        }
        Ok(found)
    }
}

/// An explicit list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct DescriptorList {
    pub fonts: Vec<DescriptorInput>,
}

impl DescriptorList {
    pub fn new(fonts: Vec<DescriptorInput>) -> Self {
        Self { fonts }
    }

    /// Parse a JSON array of descriptor objects.
    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        let fonts: Vec<DescriptorInput> = serde_json::from_str(json)?;
        Ok(Self { fonts })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl DescriptorProvider for DescriptorList {
    fn descriptors(&self) -> Result<Vec<DescriptorInput>, ProviderError> {
        Ok(self.fonts.clone())
    }
}
