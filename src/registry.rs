//! The font registry: a name → descriptor table.
//!
//! The registry is built once from a [`DescriptorProvider`] (a directory scan
//! or a caller-supplied list) and afterwards only changes through
//! [`FontRegistry::register_font`] and [`FontRegistry::unregister_font`].
//! There is no background refresh and no file watching.
//!
//! Lookups are exact and case-sensitive: `"Inter"` and `"inter"` are two
//! different keys. The name is stored as given; sanitizing it into a CSS
//! family identifier is the emitter's job ([`crate::css::sanitize_family`]).
//!
//! The library holds no global instance. A host that wants a process-wide
//! default builds one at startup and passes it around (see `main.rs`).

use crate::descriptor::{DescriptorDefaults, DescriptorError, DescriptorInput, FontDescriptor};
use crate::provider::{DescriptorProvider, ProviderError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid descriptor for font '{name}': {reason}")]
    InvalidDescriptor {
        name: String,
        #[source]
        reason: DescriptorError,
    },
    #[error("Font not found: '{0}'")]
    FontNotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, FontDescriptor>,
    /// Names in first-registration order.
    order: Vec<String>,
    defaults: DescriptorDefaults,
}

impl FontRegistry {
    /// An empty registry that fills unset fields from `defaults`.
    pub fn new(defaults: DescriptorDefaults) -> Self {
        Self {
            fonts: HashMap::new(),
            order: Vec::new(),
            defaults,
        }
    }

    /// Build a registry from every descriptor the provider yields.
    ///
    /// Either all descriptors register or the first failure is returned and
    /// no registry is produced.
    pub fn from_provider(
        provider: &dyn DescriptorProvider,
        defaults: DescriptorDefaults,
    ) -> Result<Self, ProviderError> {
        let mut registry = Self::new(defaults);
        for input in provider.descriptors()? {
            let name = input.name.clone();
            registry.register_font(&name, input)?;
        }
        log::debug!("registry built with {} fonts", registry.len());
        Ok(registry)
    }

    /// Insert or replace the descriptor for `name`.
    ///
    /// The stored descriptor is derived only from `input` and the registry
    /// defaults; nothing carries over from a previous entry. On error the
    /// existing entry (if any) is left untouched.
    pub fn register_font(
        &mut self,
        name: &str,
        input: DescriptorInput,
    ) -> Result<&FontDescriptor, RegistryError> {
        let descriptor =
            input
                .resolve(&self.defaults)
                .map_err(|reason| RegistryError::InvalidDescriptor {
                    name: name.to_string(),
                    reason,
                })?;
        if !self.fonts.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.fonts.insert(name.to_string(), descriptor);
        Ok(&self.fonts[name])
    }

    /// Remove `name`. Returns whether anything was removed.
    pub fn unregister_font(&mut self, name: &str) -> bool {
        if self.fonts.remove(name).is_none() {
            return false;
        }
        self.order.retain(|n| n != name);
        true
    }

    /// All registered names, in registration order.
    pub fn available_fonts(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn font_info(&self, name: &str) -> Option<&FontDescriptor> {
        self.fonts.get(name)
    }

    /// Like [`font_info`](Self::font_info) but an absent name is an error.
    pub fn require(&self, name: &str) -> Result<&FontDescriptor, RegistryError> {
        self.font_info(name)
            .ok_or_else(|| RegistryError::FontNotFound(name.to_string()))
    }

    /// Names whose category equals `category` exactly.
    pub fn fonts_by_category(&self, category: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|n| self.fonts[n.as_str()].category == category)
            .map(String::as_str)
            .collect()
    }

    /// Registered `(name, descriptor)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FontDescriptor)> {
        self.order
            .iter()
            .map(|n| (n.as_str(), &self.fonts[n.as_str()]))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn defaults(&self) -> &DescriptorDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FontFormat;
    use crate::provider::DescriptorList;
    use crate::test_helpers::*;

    #[test]
    fn register_then_lookup() {
        let mut registry = empty_registry();
        registry
            .register_font("Inter", DescriptorInput::new("Inter", "/f/inter.woff2"))
            .unwrap();
        let d = registry.font_info("Inter").unwrap();
        assert_eq!(d.format, FontFormat::Woff2);
        assert_eq!(d.weight, "normal");
        assert_eq!(d.display, "swap");
    }

    #[test]
    fn registration_is_repeatable() {
        let mut registry = empty_registry();
        let input = DescriptorInput::new("Inter", "/f/inter.woff2").weight("600");
        let first = registry.register_font("Inter", input.clone()).unwrap().clone();
        let second = registry.register_font("Inter", input).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregister_overwrites_without_merge() {
        let mut registry = empty_registry();
        registry
            .register_font(
                "Inter",
                DescriptorInput::new("Inter", "/f/inter.woff2")
                    .weight("700")
                    .style("italic"),
            )
            .unwrap();
        registry
            .register_font("Inter", DescriptorInput::new("Inter", "/f/inter.otf"))
            .unwrap();
        let d = registry.font_info("Inter").unwrap();
        assert_eq!(d.format, FontFormat::OpenType);
        assert_eq!(d.weight, "normal");
        assert_eq!(d.style, "normal");
    }

    #[test]
    fn reregister_keeps_original_position() {
        let mut registry = registry_with(&["A", "B", "C"]);
        registry
            .register_font("A", DescriptorInput::new("A", "/f/a2.ttf"))
            .unwrap();
        assert_eq!(registry.available_fonts(), vec!["A", "B", "C"]);
    }

    #[test]
    fn invalid_descriptor_leaves_entry_untouched() {
        let mut registry = registry_with(&["A"]);
        let before = registry.font_info("A").cloned();
        let err = registry
            .register_font(
                "A",
                DescriptorInput {
                    name: "A".into(),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidDescriptor {
                name: "A".into(),
                reason: DescriptorError::MissingSource,
            }
        );
        assert_eq!(registry.font_info("A").cloned(), before);
    }

    #[test]
    fn invalid_descriptor_does_not_insert_new_name() {
        let mut registry = empty_registry();
        assert!(
            registry
                .register_font("Ghost", DescriptorInput::new("Ghost", ""))
                .is_err()
        );
        assert!(registry.font_info("Ghost").is_none());
        assert!(registry.available_fonts().is_empty());
    }

    #[test]
    fn hash_in_local_path_keeps_format() {
        let mut registry = empty_registry();
        registry
            .register_font("A", DescriptorInput::new("A", "/srv/fonts/C#Mono.woff2"))
            .unwrap();
        assert_eq!(registry.font_info("A").unwrap().format, FontFormat::Woff2);
    }

    #[test]
    fn unregister_present_and_absent() {
        let mut registry = registry_with(&["A", "B"]);
        assert!(registry.unregister_font("A"));
        assert!(registry.font_info("A").is_none());
        assert_eq!(registry.available_fonts(), vec!["B"]);

        assert!(!registry.unregister_font("A"));
        assert!(!registry.unregister_font("nope"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = registry_with(&["Inter"]);
        assert!(registry.font_info("Inter").is_some());
        assert!(registry.font_info("inter").is_none());
        assert!(registry.font_info("Inter ").is_none());
    }

    #[test]
    fn require_reports_font_not_found() {
        let registry = registry_with(&["A"]);
        assert_eq!(
            registry.require("ghost").unwrap_err(),
            RegistryError::FontNotFound("ghost".into())
        );
    }

    #[test]
    fn filter_by_category() {
        let mut registry = empty_registry();
        for (name, category) in [("Hei", "chinese"), ("Inter", "english"), ("Song", "chinese")] {
            registry
                .register_font(
                    name,
                    DescriptorInput::new(name, format!("/f/{name}.ttf")).category(category),
                )
                .unwrap();
        }
        assert_eq!(registry.fonts_by_category("chinese"), vec!["Hei", "Song"]);
        assert_eq!(registry.fonts_by_category("english"), vec!["Inter"]);
        assert!(registry.fonts_by_category("Chinese").is_empty());
        assert!(registry.fonts_by_category("chin*").is_empty());
    }

    #[test]
    fn from_provider_registers_everything() {
        let provider = DescriptorList::new(vec![
            DescriptorInput::new("A", "https://x/a.woff2"),
            DescriptorInput::new("B", "https://x/b.woff"),
        ]);
        let registry =
            FontRegistry::from_provider(&provider, DescriptorDefaults::default()).unwrap();
        assert_eq!(registry.available_fonts(), vec!["A", "B"]);
    }

    #[test]
    fn from_provider_fails_whole_on_bad_descriptor() {
        let provider = DescriptorList::new(vec![
            DescriptorInput::new("A", "https://x/a.woff2"),
            DescriptorInput {
                name: "Broken".into(),
                ..Default::default()
            },
        ]);
        let err = FontRegistry::from_provider(&provider, DescriptorDefaults::default())
            .unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn custom_defaults_apply() {
        let defaults = DescriptorDefaults {
            display: "optional".into(),
            ..Default::default()
        };
        let mut registry = FontRegistry::new(defaults);
        registry
            .register_font("A", DescriptorInput::new("A", "a.ttf"))
            .unwrap();
        assert_eq!(registry.font_info("A").unwrap().display, "optional");
    }
}
