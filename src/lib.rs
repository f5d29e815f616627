//! # fontface
//!
//! A font registry that emits `@font-face` CSS. Fonts are registered by name
//! with a source (a local path or a URL), a format, and CSS-facing defaults;
//! CSS is generated on demand for one font or a batch, written to a file, or
//! injected into a document.
//!
//! # Architecture
//!
//! ```text
//! DescriptorProvider  ──►  FontRegistry  ──►  CssEmitter  ──►  String / file
//! (scan dirs | list)       (name → descriptor)                      │
//!                                                                   ▼
//!                                               FontInjector ──► DocumentEnvironment
//! ```
//!
//! The registry is built once from a provider and then only changes through
//! explicit register/unregister calls. Emission is a pure function of the
//! registry plus per-call overrides, so it is testable without a filesystem
//! or a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | Font formats and extension-based detection |
//! | [`descriptor`] | Descriptor input, defaults, and the resolved descriptor |
//! | [`provider`] | Directory scan and explicit-list descriptor providers |
//! | [`registry`] | The name → descriptor table |
//! | [`css`] | `@font-face` generation, batching, and file output |
//! | [`document`] | Style injection, preload links, load checks behind a document capability |
//! | [`config`] | `fontface.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Global Registry
//!
//! The library never creates a registry on its own. A host that wants a
//! process-wide default builds one at startup from [`config::FontConfig`] and
//! passes it by reference. Tests construct as many private registries as
//! they like.
//!
//! ## One Registry, Pluggable Sources
//!
//! Local and hosted fonts share one [`registry::FontRegistry`]. Only the
//! [`provider::DescriptorProvider`] differs, and format detection plus
//! default filling are shared by both.
//!
//! ## Documents as a Capability
//!
//! Injection and load checks go through [`document::DocumentEnvironment`].
//! Without one, [`document::FontInjector`] reports an environment error or a
//! safe `false`, and the CSS core never needs to know where it runs.

pub mod config;
pub mod css;
pub mod descriptor;
pub mod document;
pub mod format;
pub mod output;
pub mod provider;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_helpers;
