//! Document-side conveniences: style injection, preload links, load checks.
//!
//! Everything here goes through the [`DocumentEnvironment`] capability. A
//! [`FontInjector`] built with [`FontInjector::detached`] has no document, and
//! its operations degrade as follows:
//!
//! | Operation | Without a document |
//! |-----------|--------------------|
//! | [`inject_css`](FontInjector::inject_css) | `Err(DocumentError::Environment)` |
//! | [`remove_injected_css`](FontInjector::remove_injected_css) | `false` |
//! | [`clear_all_injected_css`](FontInjector::clear_all_injected_css) | `0` |
//! | [`preload_fonts`](FontInjector::preload_fonts) | every outcome `Err(Environment)` |
//! | [`is_font_loaded`](FontInjector::is_font_loaded) | `false` |
//!
//! Style elements created by the injector carry the [`MANAGER_ATTR`] marker;
//! removal only ever touches marked elements.
//!
//! Preloads for different fonts run independently on the rayon pool. All of
//! them settle, one failure never cancels another, and the outcomes come back
//! in request order.

use crate::css::{CssEmitter, CssOverrides, sanitize_family};
use crate::registry::FontRegistry;
use maud::{PreEscaped, html};
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Attribute marking style elements owned by a [`FontInjector`].
pub const MANAGER_ATTR: &str = "data-fontface-manager";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("'{0}' requires a document environment")]
    Environment(&'static str),
    #[error("Font not found: '{0}'")]
    FontNotFound(String),
    #[error("Failed to load font '{name}': {reason}")]
    Load { name: String, reason: String },
}

/// A head element the injector knows how to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Style {
        id: String,
        /// Carries [`MANAGER_ATTR`].
        managed: bool,
        css: String,
    },
    PreloadLink {
        href: String,
        mime: String,
    },
}

impl Element {
    pub fn id(&self) -> Option<&str> {
        match self {
            Element::Style { id, .. } => Some(id),
            Element::PreloadLink { .. } => None,
        }
    }

    pub fn is_managed_style(&self) -> bool {
        matches!(self, Element::Style { managed: true, .. })
    }

    /// Serialize as HTML for static pages.
    pub fn to_html(&self) -> String {
        let markup = match self {
            Element::Style { id, managed, css } => html! {
                style id=(id) data-fontface-manager[*managed] {
                    (PreEscaped(css.replace("</", "<\\/")))
                }
            },
            Element::PreloadLink { href, mime } => html! {
                link rel="preload" href=(href) as="font" type=(mime) crossorigin="anonymous";
            },
        };
        markup.into_string()
    }
}

/// What a document must offer for the injector to work.
pub trait DocumentEnvironment: Send + Sync {
    fn append_to_head(&mut self, element: Element);

    fn head_elements(&self) -> &[Element];

    /// Remove every head element matching `predicate`; returns how many.
    fn remove_from_head(&mut self, predicate: &dyn Fn(&Element) -> bool) -> usize;

    /// Fetch the resource behind a preload link. `Err` carries the reason.
    fn load_link(&self, link: &Element) -> Result<(), String>;

    /// Load `source` as `family` and report whether `test_text` renders.
    fn check_font(&self, family: &str, source: &str, test_text: &str) -> Result<bool, String>;
}

/// In-memory document: a head element list and a set of sources that fail
/// to load.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    head: Vec<Element>,
    unreachable: HashSet<String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load of `source` fail.
    pub fn with_unreachable(mut self, source: impl Into<String>) -> Self {
        self.unreachable.insert(source.into());
        self
    }

    /// The head as HTML, one element per line.
    pub fn head_html(&self) -> String {
        self.head
            .iter()
            .map(Element::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DocumentEnvironment for MemoryDocument {
    fn append_to_head(&mut self, element: Element) {
        self.head.push(element);
    }

    fn head_elements(&self) -> &[Element] {
        &self.head
    }

    fn remove_from_head(&mut self, predicate: &dyn Fn(&Element) -> bool) -> usize {
        let before = self.head.len();
        self.head.retain(|e| !predicate(e));
        before - self.head.len()
    }

    fn load_link(&self, link: &Element) -> Result<(), String> {
        match link {
            Element::PreloadLink { href, .. } if self.unreachable.contains(href) => {
                Err(format!("network error fetching {href}"))
            }
            Element::PreloadLink { .. } => Ok(()),
            Element::Style { .. } => Err("not a preload link".to_string()),
        }
    }

    fn check_font(&self, _family: &str, source: &str, test_text: &str) -> Result<bool, String> {
        if self.unreachable.contains(source) {
            return Err(format!("network error fetching {source}"));
        }
        Ok(!test_text.is_empty())
    }
}

/// Options for [`FontInjector::inject_css`].
#[derive(Debug, Clone, Default)]
pub struct InjectOptions {
    /// Element id; generated from the clock when absent.
    pub id: Option<String>,
    pub overrides: CssOverrides,
}

/// Settled result of preloading one font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadOutcome {
    pub name: String,
    pub result: Result<(), DocumentError>,
}

pub struct FontInjector<D> {
    document: Option<D>,
    emitter: CssEmitter,
    injected: u64,
}

impl<D: DocumentEnvironment> FontInjector<D> {
    pub fn new(document: D) -> Self {
        Self {
            document: Some(document),
            emitter: CssEmitter::default(),
            injected: 0,
        }
    }

    /// An injector with no document; see the module docs for behavior.
    pub fn detached() -> Self {
        Self {
            document: None,
            emitter: CssEmitter::default(),
            injected: 0,
        }
    }

    pub fn with_emitter(mut self, emitter: CssEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn document(&self) -> Option<&D> {
        self.document.as_ref()
    }

    pub fn into_document(self) -> Option<D> {
        self.document
    }

    fn next_id(&mut self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.injected += 1;
        format!("fontface-{millis}-{}", self.injected)
    }

    /// Append a managed `<style>` with the CSS for `names` to the head.
    pub fn inject_css<I, S>(
        &mut self,
        registry: &FontRegistry,
        names: I,
        options: &InjectOptions,
    ) -> Result<Element, DocumentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.document.is_none() {
            return Err(DocumentError::Environment("inject_css"));
        }
        let id = match &options.id {
            Some(id) => id.clone(),
            None => self.next_id(),
        };
        let css = self
            .emitter
            .generate_css_file(registry, names, &options.overrides);
        let element = Element::Style {
            id,
            managed: true,
            css,
        };
        if let Some(doc) = self.document.as_mut() {
            doc.append_to_head(element.clone());
        }
        Ok(element)
    }

    /// Remove the managed style element with `id`. Unmarked elements with the
    /// same id are left alone.
    pub fn remove_injected_css(&mut self, id: &str) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        doc.remove_from_head(&|e: &Element| e.is_managed_style() && e.id() == Some(id)) > 0
    }

    pub fn clear_all_injected_css(&mut self) -> usize {
        let Some(doc) = self.document.as_mut() else {
            return 0;
        };
        doc.remove_from_head(&Element::is_managed_style)
    }

    /// Add a preload link per registered name and wait for every load to
    /// settle.
    pub fn preload_fonts<I, S>(&mut self, registry: &FontRegistry, names: I) -> Vec<PreloadOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        let Some(doc) = self.document.as_mut() else {
            return names
                .into_iter()
                .map(|name| PreloadOutcome {
                    name,
                    result: Err(DocumentError::Environment("preload_fonts")),
                })
                .collect();
        };

        let pending: Vec<(String, Result<Element, DocumentError>)> = names
            .into_iter()
            .map(|name| {
                let link = match registry.font_info(&name) {
                    Some(font) => {
                        let link = Element::PreloadLink {
                            href: font.source.as_css_url(),
                            mime: font.format.mime_type().to_string(),
                        };
                        doc.append_to_head(link.clone());
                        Ok(link)
                    }
                    None => Err(DocumentError::FontNotFound(name.clone())),
                };
                (name, link)
            })
            .collect();

        let doc = &*doc;
        pending
            .into_par_iter()
            .map(|(name, link)| {
                let result = link.and_then(|link| {
                    doc.load_link(&link).map_err(|reason| DocumentError::Load {
                        name: name.clone(),
                        reason,
                    })
                });
                PreloadOutcome { name, result }
            })
            .collect()
    }

    /// Whether `name` loads and renders `test_text`. Any failure is `false`.
    pub fn is_font_loaded(&self, registry: &FontRegistry, name: &str, test_text: &str) -> bool {
        let Some(doc) = self.document.as_ref() else {
            return false;
        };
        let Some(font) = registry.font_info(name) else {
            return false;
        };
        let family = sanitize_family(name, self.emitter.keep_cjk);
        match doc.check_font(&family, &font.source.as_css_url(), test_text) {
            Ok(available) => available,
            Err(reason) => {
                log::debug!("font '{name}' failed to load: {reason}");
                false
            }
        }
    }
}
