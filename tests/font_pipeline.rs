//! End-to-end tests through the public API: font root on disk → config →
//! provider → registry → CSS text, files, and document injection.

use fontface::config::{self, CONFIG_FILE};
use fontface::css::{CssEmitter, CssError, CssOverrides};
use fontface::descriptor::DescriptorInput;
use fontface::document::{DocumentEnvironment, Element, FontInjector, InjectOptions, MemoryDocument};
use fontface::format::FontFormat;
use fontface::registry::FontRegistry;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"\x00\x01\x00\x00").unwrap();
}

fn load(root: &Path) -> (FontRegistry, CssEmitter) {
    let font_config = config::load_config(root).unwrap();
    let provider = font_config.provider(root).unwrap();
    let registry =
        FontRegistry::from_provider(provider.as_ref(), font_config.defaults.clone()).unwrap();
    (registry, font_config.emitter())
}

fn families(css: &str) -> Vec<&str> {
    css.lines()
        .filter_map(|l| l.trim().strip_prefix("font-family: '"))
        .filter_map(|l| l.strip_suffix("';"))
        .collect()
}

#[test]
fn scanned_root_to_css_file() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("chinese/思源黑体.otf"));
    touch(&tmp.path().join("english/Inter.ttf"));
    touch(&tmp.path().join("english/Inter.woff"));

    let (registry, emitter) = load(tmp.path());
    assert_eq!(registry.available_fonts(), vec!["思源黑体", "Inter"]);
    assert_eq!(registry.fonts_by_category("chinese"), vec!["思源黑体"]);

    let info = registry.font_info("思源黑体").unwrap();
    assert_eq!(info.format, FontFormat::OpenType);
    assert_eq!(info.file_name.as_deref(), Some("思源黑体.otf"));

    let out = tmp.path().join("fonts.css");
    emitter
        .write_css_file(&registry, ["思源黑体", "ghost", "Inter"], &out, &CssOverrides::default())
        .unwrap();
    let css = fs::read_to_string(&out).unwrap();
    assert_eq!(families(&css), vec!["思源黑体", "Inter"]);
    assert!(css.contains("format('opentype')"));
    assert!(css.contains("format('truetype')"));
    assert_eq!(css, css.trim());
}

#[test]
fn hosted_fonts_from_descriptor_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(CONFIG_FILE),
        r#"
fonts_file = "hosted.json"

[defaults]
display = "fallback"
"#,
    )
    .unwrap();
    fs::write(
        tmp.path().join("hosted.json"),
        r#"[
            {"name": "Inter", "url": "https://cdn.example.com/inter.woff2", "type": "english"},
            {"name": "Legacy", "url": "https://cdn.example.com/legacy.eot"},
            {"name": "Odd", "url": "https://cdn.example.com/odd.xyz", "weight": "300"}
        ]"#,
    )
    .unwrap();

    let (registry, emitter) = load(tmp.path());
    assert_eq!(registry.font_info("Inter").unwrap().format, FontFormat::Woff2);
    assert_eq!(
        registry.font_info("Legacy").unwrap().format,
        FontFormat::EmbeddedOpenType
    );
    assert_eq!(registry.font_info("Odd").unwrap().format, FontFormat::TrueType);
    assert_eq!(registry.font_info("Legacy").unwrap().category, "unknown");

    let css = emitter
        .generate_font_css(&registry, "Odd", &CssOverrides::default())
        .unwrap();
    assert_eq!(
        css,
        "@font-face {\n  font-family: 'Odd';\n  src: url('https://cdn.example.com/odd.xyz') format('truetype');\n  font-weight: 300;\n  font-style: normal;\n  font-display: fallback;\n}"
    );
}

#[test]
fn cjk_stripped_when_configured() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(CONFIG_FILE), "[css]\nkeep_cjk = false\n").unwrap();
    touch(&tmp.path().join("chinese/黑体Pro.ttf"));

    let (registry, emitter) = load(tmp.path());
    let css = emitter
        .generate_font_css(&registry, "黑体Pro", &CssOverrides::default())
        .unwrap();
    assert_eq!(families(&css), vec!["Pro"]);
}

#[test]
fn runtime_registration_and_removal() {
    let tmp = TempDir::new().unwrap();
    let (mut registry, emitter) = load(tmp.path());
    assert!(registry.is_empty());

    registry
        .register_font(
            "Inter",
            DescriptorInput::new("Inter", "https://cdn.example.com/inter.woff2"),
        )
        .unwrap();
    assert!(
        emitter
            .generate_font_css(&registry, "Inter", &CssOverrides::default())
            .is_ok()
    );

    assert!(registry.unregister_font("Inter"));
    assert!(registry.font_info("Inter").is_none());
    assert!(matches!(
        emitter.generate_font_css(&registry, "Inter", &CssOverrides::default()),
        Err(CssError::FontNotFound(_))
    ));
}

#[test]
fn inject_preload_and_clear() {
    let mut registry = FontRegistry::default();
    for name in ["Inter", "Lora"] {
        registry
            .register_font(
                name,
                DescriptorInput::new(name, format!("https://cdn.example.com/{name}.woff2")),
            )
            .unwrap();
    }

    let mut doc = MemoryDocument::new();
    doc.append_to_head(Element::Style {
        id: "site".into(),
        managed: false,
        css: "body { margin: 0; }".into(),
    });
    let mut injector = FontInjector::new(doc);

    let outcomes = injector.preload_fonts(&registry, ["Inter", "Lora", "ghost"]);
    assert_eq!(outcomes.iter().filter(|o| o.result.is_ok()).count(), 2);

    let options = InjectOptions {
        id: Some("fonts".into()),
        overrides: CssOverrides::default().display("block"),
    };
    injector
        .inject_css(&registry, ["Inter", "Lora"], &options)
        .unwrap();
    injector
        .inject_css(&registry, ["Inter"], &InjectOptions::default())
        .unwrap();

    let html = injector.document().unwrap().head_html();
    assert!(html.contains(r#"<style id="fonts" data-fontface-manager>"#));
    assert!(html.contains("font-display: block;"));
    assert_eq!(html.matches(r#"rel="preload""#).count(), 2);

    assert!(injector.is_font_loaded(&registry, "Inter", "Hello"));
    assert_eq!(injector.clear_all_injected_css(), 2);

    let head = injector.document().unwrap().head_elements();
    assert_eq!(head.len(), 3);
    assert!(head.iter().all(|e| !e.is_managed_style()));
}
