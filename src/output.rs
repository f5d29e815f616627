//! CLI output formatting.
//!
//! Output is information-first: each font is shown by position and name,
//! with its source and CSS-facing fields as indented context lines.
//!
//! ```text
//! chinese
//! 001 SimSun (truetype)
//!     Source: fonts/chinese/SimSun.ttf
//! 002 思源黑体 (opentype)
//!     Source: fonts/chinese/思源黑体.otf
//!
//! english
//! 001 Inter (truetype)
//!     Source: fonts/english/Inter.ttf
//!
//! 3 fonts
//! ```
//!
//! Each `format_*` function is pure and returns lines for testability; the
//! matching `print_*` wrapper writes them to stdout.

use crate::descriptor::FontDescriptor;
use crate::document::PreloadOutcome;
use crate::registry::FontRegistry;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn font_header(index: usize, name: &str, font: &FontDescriptor) -> String {
    format!("{} {} ({})", format_index(index), name, font.format)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Registered fonts grouped by category, in order of first appearance.
///
/// With `category` set, only that group is listed.
pub fn format_font_list(registry: &FontRegistry, category: Option<&str>) -> Vec<String> {
    let mut categories: Vec<&str> = Vec::new();
    for (_, font) in registry.iter() {
        if !categories.contains(&font.category.as_str()) {
            categories.push(&font.category);
        }
    }
    if let Some(wanted) = category {
        categories.retain(|c| *c == wanted);
    }

    let mut lines = Vec::new();
    let mut total = 0;
    for cat in categories {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(cat.to_string());
        for (i, name) in registry.fonts_by_category(cat).into_iter().enumerate() {
            if let Some(font) = registry.font_info(name) {
                lines.push(font_header(i + 1, name, font));
                lines.push(format!("{}Source: {}", indent(1), font.source));
                total += 1;
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("{} font{}", total, plural(total)));
    lines
}

pub fn print_font_list(registry: &FontRegistry, category: Option<&str>) {
    for line in format_font_list(registry, category) {
        println!("{}", line);
    }
}

/// Every descriptor field for one font.
pub fn format_font_info(name: &str, font: &FontDescriptor) -> Vec<String> {
    let mut lines = vec![
        name.to_string(),
        format!("{}Source: {}", indent(1), font.source),
        format!("{}Format: {}", indent(1), font.format),
        format!("{}Category: {}", indent(1), font.category),
        format!("{}Weight: {}", indent(1), font.weight),
        format!("{}Style: {}", indent(1), font.style),
        format!("{}Display: {}", indent(1), font.display),
    ];
    if let Some(file_name) = &font.file_name {
        lines.push(format!("{}File: {}", indent(1), file_name));
    }
    lines
}

pub fn print_font_info(name: &str, font: &FontDescriptor) {
    for line in format_font_info(name, font) {
        println!("{}", line);
    }
}

/// One line per preload that did not settle successfully.
pub fn format_preload_failures(outcomes: &[PreloadOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|e| format!("{}: {}", o.name, e)))
        .collect()
}

pub fn print_preload_failures(outcomes: &[PreloadOutcome]) {
    for line in format_preload_failures(outcomes) {
        eprintln!("{}", line);
    }
}
