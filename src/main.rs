use clap::{Parser, Subcommand};
use fontface::config;
use fontface::css::{CssEmitter, CssOverrides};
use fontface::document::{FontInjector, InjectOptions, MemoryDocument};
use fontface::output;
use fontface::registry::FontRegistry;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once per process; the leak is a few bytes.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Per-call replacements for the registered weight/style/display.
#[derive(clap::Args, Clone, Default)]
struct OverrideArgs {
    /// font-weight for every emitted block
    #[arg(long)]
    weight: Option<String>,
    /// font-style for every emitted block
    #[arg(long)]
    style: Option<String>,
    /// font-display for every emitted block
    #[arg(long)]
    display: Option<String>,
}

impl From<OverrideArgs> for CssOverrides {
    fn from(args: OverrideArgs) -> Self {
        CssOverrides {
            weight: args.weight,
            style: args.style,
            display: args.display,
        }
    }
}

#[derive(Parser)]
#[command(name = "fontface")]
#[command(about = "Register fonts and emit @font-face CSS")]
#[command(long_about = "\
Register fonts and emit @font-face CSS

Fonts come from the font root: either .otf/.ttf files in per-category
directories, or a JSON descriptor list named by fonts_file in fontface.toml.

Font root structure:

  fonts/
  ├── fontface.toml          # Optional config (see gen-config)
  ├── chinese/               # category \"chinese\"
  │   └── 思源黑体.otf        # registered as \"思源黑体\"
  └── english/               # category \"english\"
      └── Inter.ttf          # registered as \"Inter\"

Set RUST_LOG=warn (or info, debug) to see skipped fonts and written files.")]
#[command(version = version_string())]
struct Cli {
    /// Font root directory
    #[arg(long, default_value = "fonts", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered fonts by category
    List {
        /// Only list this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one font's descriptor
    Info {
        name: String,
        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print @font-face CSS for the given fonts (all fonts when none given)
    Css {
        names: Vec<String>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Write @font-face CSS to a file, replacing it
    Write {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        names: Vec<String>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print an HTML head snippet: a managed <style> plus optional preload links
    Html {
        names: Vec<String>,
        /// id of the generated <style> element
        #[arg(long)]
        id: Option<String>,
        /// Also emit <link rel="preload"> for each font
        #[arg(long)]
        preload: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print a stock fontface.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::List { category } => {
            let (registry, _) = load_fonts(&cli.root)?;
            output::print_font_list(&registry, category.as_deref());
        }
        Command::Info { name, json } => {
            let (registry, _) = load_fonts(&cli.root)?;
            let font = registry.require(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(font)?);
            } else {
                output::print_font_info(&name, font);
            }
        }
        Command::Css { names, overrides } => {
            let (registry, emitter) = load_fonts(&cli.root)?;
            let names = names_or_all(names, &registry);
            let css = emitter.generate_css_file(&registry, &names, &overrides.into());
            println!("{}", css);
        }
        Command::Write {
            out,
            names,
            overrides,
        } => {
            let (registry, emitter) = load_fonts(&cli.root)?;
            let names = names_or_all(names, &registry);
            emitter.write_css_file(&registry, &names, &out, &overrides.into())?;
            println!("==> Wrote {}", out.display());
        }
        Command::Html {
            names,
            id,
            preload,
            overrides,
        } => {
            let (registry, emitter) = load_fonts(&cli.root)?;
            let names = names_or_all(names, &registry);
            let mut injector = FontInjector::new(MemoryDocument::new()).with_emitter(emitter);
            if preload {
                let outcomes = injector.preload_fonts(&registry, &names);
                output::print_preload_failures(&outcomes);
            }
            let options = InjectOptions {
                id,
                overrides: overrides.into(),
            };
            injector.inject_css(&registry, &names, &options)?;
            if let Some(doc) = injector.document() {
                println!("{}", doc.head_html());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `fontface.toml` and build the process-wide registry from the
/// configured provider.
fn load_fonts(root: &Path) -> Result<(FontRegistry, CssEmitter), Box<dyn std::error::Error>> {
    let font_config = config::load_config(root)?;
    let provider = font_config.provider(root)?;
    let registry = FontRegistry::from_provider(provider.as_ref(), font_config.defaults.clone())?;
    Ok((registry, font_config.emitter()))
}

fn names_or_all(names: Vec<String>, registry: &FontRegistry) -> Vec<String> {
    if names.is_empty() {
        registry
            .available_fonts()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        names
    }
}
