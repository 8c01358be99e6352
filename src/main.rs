use atelier::{catalog, config, inject, output, pages};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Build pipeline for multilingual painting portfolios")]
#[command(long_about = "\
Build pipeline for multilingual painting portfolios

A YAML content tree is the data source. Every painting lives in one
canonical catalog; per-language files override only the fields they
translate, and pages come out one per painting per language.

Content structure:

  content/
  ├── site/
  │   └── site.yaml                # Site identity + supported languages
  └── paintings/
      ├── paintings.yaml           # Canonical catalog (ordered, English)
      └── locales/
          ├── zh.yaml              # Per-language overrides (partial OK)
          └── yue.yaml

Pipeline:

  1. atelier pages     Build page records for every painting in every language
  2. <your renderer>   Render pages.json into HTML + optimized images
  3. atelier inject    Re-stamp EXIF metadata the renderer stripped

Rendered images are joined back to the catalog by slug: the page builder
names images <slug>.jpg, so a rendered file matches the painting whose
title slugifies to its base name.

Run 'atelier check' to validate content without writing anything.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    content: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the page-record manifest consumed by the renderer
    Pages {
        /// Where to write the manifest
        #[arg(long, default_value = "pages.json")]
        out: PathBuf,
    },
    /// Stamp EXIF metadata into rendered images, in place
    Inject {
        /// Root of the renderer's output tree
        #[arg(long)]
        assets: PathBuf,
        /// Worker threads (defaults to all cores)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Validate content and report locale coverage without writing
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Pages { out } => {
            let site = config::load_site(&cli.content)?;
            let artworks = catalog::load_catalog(&cli.content)?;
            let locales = catalog::load_overrides(&cli.content)?;
            let manifest = pages::build_pages(&artworks, &locales, &site.site, &site.languages);
            output::print_pages_output(&manifest);
            let json = serde_json::to_string_pretty(&manifest)?;
            write_atomic(&out, json.as_bytes())?;
            println!("Wrote {}", out.display());
        }
        Command::Inject { assets, threads } => {
            let site = config::load_site(&cli.content)?;
            let artworks = catalog::load_catalog(&cli.content)?;
            init_thread_pool(threads);
            let year = chrono::Utc::now().year();
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_inject_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let summary = inject::inject(&artworks, &site.site, &assets, year, Some(tx))?;
            printer.join().unwrap();
            println!("{}", output::format_inject_summary(&summary));
        }
        Command::Check => {
            let site = config::load_site(&cli.content)?;
            let artworks = catalog::load_catalog(&cli.content)?;
            let locales = catalog::load_overrides(&cli.content)?;
            output::print_check_output(&artworks, &locales, &site.site, &site.languages);
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool from the --threads flag.
fn init_thread_pool(requested: Option<usize>) {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(requested))
        .build_global()
        .ok();
}

/// Write via a sibling temp file and rename, so the renderer never sees a
/// half-written manifest.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}
