//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every painting is its semantic identity: positional index plus
//! canonical title. Paths, filenames, and per-language routes are secondary
//! context on indented lines. This makes the output readable as a catalog
//! inventory while still letting users trace records back to files.
//!
//! # Output Format
//!
//! ## Pages
//!
//! ```text
//! Paintings
//! 001 Morning Mist
//!     Image: morning-mist.jpg
//!     en → /painting/morning-mist
//!     zh → /zh/painting/morning-mist
//!
//! Built 6 page records (3 paintings, 2 languages)
//! ```
//!
//! ## Inject
//!
//! ```text
//! Morning Mist
//!     File: dist/static/morning-mist.jpg
//! Warning: failed to stamp dist/static/evening-calm.jpg: Not a JPEG file (missing SOI marker)
//! Stamped 6 images (1 skipped)
//! ```
//!
//! ## Check
//!
//! ```text
//! Site
//!     Lulu Tracy Art (Lulu Tracy)
//!     Languages: en, zh (default: en)
//!
//! Paintings
//! 001 Morning Mist
//!     Image: morning-mist.jpg
//!
//! Locales
//!     zh: 2 overrides, 1 applied
//!         Unmatched: Olden Days
//!     fr: skipped (unsupported language)
//!
//! Content is valid (2 warnings)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::{Artwork, LocaleOverrides};
use crate::config::{Languages, SiteConfig};
use crate::inject::{InjectEvent, InjectSummary};
use crate::locale;
use crate::naming;
use crate::pages::PagesManifest;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Stage 1: Pages output
// ============================================================================

/// Format page-building output, one block per painting.
///
/// The manifest is language-major; display is painting-major, so each block
/// shows every route one painting resolves to. The spine is the default
/// language, which carries every painting in catalog order.
pub fn format_pages_output(manifest: &PagesManifest) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Paintings".to_string());

    let spine: Vec<_> = manifest
        .pages
        .iter()
        .filter(|p| p.language == manifest.languages.default)
        .collect();

    for (i, page) in spine.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            page.context.artwork.title
        ));
        lines.push(format!("    Image: {}", page.context.artwork.image));
        for language in &manifest.languages.supported {
            if let Some(variant) = manifest
                .pages
                .iter()
                .find(|p| &p.language == language && p.context.id == page.context.id)
            {
                lines.push(format!("    {} \u{2192} {}", language, variant.path));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {} page records ({} paintings, {} languages)",
        manifest.pages.len(),
        spine.len(),
        manifest.languages.supported.len()
    ));

    lines
}

/// Print pages output to stdout.
pub fn print_pages_output(manifest: &PagesManifest) {
    for line in format_pages_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Inject output
// ============================================================================

/// Format a single injection progress event as display lines.
///
/// Stamped files lead with the painting's title; the file path is indented
/// context. Failures are one-line warnings carrying the reason.
pub fn format_inject_event(event: &InjectEvent) -> Vec<String> {
    match event {
        InjectEvent::Stamped { path, title } => {
            vec![
                title.clone(),
                format!("    File: {}", path.display()),
            ]
        }
        InjectEvent::Failed { path, reason } => {
            vec![format!(
                "Warning: failed to stamp {}: {}",
                path.display(),
                reason
            )]
        }
    }
}

/// Format the batch summary printed after all events.
pub fn format_inject_summary(summary: &InjectSummary) -> String {
    format!(
        "Stamped {} images ({} skipped)",
        summary.processed, summary.skipped
    )
}

// ============================================================================
// Check output
// ============================================================================

/// Format content-lint output: site identity, catalog inventory, and the
/// per-locale override report. Warnings (unmatched overrides, unsupported
/// locale files) never fail the command; they are surfaced for fixing.
pub fn format_check_output(
    artworks: &[Artwork],
    locales: &[LocaleOverrides],
    site: &SiteConfig,
    languages: &Languages,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut warnings = 0;

    lines.push("Site".to_string());
    lines.push(format!("    {} ({})", site.name, site.author));
    lines.push(format!(
        "    Languages: {} (default: {})",
        languages.supported.join(", "),
        languages.default
    ));

    lines.push(String::new());
    lines.push("Paintings".to_string());
    for (i, artwork) in artworks.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), artwork.title));
        lines.push(format!(
            "    Image: {}",
            naming::image_filename(&artwork.title)
        ));
    }

    if !locales.is_empty() {
        lines.push(String::new());
        lines.push("Locales".to_string());
        for file in locales {
            if !languages.is_supported(&file.language) {
                lines.push(format!(
                    "    {}: skipped (unsupported language)",
                    file.language
                ));
                warnings += 1;
                continue;
            }
            let unmatched = locale::unmatched_overrides(artworks, &file.paintings);
            lines.push(format!(
                "    {}: {} overrides, {} applied",
                file.language,
                file.paintings.len(),
                file.paintings.len() - unmatched.len()
            ));
            for title in unmatched {
                lines.push(format!("        Unmatched: {}", title));
                warnings += 1;
            }
        }
    }

    lines.push(String::new());
    if warnings == 0 {
        lines.push("Content is valid".to_string());
    } else {
        lines.push(format!("Content is valid ({} warnings)", warnings));
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(
    artworks: &[Artwork],
    locales: &[LocaleOverrides],
    site: &SiteConfig,
    languages: &Languages,
) {
    for line in format_check_output(artworks, locales, site, languages) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
