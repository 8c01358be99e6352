//! Shared test utilities for the atelier test suite.
//!
//! Provides catalog and site-config builders, minimal JPEG fixtures for the
//! injector, and lookup helpers over built page manifests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = vec![artwork("Morning Mist", 1), artwork("Evening Calm", 2)];
//! let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en", "zh"]));
//!
//! let page = find_page(&manifest, "zh", "morning-mist");
//! assert_eq!(page.path, "/zh/painting/morning-mist");
//! ```

use crate::catalog::{Artwork, Dimension, Unit};
use crate::config::{Languages, SiteConfig};
use crate::pages::{PageRecord, PagesManifest};

// =========================================================================
// Catalog and config builders
// =========================================================================

/// A fully-populated artwork with the given title and display order.
///
/// Field values are deliberately boring; tests that care about a field
/// overwrite it after construction.
pub fn artwork(title: &str, order: i64) -> Artwork {
    Artwork {
        title: title.to_string(),
        description: format!("Description of {title}"),
        dimensions: Dimension::Structured {
            width: 10.0,
            height: 12.0,
            unit: Unit::In,
        },
        substrate: "canvas".to_string(),
        substrate_size: Dimension::Structured {
            width: 11.0,
            height: 14.0,
            unit: Unit::In,
        },
        medium: "oil".to_string(),
        year: "2024".to_string(),
        alt: format!("Painting titled {title}"),
        order,
    }
}

/// Site identity used across tests.
pub fn sample_site() -> SiteConfig {
    SiteConfig {
        name: "Lulu Tracy Art".to_string(),
        author: "Lulu Tracy".to_string(),
        email: "hello@lulutracy.com".to_string(),
        url: "https://lulutracy.com".to_string(),
    }
}

/// Language set with the first entry as default.
///
/// Panics on an empty list: a test asking for zero languages is a bug.
pub fn languages(tags: &[&str]) -> Languages {
    Languages {
        supported: tags.iter().map(|t| t.to_string()).collect(),
        default: tags
            .first()
            .unwrap_or_else(|| panic!("languages() needs at least one tag"))
            .to_string(),
    }
}

// =========================================================================
// JPEG fixtures: structurally valid, visually nothing
// =========================================================================

/// Minimal JPEG: SOI, JFIF APP0, SOS, three entropy bytes, EOI.
///
/// Enough structure for the segment walker to traverse; no decoder would
/// get an image out of it.
pub fn tiny_jpeg() -> Vec<u8> {
    let mut jpeg = Vec::new();
    jpeg.extend_from_slice(&[0xFF, 0xD8]); // SOI
    jpeg.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, // APP0, length 16
        b'J', b'F', b'I', b'F', 0x00, // identifier
        0x01, 0x01, // version 1.1
        0x00, // density units
        0x00, 0x01, 0x00, 0x01, // x/y density
        0x00, 0x00, // no thumbnail
    ]);
    jpeg.extend_from_slice(&sos_and_tail());
    jpeg
}

/// JPEG with no application segments at all: SOI straight to SOS.
pub fn bare_jpeg() -> Vec<u8> {
    let mut jpeg = Vec::new();
    jpeg.extend_from_slice(&[0xFF, 0xD8]);
    jpeg.extend_from_slice(&sos_and_tail());
    jpeg
}

fn sos_and_tail() -> Vec<u8> {
    vec![
        0xFF, 0xDA, 0x00, 0x08, // SOS, length 8
        0x01, // one component
        0x01, 0x00, // component 1, tables 0
        0x00, 0x3F, 0x00, // spectral selection
        0x12, 0x34, 0x56, // entropy-coded data
        0xFF, 0xD9, // EOI
    ]
}

// =========================================================================
// Manifest lookups that panic with a clear message on miss
// =========================================================================

/// Find a page record by language and id. Panics if not found.
pub fn find_page<'a>(manifest: &'a PagesManifest, language: &str, id: &str) -> &'a PageRecord {
    manifest
        .pages
        .iter()
        .find(|p| p.language == language && p.context.id == id)
        .unwrap_or_else(|| {
            let have: Vec<String> = manifest
                .pages
                .iter()
                .map(|p| format!("{}:{}", p.language, p.context.id))
                .collect();
            panic!("page '{language}:{id}' not found. Available: {have:?}")
        })
}

/// All page paths for one language, in manifest order.
pub fn paths_for<'a>(manifest: &'a PagesManifest, language: &str) -> Vec<&'a str> {
    manifest
        .pages
        .iter()
        .filter(|p| p.language == language)
        .map(|p| p.path.as_str())
        .collect()
}
