//! Artwork catalog: data model and YAML loading.
//!
//! The catalog is the single source of truth for every painting the site
//! shows. The canonical file is English; per-language files under
//! `locales/` override only the translatable text fields and are merged
//! downstream by [`crate::locale`].
//!
//! ## Content Layout
//!
//! ```text
//! content/
//! ├── site/
//! │   └── site.yaml            # Site identity + language set
//! └── paintings/
//!     ├── paintings.yaml       # Canonical catalog (English)
//!     └── locales/
//!         ├── zh.yaml          # Per-language text overrides
//!         ├── yue.yaml
//!         └── ms.yaml
//! ```
//!
//! ## Catalog Entry
//!
//! ```yaml
//! paintings:
//!   - title: Morning Mist
//!     description: Fog over the harbor at dawn.
//!     dimensions: { width: 10, height: 12, unit: in }
//!     substrate: canvas
//!     substrateSize: { width: 11, height: 14, unit: in }
//!     medium: oil
//!     year: "2024"
//!     alt: Oil painting of fog over a harbor
//!     order: 1
//! ```
//!
//! Older entries may carry free-text sizes (`dimensions: "10 x 12 inches"`);
//! both shapes are accepted and preserved as written.
//!
//! ## Validation
//!
//! Loading enforces these rules:
//! - Every title is unique
//! - Every title derives a unique, non-empty slug
//! - An empty catalog is legal (the pipeline produces no pages)

use crate::naming;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("YAML parse error in {0}: {1}")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
    #[error("Duplicate artwork title: {0:?}")]
    DuplicateTitle(String),
    #[error("Slug collision: {first:?} and {second:?} both derive \"{slug}\"")]
    SlugCollision {
        first: String,
        second: String,
        slug: String,
    },
    #[error("Title {0:?} derives an empty slug")]
    EmptySlug(String),
}

/// Unit of a structured measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Cm,
    In,
    Mm,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Mm => "mm",
        };
        f.write_str(s)
    }
}

/// Physical size of an artwork or its substrate.
///
/// Two catalog generations coexist: newer entries carry a structured
/// mapping, older ones a free-text string. Structured sizes display as
/// `{width} × {height} {unit}`; free text passes through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Structured { width: f64, height: f64, unit: Unit },
    Legacy(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Structured {
                width,
                height,
                unit,
            } => write!(f, "{width} × {height} {unit}"),
            Dimension::Legacy(text) => f.write_str(text),
        }
    }
}

/// One painting as recorded in the canonical catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artwork {
    /// Canonical (English) title. Unique across the catalog; every slug,
    /// page path, and rendered filename derives from it.
    pub title: String,
    /// Canonical description, overridable per language.
    pub description: String,
    /// Painted area.
    pub dimensions: Dimension,
    /// Support material (canvas, watercolor paper, ...).
    pub substrate: String,
    /// Size of the support, usually larger than the painted area.
    #[serde(rename = "substrateSize")]
    pub substrate_size: Dimension,
    /// Paint medium (oil, gouache, ...).
    pub medium: String,
    /// Year of completion, kept as text (catalogs say "2024" or "ca. 2003").
    pub year: String,
    /// Image alt text, overridable per language.
    pub alt: String,
    /// Display position. Ascending; ties keep catalog order.
    pub order: i64,
}

/// Per-language override for one painting's translatable text.
///
/// `title` names the base entry being overridden; it is matched by slug,
/// never replaced. Absent and empty fields both mean "keep the canonical
/// text".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleOverride {
    /// Canonical title of the entry this override targets.
    pub title: String,
    /// Translated description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Translated alt text, if any.
    #[serde(default)]
    pub alt: Option<String>,
}

/// All overrides one locale file provides.
#[derive(Debug, Clone)]
pub struct LocaleOverrides {
    /// Language tag the file declares (`language:` key, not the filename).
    pub language: String,
    pub paintings: Vec<LocaleOverride>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    paintings: Vec<Artwork>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocaleFile {
    language: String,
    #[serde(default)]
    paintings: Vec<LocaleOverride>,
}

/// Path of the canonical catalog under a content root.
pub fn catalog_path(content_root: &Path) -> PathBuf {
    content_root.join("paintings").join("paintings.yaml")
}

/// Directory holding per-language override files.
pub fn locales_dir(content_root: &Path) -> PathBuf {
    content_root.join("paintings").join("locales")
}

/// Load and validate the canonical catalog.
///
/// Entries come back in file order, which is the catalog order every
/// downstream stage preserves. Any failure is build-fatal.
pub fn load_catalog(content_root: &Path) -> Result<Vec<Artwork>, CatalogError> {
    let path = catalog_path(content_root);
    let content = fs::read_to_string(&path).map_err(|e| CatalogError::Read(path.clone(), e))?;
    let file: CatalogFile =
        serde_yaml::from_str(&content).map_err(|e| CatalogError::Yaml(path.clone(), e))?;
    validate_catalog(&file.paintings)?;
    Ok(file.paintings)
}

/// Load every locale override file, sorted by filename for determinism.
///
/// A missing `locales/` directory means a single-language site and is not
/// an error. Files with other extensions are ignored; a file that exists
/// but fails to parse is build-fatal.
pub fn load_overrides(content_root: &Path) -> Result<Vec<LocaleOverrides>, CatalogError> {
    let dir = locales_dir(content_root);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .map_err(|e| CatalogError::Read(dir.clone(), e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_yaml(path))
        .collect();
    paths.sort();

    let mut locales = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).map_err(|e| CatalogError::Read(path.clone(), e))?;
        let file: LocaleFile =
            serde_yaml::from_str(&content).map_err(|e| CatalogError::Yaml(path.clone(), e))?;
        locales.push(LocaleOverrides {
            language: file.language,
            paintings: file.paintings,
        });
    }
    Ok(locales)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Reject catalogs whose titles cannot coexist: duplicate titles, titles
/// whose slugs collide, and titles that slug to nothing. Collisions would
/// silently merge two paintings into one page and one image name, so they
/// fail the build instead.
fn validate_catalog(artworks: &[Artwork]) -> Result<(), CatalogError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for artwork in artworks {
        let slug = naming::slugify(&artwork.title);
        if slug.is_empty() {
            return Err(CatalogError::EmptySlug(artwork.title.clone()));
        }
        match seen.get(&slug) {
            Some(first) if *first == artwork.title => {
                return Err(CatalogError::DuplicateTitle(artwork.title.clone()));
            }
            Some(first) => {
                return Err(CatalogError::SlugCollision {
                    first: (*first).to_string(),
                    second: artwork.title.clone(),
                    slug,
                });
            }
            None => {
                seen.insert(slug, artwork.title.as_str());
            }
        }
    }
    Ok(())
}
