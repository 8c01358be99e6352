//! # Atelier
//!
//! A build pipeline for multilingual painting portfolios. One YAML catalog
//! is the source of truth: every painting is described once, in the
//! canonical language, and per-language files override only the fields they
//! translate. Rendering is someone else's job; this crate prepares what the
//! renderer consumes and repairs what it destroys.
//!
//! # Architecture: Pipeline Around A Renderer
//!
//! The pipeline has three stages with an external renderer in the middle:
//!
//! ```text
//! 1. pages     content/    →  pages.json   (catalog + locales → page records)
//! 2. render    pages.json  →  dist/        (external static-site renderer)
//! 3. inject    dist/       →  dist/        (EXIF re-stamped into rendered JPEGs)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Renderer independence**: `pages.json` is plain JSON; any tool that
//!   can template from it will do, and swapping renderers never touches the
//!   catalog or the injector.
//! - **Debuggability**: the manifest is human-readable, so a wrong page is
//!   diagnosed by reading one file, not by stepping through templates.
//! - **Testability**: page building is a pure function from catalog to
//!   manifest; unit tests exercise every routing and override rule without
//!   touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `site.yaml` loading and validation: site identity + language set |
//! | [`catalog`] | `paintings.yaml` and `locales/*.yaml` loading, catalog validation |
//! | [`naming`] | Title-to-slug derivation shared by every stage |
//! | [`locale`] | Override indexing and per-language text resolution |
//! | [`pages`] | Stage 1: builds the page-record manifest the renderer consumes |
//! | [`exif`] | APP1/TIFF serialization and JPEG segment splicing |
//! | [`inject`] | Stage 3: walks rendered assets and stamps EXIF in place |
//! | [`output`] | CLI output formatting: information-first display of results |
//!
//! # Design Decisions
//!
//! ## One Canonical Catalog, Partial Overrides
//!
//! Translations lag behind the catalog, always. A locale file therefore
//! overrides per field, and only a non-empty value wins: a painting added
//! yesterday shows canonical text in every language today, and nothing a
//! translator forgot can publish an empty description. Titles are exempt
//! from overriding entirely because slugs, routes, and image filenames all
//! derive from them.
//!
//! ## The Slug Is The Join Key
//!
//! There is no id field to keep in sync. The page builder derives each
//! painting's id, route, and image filename from its title via
//! [`naming::slugify`], and the injector derives the same slug from each
//! rendered filename. Renaming a painting renames its page and image
//! together; a rendered file that matches no slug simply is not catalog
//! material and is left alone.
//!
//! ## EXIF Splicing, Not Re-Encoding
//!
//! The renderer strips metadata when it optimizes images, so the injector
//! puts it back. It does this by splicing an APP1 segment into the JPEG
//! header and copying everything else verbatim: pixels are never decoded,
//! quality is never touched, and restamping an already-stamped file just
//! replaces the old segment. The TIFF writer in [`exif`] emits exactly the
//! tags the catalog can fill, nothing generic.
//!
//! ## Metadata Is Always Canonical
//!
//! A rendered image is shared by every language variant of its page, so the
//! stamped EXIF text comes from the canonical catalog, never from locale
//! overrides. The copyright line carries the build year; the painting's own
//! year goes to `DateTimeOriginal`.

pub mod catalog;
pub mod config;
pub mod exif;
pub mod inject;
pub mod locale;
pub mod naming;
pub mod output;
pub mod pages;

#[cfg(test)]
pub(crate) mod test_helpers;
