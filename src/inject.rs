//! Post-render EXIF injection.
//!
//! Stage 3 of the build pipeline. The external renderer strips metadata
//! while optimizing images, so after it runs the pipeline walks the
//! rendered output, joins every `*.jpg` back to its catalog entry, and
//! splices a fresh EXIF segment into the file. Pixels are untouched; only
//! header segments change.
//!
//! ## Matching
//!
//! The candidate key for a file is its name minus the extension, looked up
//! against the slugs of the catalog. `morning-mist.jpg` matches the
//! painting titled "Morning Mist" because both sides use the same
//! derivation. Files that match nothing (favicons, social-card images) are
//! left byte-identical and do not appear in the totals.
//!
//! ## Failure Policy
//!
//! A file that cannot be stamped (unreadable, not actually a JPEG, write
//! refused) is reported and counted as skipped; the batch keeps going and
//! the exit code stays zero. Only a missing assets directory aborts the
//! stage, since that means the renderer never ran.
//!
//! ## Parallelism
//!
//! Files are stamped in parallel using [rayon](https://docs.rs/rayon);
//! totals are atomic counters and progress events go through a channel to
//! a single printer thread, so output never interleaves.

use crate::catalog::Artwork;
use crate::config::SiteConfig;
use crate::exif::{self, TagSet};
use crate::naming;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum InjectError {
    #[error("Rendered-assets directory not found: {0}")]
    AssetsRootMissing(PathBuf),
}

/// Why one file failed to stamp. Never fatal for the batch.
#[derive(Error, Debug)]
pub enum StampError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("EXIF error: {0}")]
    Exif(#[from] exif::ExifError),
}

/// Progress events emitted while stamping, one per matched file.
#[derive(Debug)]
pub enum InjectEvent {
    Stamped { path: PathBuf, title: String },
    Failed { path: PathBuf, reason: String },
}

/// Batch totals. `processed + skipped` equals the number of matched files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InjectSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Stamp EXIF metadata into every rendered image that matches the catalog.
///
/// `year` is the build year, used for the copyright line. Pass an event
/// sender to get per-file progress; the sender is dropped when the batch
/// finishes, which ends the receiving loop.
pub fn inject(
    artworks: &[Artwork],
    site: &SiteConfig,
    assets_root: &Path,
    year: i32,
    events: Option<Sender<InjectEvent>>,
) -> Result<InjectSummary, InjectError> {
    if !assets_root.is_dir() {
        return Err(InjectError::AssetsRootMissing(assets_root.to_path_buf()));
    }

    let by_slug: HashMap<String, &Artwork> = artworks
        .iter()
        .map(|a| (naming::slugify(&a.title), a))
        .collect();
    let files = collect_jpegs(assets_root);

    let processed = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let Some(artwork) = candidate_slug(path).and_then(|slug| by_slug.get(slug.as_str()))
        else {
            return; // not ours: left byte-identical, uncounted
        };
        match stamp_file(path, artwork, site, year) {
            Ok(()) => {
                processed.fetch_add(1, Ordering::Relaxed);
                if let Some(tx) = &events {
                    let _ = tx.send(InjectEvent::Stamped {
                        path: path.clone(),
                        title: artwork.title.clone(),
                    });
                }
            }
            Err(err) => {
                skipped.fetch_add(1, Ordering::Relaxed);
                if let Some(tx) = &events {
                    let _ = tx.send(InjectEvent::Failed {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
    });

    Ok(InjectSummary {
        processed: processed.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
    })
}

/// Assemble the tag set for one artwork.
///
/// Metadata is always written in the canonical language, whatever language
/// a page displays: rendered images are shared across all page variants.
/// The build year feeds the copyright line; the artwork's own year feeds
/// DateTimeOriginal.
pub fn tag_set(artwork: &Artwork, site: &SiteConfig, year: i32) -> TagSet {
    TagSet {
        artist: site.author.clone(),
        copyright: format!("© {year} {}. All rights reserved.", site.name),
        image_description: artwork.title.clone(),
        software: site.name.clone(),
        user_comment: user_comment(artwork),
        date_time_original: format!("{}:01:01 00:00:00", artwork.year),
    }
}

/// One-line catalog card for the UserComment tag: the description, then
/// labeled fields, pipe-separated.
pub fn user_comment(artwork: &Artwork) -> String {
    [
        artwork.description.clone(),
        format!("Medium: {} on {}", artwork.medium, artwork.substrate),
        format!("Size: {}", artwork.dimensions),
        format!("Substrate: {}", artwork.substrate_size),
        format!("Year: {}", artwork.year),
    ]
    .join(" | ")
}

/// Read, stamp, write back. Whole-file passes; rendered gallery JPEGs are
/// small enough that streaming would buy nothing.
fn stamp_file(
    path: &Path,
    artwork: &Artwork,
    site: &SiteConfig,
    year: i32,
) -> Result<(), StampError> {
    let original = fs::read(path)?;
    let stamped = exif::stamp(&original, &tag_set(artwork, site, year))?;
    fs::write(path, stamped)?;
    Ok(())
}

/// Filename minus extension; the lookup key into the catalog.
fn candidate_slug(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Every `*.jpg` under the root (extension matched case-insensitively),
/// sorted by name so runs are deterministic.
fn collect_jpegs(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case(naming::IMAGE_EXT))
                .unwrap_or(false)
        })
        .collect()
}
