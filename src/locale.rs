//! Locale override resolution.
//!
//! The canonical catalog is English. Per-language files override only the
//! translatable text (description, alt); everything else, including the
//! title, stays canonical so slugs, paths, and filenames never vary by
//! language.
//!
//! ## Matching
//!
//! Overrides name the painting they target by its canonical title, but the
//! join happens on the derived slug, not the raw string. Translation files
//! get edited by hand; matching on slugs absorbs case, whitespace, and
//! punctuation drift between `paintings.yaml` and a locale file. When two
//! overrides in one language derive the same slug, the later one wins.
//!
//! ## Resolution priority
//!
//! Each field is resolved independently. The override wins only when it
//! has something to say:
//!
//! ```text
//! description: resolve(override description → canonical description)
//! alt:         resolve(override alt → canonical alt)
//! ```
//!
//! Absent, empty, and whitespace-only override values all mean "keep the
//! canonical text". A translator can therefore stub out a file with just
//! titles and fill in fields over time without ever blanking a page.

use crate::catalog::{Artwork, LocaleOverride};
use crate::naming;
use std::collections::{HashMap, HashSet};

/// Per-language override lookup, keyed by the slug of the override's title.
///
/// Built once per language per run, then shared across every artwork.
#[derive(Debug, Default)]
pub struct OverrideIndex {
    by_slug: HashMap<String, LocaleOverride>,
}

impl OverrideIndex {
    /// Index overrides by derived slug. Later entries win on collision.
    pub fn build<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = &'a LocaleOverride>,
    {
        let mut by_slug = HashMap::new();
        for o in overrides {
            by_slug.insert(naming::slugify(&o.title), o.clone());
        }
        Self { by_slug }
    }

    /// Look up the override for an artwork slug.
    pub fn get(&self, slug: &str) -> Option<&LocaleOverride> {
        self.by_slug.get(slug)
    }
}

/// The translatable fields after override resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedText {
    pub description: String,
    pub alt: String,
}

/// Resolve the text for one artwork in one language.
///
/// `override_` is the entry the [`OverrideIndex`] found for the artwork's
/// slug, or `None` when the language has nothing for it.
pub fn merge(base: &Artwork, override_: Option<&LocaleOverride>) -> MergedText {
    MergedText {
        description: pick(
            override_.and_then(|o| o.description.as_deref()),
            &base.description,
        ),
        alt: pick(override_.and_then(|o| o.alt.as_deref()), &base.alt),
    }
}

/// First value with content wins: the override if non-empty after trimming,
/// the canonical text otherwise. Override values come back trimmed; the
/// canonical text passes through verbatim.
fn pick(override_value: Option<&str>, base: &str) -> String {
    match override_value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.to_string(),
        None => base.to_string(),
    }
}

/// Override titles that match no catalog entry.
///
/// These are silently dropped at merge time (a stale translation must not
/// fail the build), but `check` surfaces them so typos get fixed.
pub fn unmatched_overrides<'a>(
    artworks: &[Artwork],
    overrides: &'a [LocaleOverride],
) -> Vec<&'a str> {
    let known: HashSet<String> = artworks
        .iter()
        .map(|a| naming::slugify(&a.title))
        .collect();
    overrides
        .iter()
        .filter(|o| !known.contains(&naming::slugify(&o.title)))
        .map(|o| o.title.as_str())
        .collect()
}
