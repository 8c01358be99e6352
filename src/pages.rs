//! Page-record construction.
//!
//! Stage 1 of the build pipeline. Takes the validated catalog, the locale
//! overrides, and the site config, and produces one page record per
//! (language, artwork) pair. The records land in `pages.json`, which the
//! external renderer consumes; nothing in this module touches the
//! filesystem.
//!
//! ## Record Shape
//!
//! ```text
//! pages.json
//! ├── site                         # Identity, echoed for the renderer
//! ├── languages                    # Supported set + default
//! └── pages[]
//!     ├── path                     # /painting/<slug>, /zh/painting/<slug>, ...
//!     ├── language
//!     └── context
//!         ├── id                   # Slug, stable across languages
//!         ├── artwork              # Canonical entry + resolved text
//!         ├── image_base_name      # Rendered filename minus extension
//!         ├── i18n                 # Language routing context
//!         └── prev / next          # Display-order neighbors, if any
//! ```
//!
//! ## Ordering
//!
//! Output is deterministic: languages in their configured order, artworks
//! in catalog order within each language. Prev/next navigation follows the
//! `order` field instead (ascending, stable on ties), so the catalog file
//! can stay grouped by series while the site shows a curated sequence.

use crate::catalog::{Artwork, Dimension, LocaleOverride, LocaleOverrides};
use crate::config::{Languages, SiteConfig};
use crate::locale::{self, MergedText, OverrideIndex};
use crate::naming;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A catalog entry with per-language text resolved and derived fields
/// attached. This is what the renderer sees for one painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedArtwork {
    /// Slug derived from the canonical title.
    pub id: String,
    /// Canonical title, identical in every language.
    pub title: String,
    /// Description after locale resolution.
    pub description: String,
    pub dimensions: Dimension,
    pub substrate: String,
    pub substrate_size: Dimension,
    pub medium: String,
    pub year: String,
    /// Alt text after locale resolution.
    pub alt: String,
    pub order: i64,
    /// Filename of the rendered image for this painting.
    pub image: String,
}

impl EnrichedArtwork {
    fn new(base: &Artwork, text: MergedText, id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: base.title.clone(),
            description: text.description,
            dimensions: base.dimensions.clone(),
            substrate: base.substrate.clone(),
            substrate_size: base.substrate_size.clone(),
            medium: base.medium.clone(),
            year: base.year.clone(),
            alt: text.alt,
            order: base.order,
            image: naming::image_filename(&base.title),
        }
    }
}

/// Reduced reference to an adjacent painting in display order.
///
/// Navigation shows canonical titles in every language, so this is built
/// from the base entry, never from merged text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNeighbor {
    pub id: String,
    pub title: String,
}

/// Language routing context the renderer needs on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nContext {
    /// Language this page is rendered in.
    pub language: String,
    /// Every supported language, in configured order.
    pub languages: Vec<String>,
    pub default_language: String,
    /// The unprefixed path, shared by all language variants of this page.
    pub original_path: String,
    /// Whether the path carries a language prefix.
    pub routed: bool,
}

/// Everything the renderer gets for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    pub id: String,
    pub artwork: EnrichedArtwork,
    pub image_base_name: String,
    pub i18n: I18nContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<NavNeighbor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NavNeighbor>,
}

/// One page to render: where it lives and what it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub path: String,
    pub language: String,
    pub context: PageContext,
}

/// Manifest output from the pages stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesManifest {
    pub site: SiteConfig,
    pub languages: Languages,
    pub pages: Vec<PageRecord>,
}

/// Build the path for a page: the default language lives at the original
/// path, every other language gets a prefix.
///
/// - `page_path("en", "/painting/mist", "en")` → `"/painting/mist"`
/// - `page_path("zh", "/painting/mist", "en")` → `"/zh/painting/mist"`
pub fn page_path(language: &str, original_path: &str, default_language: &str) -> String {
    if language == default_language {
        original_path.to_string()
    } else {
        format!("/{language}{original_path}")
    }
}

/// Build every page record for the site.
///
/// Pure function of its inputs: same catalog, overrides, and config always
/// produce byte-identical manifests. Locale files for unsupported languages
/// are dropped here; `check` reports them.
pub fn build_pages(
    artworks: &[Artwork],
    locales: &[LocaleOverrides],
    site: &SiteConfig,
    languages: &Languages,
) -> PagesManifest {
    // One override index per supported language. Multiple files declaring
    // the same language concatenate in file order before indexing.
    let mut grouped: HashMap<&str, Vec<&LocaleOverride>> = HashMap::new();
    for locale in locales {
        if !languages.is_supported(&locale.language) {
            continue;
        }
        grouped
            .entry(locale.language.as_str())
            .or_default()
            .extend(&locale.paintings);
    }
    let indexes: HashMap<&str, OverrideIndex> = grouped
        .into_iter()
        .map(|(lang, entries)| (lang, OverrideIndex::build(entries)))
        .collect();

    // Ids and the display sequence are language-independent; compute once.
    let ids: Vec<String> = artworks
        .iter()
        .map(|a| naming::slugify(&a.title))
        .collect();
    let sequence = display_sequence(artworks);
    let mut rank = vec![0usize; artworks.len()];
    for (pos, &i) in sequence.iter().enumerate() {
        rank[i] = pos;
    }
    let neighbor = |catalog_index: usize| NavNeighbor {
        id: ids[catalog_index].clone(),
        title: artworks[catalog_index].title.clone(),
    };

    let mut pages = Vec::with_capacity(languages.supported.len() * artworks.len());
    for language in &languages.supported {
        let index = indexes.get(language.as_str());
        for (i, artwork) in artworks.iter().enumerate() {
            let id = &ids[i];
            let text = locale::merge(artwork, index.and_then(|ix| ix.get(id)));
            let enriched = EnrichedArtwork::new(artwork, text, id);

            let original_path = format!("/painting/{id}");
            let path = page_path(language, &original_path, &languages.default);
            let pos = rank[i];
            let prev = pos.checked_sub(1).map(|p| neighbor(sequence[p]));
            let next = sequence.get(pos + 1).map(|&n| neighbor(n));

            pages.push(PageRecord {
                path,
                language: language.clone(),
                context: PageContext {
                    id: id.clone(),
                    image_base_name: naming::image_base_name(&enriched.image),
                    artwork: enriched,
                    i18n: I18nContext {
                        language: language.clone(),
                        languages: languages.supported.clone(),
                        default_language: languages.default.clone(),
                        original_path,
                        routed: !languages.is_default(language),
                    },
                    prev,
                    next,
                },
            });
        }
    }

    PagesManifest {
        site: site.clone(),
        languages: languages.clone(),
        pages,
    }
}

/// Catalog indices in display order: ascending by `order`, stable on ties
/// so the catalog file breaks them.
fn display_sequence(artworks: &[Artwork]) -> Vec<usize> {
    let mut sequence: Vec<usize> = (0..artworks.len()).collect();
    sequence.sort_by_key(|&i| artworks[i].order);
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{artwork, find_page, languages, paths_for, sample_site};

    fn override_for(title: &str, description: &str) -> LocaleOverrides {
        LocaleOverrides {
            language: "zh".to_string(),
            paintings: vec![LocaleOverride {
                title: title.to_string(),
                description: Some(description.to_string()),
                alt: None,
            }],
        }
    }

    // =========================================================================
    // page_path tests
    // =========================================================================

    #[test]
    fn default_language_keeps_original_path() {
        assert_eq!(page_path("en", "/painting/mist", "en"), "/painting/mist");
    }

    #[test]
    fn other_languages_get_a_prefix() {
        assert_eq!(page_path("zh", "/painting/mist", "en"), "/zh/painting/mist");
        assert_eq!(
            page_path("yue", "/painting/mist", "en"),
            "/yue/painting/mist"
        );
        assert_eq!(page_path("ms", "/painting/mist", "en"), "/ms/painting/mist");
    }

    // =========================================================================
    // build_pages: shape and ordering
    // =========================================================================

    #[test]
    fn one_record_per_language_and_artwork() {
        let catalog = vec![artwork("Morning Mist", 1), artwork("Evening Calm", 2)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en", "zh", "ms"]));
        assert_eq!(manifest.pages.len(), 6);
    }

    #[test]
    fn records_are_language_major_in_catalog_order() {
        // Catalog order differs from display order on purpose.
        let catalog = vec![artwork("Beta", 2), artwork("Alpha", 1)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en", "zh"]));
        let keys: Vec<String> = manifest
            .pages
            .iter()
            .map(|p| format!("{}:{}", p.language, p.context.id))
            .collect();
        assert_eq!(keys, vec!["en:beta", "en:alpha", "zh:beta", "zh:alpha"]);
    }

    #[test]
    fn empty_catalog_builds_empty_manifest() {
        let manifest = build_pages(&[], &[], &sample_site(), &languages(&["en", "zh"]));
        assert!(manifest.pages.is_empty());
        assert_eq!(manifest.site.name, "Lulu Tracy Art");
    }

    #[test]
    fn paths_follow_language_prefix_rules() {
        let catalog = vec![artwork("Morning Mist", 1)];
        let manifest = build_pages(
            &catalog,
            &[],
            &sample_site(),
            &languages(&["en", "zh", "yue", "ms"]),
        );
        assert_eq!(paths_for(&manifest, "en"), vec!["/painting/morning-mist"]);
        assert_eq!(
            paths_for(&manifest, "zh"),
            vec!["/zh/painting/morning-mist"]
        );
        assert_eq!(
            paths_for(&manifest, "yue"),
            vec!["/yue/painting/morning-mist"]
        );
        assert_eq!(
            paths_for(&manifest, "ms"),
            vec!["/ms/painting/morning-mist"]
        );
    }

    #[test]
    fn id_and_image_derive_from_title() {
        let catalog = vec![artwork("Red, White & Blue", 1)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en"]));
        let page = &manifest.pages[0];
        assert_eq!(page.context.id, "red-white-blue");
        assert_eq!(page.context.artwork.image, "red-white-blue.jpg");
        assert_eq!(page.context.image_base_name, "red-white-blue");
    }

    // =========================================================================
    // build_pages: locale resolution
    // =========================================================================

    #[test]
    fn override_applies_only_to_its_language() {
        let catalog = vec![artwork("Morning Mist", 1)];
        let locales = vec![override_for("Morning Mist", "晨雾")];
        let manifest = build_pages(&catalog, &locales, &sample_site(), &languages(&["en", "zh"]));

        let en = find_page(&manifest, "en", "morning-mist");
        let zh = find_page(&manifest, "zh", "morning-mist");
        assert_eq!(en.context.artwork.description, "Description of Morning Mist");
        assert_eq!(zh.context.artwork.description, "晨雾");
        // Title stays canonical everywhere.
        assert_eq!(zh.context.artwork.title, "Morning Mist");
    }

    #[test]
    fn unsupported_locale_file_is_dropped() {
        let catalog = vec![artwork("Morning Mist", 1)];
        let locales = vec![LocaleOverrides {
            language: "fr".to_string(),
            paintings: vec![LocaleOverride {
                title: "Morning Mist".to_string(),
                description: Some("Brume matinale".to_string()),
                alt: None,
            }],
        }];
        let manifest = build_pages(&catalog, &locales, &sample_site(), &languages(&["en", "zh"]));
        for page in &manifest.pages {
            assert_eq!(
                page.context.artwork.description,
                "Description of Morning Mist"
            );
        }
    }

    #[test]
    fn two_files_for_one_language_concatenate() {
        let catalog = vec![artwork("Morning Mist", 1), artwork("Evening Calm", 2)];
        let locales = vec![
            override_for("Morning Mist", "晨雾"),
            override_for("Evening Calm", "晚霞"),
        ];
        let manifest = build_pages(&catalog, &locales, &sample_site(), &languages(&["en", "zh"]));
        assert_eq!(
            find_page(&manifest, "zh", "morning-mist")
                .context
                .artwork
                .description,
            "晨雾"
        );
        assert_eq!(
            find_page(&manifest, "zh", "evening-calm")
                .context
                .artwork
                .description,
            "晚霞"
        );
    }

    // =========================================================================
    // build_pages: i18n context
    // =========================================================================

    #[test]
    fn i18n_context_carries_routing_info() {
        let catalog = vec![artwork("Morning Mist", 1)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en", "zh"]));

        let en = &find_page(&manifest, "en", "morning-mist").context.i18n;
        assert_eq!(en.language, "en");
        assert_eq!(en.languages, vec!["en", "zh"]);
        assert_eq!(en.default_language, "en");
        assert_eq!(en.original_path, "/painting/morning-mist");
        assert!(!en.routed);

        let zh = &find_page(&manifest, "zh", "morning-mist").context.i18n;
        assert_eq!(zh.language, "zh");
        assert_eq!(zh.original_path, "/painting/morning-mist");
        assert!(zh.routed);
    }

    // =========================================================================
    // build_pages: prev/next navigation
    // =========================================================================

    #[test]
    fn neighbors_are_none_at_the_ends() {
        let catalog = vec![
            artwork("First", 1),
            artwork("Second", 2),
            artwork("Third", 3),
        ];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en"]));

        let first = find_page(&manifest, "en", "first");
        assert_eq!(first.context.prev, None);
        assert_eq!(first.context.next.as_ref().unwrap().id, "second");

        let second = find_page(&manifest, "en", "second");
        assert_eq!(second.context.prev.as_ref().unwrap().id, "first");
        assert_eq!(second.context.next.as_ref().unwrap().id, "third");

        let third = find_page(&manifest, "en", "third");
        assert_eq!(third.context.prev.as_ref().unwrap().id, "second");
        assert_eq!(third.context.next, None);
    }

    #[test]
    fn single_artwork_has_no_neighbors() {
        let catalog = vec![artwork("Only One", 7)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en"]));
        let page = find_page(&manifest, "en", "only-one");
        assert_eq!(page.context.prev, None);
        assert_eq!(page.context.next, None);
    }

    #[test]
    fn neighbors_follow_display_order_not_catalog_position() {
        // Catalog lists Later first; display order puts Earlier first.
        let catalog = vec![artwork("Later", 2), artwork("Earlier", 1)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en"]));

        let earlier = find_page(&manifest, "en", "earlier");
        assert_eq!(earlier.context.prev, None);
        assert_eq!(earlier.context.next.as_ref().unwrap().id, "later");

        let later = find_page(&manifest, "en", "later");
        assert_eq!(later.context.prev.as_ref().unwrap().id, "earlier");
        assert_eq!(later.context.next, None);
    }

    #[test]
    fn tied_order_keeps_catalog_order() {
        let catalog = vec![artwork("Beta", 1), artwork("Alpha", 1)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en"]));

        let beta = find_page(&manifest, "en", "beta");
        assert_eq!(beta.context.prev, None);
        assert_eq!(beta.context.next.as_ref().unwrap().id, "alpha");

        let alpha = find_page(&manifest, "en", "alpha");
        assert_eq!(alpha.context.prev.as_ref().unwrap().id, "beta");
    }

    #[test]
    fn neighbor_titles_stay_canonical_in_every_language() {
        let catalog = vec![artwork("Morning Mist", 1), artwork("Evening Calm", 2)];
        let locales = vec![override_for("Evening Calm", "晚霞")];
        let manifest = build_pages(&catalog, &locales, &sample_site(), &languages(&["en", "zh"]));

        let zh = find_page(&manifest, "zh", "morning-mist");
        let next = zh.context.next.as_ref().unwrap();
        assert_eq!(next.title, "Evening Calm");
    }

    #[test]
    fn neighbors_are_identical_across_languages() {
        let catalog = vec![artwork("Morning Mist", 1), artwork("Evening Calm", 2)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en", "zh"]));
        let en = find_page(&manifest, "en", "evening-calm");
        let zh = find_page(&manifest, "zh", "evening-calm");
        assert_eq!(en.context.prev, zh.context.prev);
        assert_eq!(en.context.next, zh.context.next);
    }

    // =========================================================================
    // Manifest serialization
    // =========================================================================

    #[test]
    fn manifest_round_trips_through_json() {
        let catalog = vec![artwork("Morning Mist", 1), artwork("Evening Calm", 2)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en", "zh"]));
        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let back: PagesManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn absent_neighbors_are_omitted_from_json() {
        let catalog = vec![artwork("Only One", 1)];
        let manifest = build_pages(&catalog, &[], &sample_site(), &languages(&["en"]));
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(!json.contains("\"prev\""));
        assert!(!json.contains("\"next\""));
        assert!(json.contains("\"original_path\""));
    }
}
