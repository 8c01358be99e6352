//! Slug derivation for titles and rendered-asset names.
//!
//! Every artwork is addressed by a slug derived from its canonical title.
//! The same derivation feeds three places: the page path
//! (`/painting/<slug>`), the rendered image name (`<slug>.jpg`), and the
//! injector's join from rendered files back to catalog records. Keeping
//! all three in this module means they cannot drift apart.
//!
//! ## Derivation rules
//!
//! Lowercase the title, turn every run of characters outside `a-z0-9`
//! into a single hyphen, and trim hyphens from both ends:
//! - `"Morning Mist"` → `morning-mist`
//! - `"Red, White & Blue"` → `red-white-blue`
//! - `"Nocturne #3"` → `nocturne-3`
//! - `"  Spaced  Out  "` → `spaced-out`
//!
//! Non-ASCII letters count as separators, so titles are expected to carry
//! at least some ASCII. A title that slugs to the empty string is caught
//! by catalog validation, not here.

/// Extension given to every rendered image the pipeline knows about.
pub const IMAGE_EXT: &str = "jpg";

/// Derive the canonical slug for a title.
///
/// - `"Morning Mist"` → `"morning-mist"`
/// - `"Nocturne #3"` → `"nocturne-3"`
/// - `"---"` → `""`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Filename of the rendered image for a title: slug plus the fixed
/// extension (`"Morning Mist"` → `"morning-mist.jpg"`).
pub fn image_filename(title: &str) -> String {
    format!("{}.{IMAGE_EXT}", slugify(title))
}

/// Strip the extension from an image filename, giving back the slug
/// (`"morning-mist.jpg"` → `"morning-mist"`). Inverse of
/// [`image_filename`] for well-formed names; arbitrary filenames just
/// lose their last `.suffix`.
pub fn image_base_name(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((base, _ext)) => base.to_string(),
        None => filename.to_string(),
    }
}
