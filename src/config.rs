//! Site configuration module.
//!
//! Handles loading and validating `site.yaml`: who the site belongs to and
//! which languages it publishes. Both the page builder and the metadata
//! injector start from this file, so a broken one fails the whole build
//! before any stage runs.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── site/
//! │   └── site.yaml            # Site identity + language set
//! └── paintings/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```yaml
//! site:
//!   name: Lulu Tracy Art        # Site title, also the EXIF Software tag
//!   author: Lulu Tracy          # EXIF Artist and copyright holder
//!   email: hello@lulutracy.com  # Optional
//!   url: https://lulutracy.com  # Optional
//!
//! languages:
//!   supported: [en, zh, yue, ms]
//!   default: en                 # Pages for this language get no path prefix
//! ```
//!
//! The `languages` block is optional; leaving it out builds a single-language
//! site in `en`. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("YAML parse error in {0}: {1}")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything `site.yaml` holds: identity plus language set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteFile {
    /// Site identity (name, author, contact).
    pub site: SiteConfig,
    /// Published languages. Optional: defaults to English only.
    #[serde(default)]
    pub languages: Languages,
}

/// Site identity loaded from the `site:` block.
///
/// `name` and `author` feed the EXIF tags stamped into every rendered
/// image, so they must be non-empty. Contact fields are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title. Written as the EXIF `Software` tag and named in the
    /// copyright line.
    pub name: String,
    /// Artist name. Written as the EXIF `Artist` tag.
    pub author: String,
    /// Contact address, shown on the site only.
    #[serde(default)]
    pub email: String,
    /// Canonical site URL, shown on the site only.
    #[serde(default)]
    pub url: String,
}

/// The language set a site publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Languages {
    /// Every language pages are generated for, in publication order.
    pub supported: Vec<String>,
    /// The language served without a path prefix. Must be a member of
    /// `supported`.
    pub default: String,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            supported: vec!["en".to_string()],
            default: "en".to_string(),
        }
    }
}

impl Languages {
    /// Whether `language` is the default (unprefixed) one.
    pub fn is_default(&self, language: &str) -> bool {
        language == self.default
    }

    /// Whether pages are generated for `language` at all.
    pub fn is_supported(&self, language: &str) -> bool {
        self.supported.iter().any(|l| l == language)
    }
}

impl SiteFile {
    /// Validate config values before any pipeline stage consumes them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.site.author.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.author must not be empty".into(),
            ));
        }
        if self.languages.supported.is_empty() {
            return Err(ConfigError::Validation(
                "languages.supported must not be empty".into(),
            ));
        }
        for (i, lang) in self.languages.supported.iter().enumerate() {
            if lang.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "languages.supported must not contain empty tags".into(),
                ));
            }
            if self.languages.supported[..i].contains(lang) {
                return Err(ConfigError::Validation(format!(
                    "languages.supported lists \"{lang}\" twice"
                )));
            }
        }
        if !self.languages.is_supported(&self.languages.default) {
            return Err(ConfigError::Validation(format!(
                "languages.default \"{}\" is not in languages.supported",
                self.languages.default
            )));
        }
        Ok(())
    }
}

/// Path of the site config file under a content root.
pub fn site_file_path(content_root: &Path) -> PathBuf {
    content_root.join("site").join("site.yaml")
}

/// Load and validate `site.yaml` from the given content root.
///
/// Any failure here is build-fatal: no catalog is read and no files are
/// touched without a valid site config.
pub fn load_site(content_root: &Path) -> Result<SiteFile, ConfigError> {
    let path = site_file_path(content_root);
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
    let file: SiteFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml(path.clone(), e))?;
    file.validate()?;
    Ok(file)
}

/// Resolve the effective worker count for the injector.
///
/// `None` uses all available cores; `Some(n)` is clamped to the core count
/// (the user can constrain down, not up).
pub fn effective_threads(requested: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.map(|n| n.min(cores)).unwrap_or(cores)
}
