//! URL predicates for resolution rules

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::{CatalogError, Result};

/// A pure test applied to a URL string
///
/// Predicates are data rather than closures so that plans and diagnostics
/// can say which rule produced a candidate.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Path ends with `.<ext>`, ignoring case, query and fragment.
    /// Holds the lowercased suffix including the dot.
    Extension(String),
    /// Regex matches anywhere in the URL
    UrlPattern(Regex),
    /// Matches every URL
    Any,
}

impl Predicate {
    /// Evaluate the predicate against a URL
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Predicate::Extension(suffix) => url_path(url).to_lowercase().ends_with(suffix.as_str()),
            Predicate::UrlPattern(regex) => regex.is_match(url),
            Predicate::Any => true,
        }
    }

    /// True for unconditional catch-alls
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Predicate::Any)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Extension(suffix) => write!(f, "extension {}", suffix),
            Predicate::UrlPattern(regex) => write!(f, "pattern /{}/", regex.as_str()),
            Predicate::Any => f.write_str("any"),
        }
    }
}

/// Match URLs whose path ends with `.ext`, case-insensitively
///
/// The query string and fragment are ignored, and the match is anchored at
/// the end of the path: `data.csv?x=1` matches `csv`, `data.csv.bak` does not.
pub fn matches_extension(ext: &str) -> Predicate {
    let ext = ext.trim_start_matches('.').to_lowercase();
    Predicate::Extension(format!(".{}", ext))
}

/// Match URLs containing `pattern` anywhere
///
/// Case-insensitive unless the pattern turns it off with an inline `(?-i)`.
pub fn matches_url_pattern(pattern: &str) -> Result<Predicate> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| CatalogError::InvalidRule {
            reason: format!("invalid URL pattern '{}': {}", pattern, e),
        })?;
    Ok(Predicate::UrlPattern(regex))
}

/// Match every URL. Register these last.
pub fn match_all() -> Predicate {
    Predicate::Any
}

/// The part of a URL before any `?` query or `#` fragment
fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
