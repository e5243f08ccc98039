//! Slug normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid slug pattern"));
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("valid slug pattern"));

/// Convert a string into a URL-friendly slug.
///
/// `"Hello World!"` becomes `"hello-world"`. The result may be empty when the
/// input has no letters or digits.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = SEPARATORS.replace_all(&cleaned, "-");
    hyphenated.trim_matches('-').to_string()
}
