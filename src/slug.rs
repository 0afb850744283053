// URL slug derivation for catalog entities.

use uuid::Uuid;

/// Maximum length of a derived slug. Supplied slugs are validated against the
/// column limit (160) at the database layer; derived ones are cut shorter.
pub const DERIVED_SLUG_MAX: usize = 150;

/// Lowercase the input and collapse every run of non-alphanumeric characters
/// into a single `-`, trimming separators from both ends.
pub fn slugify(source: &str) -> String {
    let mut slug = String::with_capacity(source.len());
    let mut pending_sep = false;
    for ch in source.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Derive a slug from `source`, or keep `existing` untouched when one is
/// already set. Slugs are immutable once stored: re-saving a row never
/// rewrites its slug.
///
/// When `source` slugifies to nothing, falls back to `prefix` plus a fresh
/// 8-character identifier so the row still gets a non-empty unique slug.
pub fn derive_slug(existing: &str, source: &str, prefix: &str) -> String {
    if !existing.is_empty() {
        return existing.to_string();
    }
    let mut slug = slugify(source);
    slug.truncate(DERIVED_SLUG_MAX);
    // truncation can leave a trailing separator behind
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        let tag = Uuid::new_v4().simple().to_string();
        slug = format!("{}-{}", prefix, &tag[..8]);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("Eastwood Estates"), "eastwood-estates");
        assert_eq!(slugify("  12 Eastwood Way, Attleboro MA 02703 "), "12-eastwood-way-attleboro-ma-02703");
        assert_eq!(slugify("--Harborview!!"), "harborview");
        assert_eq!(slugify("A  &  B"), "a-b");
    }

    #[test]
    fn slugify_is_deterministic() {
        assert_eq!(slugify("The Willows"), slugify("The Willows"));
    }

    #[test]
    fn existing_slug_is_never_rewritten() {
        assert_eq!(derive_slug("eastwood-estates", "Renamed Community", "community"), "eastwood-estates");
    }

    #[test]
    fn derived_slug_is_truncated() {
        let long = "x".repeat(400);
        let slug = derive_slug("", &long, "community");
        assert_eq!(slug.len(), DERIVED_SLUG_MAX);
    }

    #[test]
    fn empty_source_falls_back_to_placeholder() {
        let slug = derive_slug("", "", "home");
        assert!(slug.starts_with("home-"));
        assert_eq!(slug.len(), "home-".len() + 8);
    }

    #[test]
    fn punctuation_only_source_falls_back() {
        let slug = derive_slug("", "??!!", "plan");
        assert!(slug.starts_with("plan-"));
    }
}
