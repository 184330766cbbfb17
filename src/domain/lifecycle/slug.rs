use once_cell::sync::Lazy;
use regex::Regex;

use crate::{entities::option_fields::OptionField, lifecycle::LifecycleError};

static NON_ALPHANUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is a valid regex"));

/// Lowercases the title, collapses every run of characters outside
/// `[a-z0-9]` into one hyphen and strips hyphens from both ends.
///
/// Non-ASCII letters are not transliterated: "Café" becomes "caf".
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_ALPHANUMERIC_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Picks the slug for a new post: an explicit non-blank slug wins, otherwise
/// it is derived from the English title.
pub fn resolve_slug(explicit: Option<&str>, title_en: &str) -> Result<String, LifecycleError> {
    match explicit.map(str::trim) {
        Some(slug) if !slug.is_empty() => Ok(slug.to_string()),
        _ => {
            let derived = derive_slug(title_en);
            if derived.is_empty() {
                Err(LifecycleError::EmptySlug(title_en.to_string()))
            } else {
                Ok(derived)
            }
        }
    }
}

/// Picks the slug for an edit. `Ok(None)` leaves the stored slug alone.
pub fn resolve_slug_for_update(
    slug_field: &OptionField<String>,
    title_field: &OptionField<String>,
) -> Result<Option<String>, LifecycleError> {
    match slug_field {
        OptionField::SetToValue(slug) if !slug.trim().is_empty() => Ok(Some(slug.trim().to_string())),
        _ => match title_field {
            OptionField::SetToValue(title) => resolve_slug(None, title).map(Some),
            _ => Ok(None),
        },
    }
}
