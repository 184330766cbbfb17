use std::borrow::Cow;

use validator::ValidationError;

use crate::entities::option_fields::OptionField;

pub const MAX_TITLE_LENGTH: u64 = 200;
pub const MAX_SLUG_LENGTH: u64 = 120;
pub const MAX_EXCERPT_LENGTH: u64 = 500;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 40;

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_url(url)?;
    }
    Ok(())
}

/// Slugs are URL path segments: lowercase ASCII letters, digits and single
/// inner hyphens.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Ok(());
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

pub fn validate_optional_slug(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(slug) = value {
        validate_slug(slug.trim())?;
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    if tags.iter().any(|tag| tag.chars().count() > MAX_TAG_LENGTH) {
        return Err(new_validation_error("invalid_tag_length", "Tag is too long"));
    }
    Ok(())
}

pub fn validate_rating(rating: i16) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(new_validation_error("rating_range", "Rating must be between 1 and 5"))
    }
}

pub fn validate_optional_rating(value: &OptionField<i16>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(rating) => validate_rating(*rating),
        OptionField::SetToNull => Err(new_validation_error("rating_null", "Rating cannot be null")),
        OptionField::Unchanged => Ok(()),
    }
}

pub fn validate_optional_reading_time(value: &OptionField<i32>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(minutes) if *minutes >= 1 => Ok(()),
        OptionField::Unchanged => Ok(()),
        _ => Err(new_validation_error("reading_time_positive", "Reading time must be a positive number of minutes")),
    }
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
