use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    entities::{
        locale::{Locale, TextDirection},
        option_fields::{OptionField, PatchString},
        validation::{
            validate_optional_reading_time, validate_optional_slug,
            validate_optional_url_field, validate_slug, validate_tags, validate_url,
            MAX_EXCERPT_LENGTH, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH,
        },
    },
    errors::AppError,
    infrastructure::cache::Identified,
    lifecycle::{join_tags, resolve_slug, resolve_slug_for_update, Publication, TagInput},
    repositories::store::Record,
    utils::markdown::safe_markdown_to_html,
};

pub const DEFAULT_READING_TIME: i32 = 5;

fn default_reading_time() -> i32 {
    DEFAULT_READING_TIME
}

// ───── Stored Model ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title_en: String,
    pub title_ar: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt_en: String,
    #[serde(default)]
    pub excerpt_ar: String,
    #[serde(default)]
    pub content_en: String,
    #[serde(default)]
    pub content_ar: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: i64,
    #[serde(default = "default_reading_time")]
    pub reading_time: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for BlogPost {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct BlogPostInsert {
    pub id: Uuid,
    pub title_en: String,
    pub title_ar: String,
    pub slug: String,
    pub excerpt_en: String,
    pub excerpt_ar: String,
    pub content_en: String,
    pub content_ar: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub views: i64,
    pub reading_time: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewBlogPostRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_en: String,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_ar: String,

    #[validate(length(max = MAX_SLUG_LENGTH), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt_en: String,

    #[serde(default)]
    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt_ar: String,

    #[serde(default)]
    pub content_en: String,

    #[serde(default)]
    pub content_ar: String,

    #[validate(custom(function = "validate_url"))]
    pub cover_image: Option<String>,

    #[serde(default)]
    pub tags: TagInput,

    #[serde(default = "default_reading_time")]
    #[validate(range(min = 1, message = "Reading time must be a positive number of minutes"))]
    pub reading_time: i32,

    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateBlogPostRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_en: PatchString,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_ar: PatchString,

    #[validate(length(max = MAX_SLUG_LENGTH), custom(function = "validate_optional_slug"))]
    pub slug: PatchString,

    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt_en: PatchString,

    #[validate(length(max = MAX_EXCERPT_LENGTH))]
    pub excerpt_ar: PatchString,

    pub content_en: PatchString,
    pub content_ar: PatchString,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub cover_image: PatchString,

    pub tags: OptionField<TagInput>,

    #[validate(custom(function = "validate_optional_reading_time"))]
    pub reading_time: OptionField<i32>,

    pub published: OptionField<bool>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BlogPostSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub views: i64,
    pub reading_time: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub dir: TextDirection,
}

#[derive(Debug, Serialize)]
pub struct BlogPostDetail {
    pub id: Uuid,
    pub slug: String,
    pub locale: Locale,
    pub dir: TextDirection,
    pub title: String,
    pub excerpt: String,
    pub content_html: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub views: i64,
    pub reading_time: i32,
    pub published_at: Option<DateTime<Utc>>,
}

/// Admin listing row: the stored post plus its folded publish state and
/// the tags as the edit form shows them.
#[derive(Debug, Serialize)]
pub struct BlogPostAdminView {
    #[serde(flatten)]
    pub post: BlogPost,
    pub publication: Publication,
    pub tags_text: String,
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewBlogPostRequest> for BlogPostInsert {
    type Error = AppError;

    fn try_from(value: NewBlogPostRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        let slug = resolve_slug(value.slug.as_deref(), &value.title_en)?;

        let tags = value.tags.into_tags();
        if let Err(e) = validate_tags(&tags) {
            let mut errors = ValidationErrors::new();
            errors.add("tags", e);
            return Err(errors.into());
        }

        let now = Utc::now();
        let (published, published_at) = Publication::default().set(value.published, now).columns();

        Ok(BlogPostInsert {
            id: Uuid::new_v4(),
            title_en: value.title_en,
            title_ar: value.title_ar,
            slug,
            excerpt_en: value.excerpt_en,
            excerpt_ar: value.excerpt_ar,
            content_en: value.content_en,
            content_ar: value.content_ar,
            cover_image: value.cover_image,
            published,
            published_at,
            views: 0,
            reading_time: value.reading_time,
            tags,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateBlogPostRequest {
    /// Column changes for an edit of `current`. The slug is re-derived when
    /// the English title changes without an explicit slug, and the publish
    /// flag goes through the same rule as the publish toggle.
    pub fn into_changes(self, current: &BlogPost, now: DateTime<Utc>) -> Result<Record, AppError> {
        self.validate()?;

        let tags = self.tags.map_value(TagInput::into_tags);
        if let Some(tags) = tags.value_ref() {
            validate_tags(tags).map_err(|_| AppError::field("tags", "Too many or too long tags"))?;
        }

        let mut changes = Record::new();
        let encode = |e: serde_json::Error| AppError::InternalError(format!("encoding post changes: {}", e));

        if let Some(slug) = resolve_slug_for_update(&self.slug, &self.title_en)? {
            changes.insert("slug".into(), serde_json::Value::String(slug));
        }

        self.title_en.write_required("title_en", &mut changes)?;
        self.title_ar.write_required("title_ar", &mut changes)?;
        self.excerpt_en.write_required("excerpt_en", &mut changes)?;
        self.excerpt_ar.write_required("excerpt_ar", &mut changes)?;
        self.content_en.write_required("content_en", &mut changes)?;
        self.content_ar.write_required("content_ar", &mut changes)?;
        self.cover_image.write_to("cover_image", &mut changes).map_err(encode)?;
        tags.write_required("tags", &mut changes)?;
        self.reading_time.write_required("reading_time", &mut changes)?;

        match self.published {
            OptionField::SetToValue(published) => {
                let next = current.publication().set(published, now);
                if next != current.publication() {
                    write_publication(&next, &mut changes);
                }
            }
            OptionField::SetToNull => {
                return Err(AppError::field("published", "Published flag cannot be null"));
            }
            OptionField::Unchanged => {}
        }

        if changes.is_empty() {
            return Err(AppError::field("body", "No fields to update"));
        }
        changes.insert("updated_at".into(), serde_json::json!(now));
        Ok(changes)
    }
}

/// Writes the `(published, published_at)` pair for a publish state.
pub fn write_publication(publication: &Publication, changes: &mut Record) {
    let (published, published_at) = publication.columns();
    changes.insert("published".into(), serde_json::Value::Bool(published));
    changes.insert("published_at".into(), serde_json::json!(published_at));
}

impl BlogPost {
    pub fn publication(&self) -> Publication {
        Publication::from_columns(self.published, self.published_at, self.created_at)
    }

    pub fn to_summary(&self, locale: Locale) -> BlogPostSummary {
        BlogPostSummary {
            id: self.id,
            slug: self.slug.clone(),
            title: locale.pick(&self.title_en, &self.title_ar).to_string(),
            excerpt: locale.pick(&self.excerpt_en, &self.excerpt_ar).to_string(),
            cover_image: self.cover_image.clone(),
            tags: self.tags.clone(),
            views: self.views,
            reading_time: self.reading_time,
            published_at: self.published_at,
            dir: locale.dir(),
        }
    }

    pub fn to_detail(&self, locale: Locale) -> BlogPostDetail {
        BlogPostDetail {
            id: self.id,
            slug: self.slug.clone(),
            locale,
            dir: locale.dir(),
            title: locale.pick(&self.title_en, &self.title_ar).to_string(),
            excerpt: locale.pick(&self.excerpt_en, &self.excerpt_ar).to_string(),
            content_html: safe_markdown_to_html(locale.pick(&self.content_en, &self.content_ar)),
            cover_image: self.cover_image.clone(),
            tags: self.tags.clone(),
            views: self.views,
            reading_time: self.reading_time,
            published_at: self.published_at,
        }
    }

    pub fn to_admin_view(self) -> BlogPostAdminView {
        let publication = self.publication();
        let tags_text = join_tags(&self.tags);
        BlogPostAdminView { post: self, publication, tags_text }
    }
}
