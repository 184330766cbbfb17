use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    entities::{
        locale::{Locale, TextDirection},
        option_fields::{OptionField, PatchString},
        validation::{validate_optional_url_field, validate_tags, validate_url, MAX_TITLE_LENGTH},
    },
    errors::AppError,
    infrastructure::cache::Identified,
    lifecycle::{join_tags, TagInput},
    repositories::store::Record,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Research,
    Translation,
    Transcription,
    Cv,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Research => "research",
            ProjectCategory::Translation => "translation",
            ProjectCategory::Transcription => "transcription",
            ProjectCategory::Cv => "cv",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "research" => Ok(ProjectCategory::Research),
            "translation" => Ok(ProjectCategory::Translation),
            "transcription" => Ok(ProjectCategory::Transcription),
            "cv" => Ok(ProjectCategory::Cv),
            other => Err(format!("unknown project category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title_en: String,
    pub title_ar: String,
    pub description_en: String,
    pub description_ar: String,
    pub category: ProjectCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectInsert {
    pub id: Uuid,
    pub title_en: String,
    pub title_ar: String,
    pub description_en: String,
    pub description_ar: String,
    pub category: ProjectCategory,
    pub tags: Vec<String>,
    pub featured: bool,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_en: String,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_ar: String,

    #[serde(default)]
    pub description_en: String,

    #[serde(default)]
    pub description_ar: String,

    pub category: ProjectCategory,

    #[serde(default)]
    pub tags: TagInput,

    #[serde(default)]
    pub featured: bool,

    #[validate(custom(function = "validate_url"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_en: PatchString,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title_ar: PatchString,

    pub description_en: PatchString,
    pub description_ar: PatchString,
    pub category: OptionField<ProjectCategory>,
    pub tags: OptionField<TagInput>,
    pub featured: OptionField<bool>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub image_url: PatchString,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub github_url: PatchString,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub live_url: PatchString,

    pub order_index: OptionField<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    #[serde(default)]
    pub locale: Locale,
    pub category: Option<ProjectCategory>,
}

/// Project as shown on the public pages in one language.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    pub tags: Vec<String>,
    pub featured: bool,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub order_index: i32,
    pub dir: TextDirection,
}

#[derive(Debug, Serialize)]
pub struct ProjectAdminView {
    #[serde(flatten)]
    pub project: Project,
    pub tags_text: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub categories: Vec<ProjectCategory>,
    pub projects: Vec<ProjectView>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewProjectRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        let tags = value.tags.into_tags();
        if let Err(e) = validate_tags(&tags) {
            let mut errors = ValidationErrors::new();
            errors.add("tags", e);
            return Err(errors);
        }

        let now = Utc::now();
        Ok(ProjectInsert {
            id: Uuid::new_v4(),
            title_en: value.title_en,
            title_ar: value.title_ar,
            description_en: value.description_en,
            description_ar: value.description_ar,
            category: value.category,
            tags,
            featured: value.featured,
            image_url: value.image_url,
            github_url: value.github_url,
            live_url: value.live_url,
            order_index: value.order_index,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateProjectRequest {
    /// Validates the patch and turns it into the column changes to write.
    pub fn into_changes(self) -> Result<Record, AppError> {
        self.validate()?;

        let tags = self.tags.map_value(TagInput::into_tags);
        if let Some(tags) = tags.value_ref() {
            validate_tags(tags).map_err(|_| AppError::field("tags", "Too many or too long tags"))?;
        }

        let mut changes = Record::new();
        let encode = |e: serde_json::Error| AppError::InternalError(format!("encoding project changes: {}", e));
        self.title_en.write_required("title_en", &mut changes)?;
        self.title_ar.write_required("title_ar", &mut changes)?;
        self.description_en.write_required("description_en", &mut changes)?;
        self.description_ar.write_required("description_ar", &mut changes)?;
        self.category.write_required("category", &mut changes)?;
        tags.write_required("tags", &mut changes)?;
        self.featured.write_required("featured", &mut changes)?;
        self.image_url.write_to("image_url", &mut changes).map_err(encode)?;
        self.github_url.write_to("github_url", &mut changes).map_err(encode)?;
        self.live_url.write_to("live_url", &mut changes).map_err(encode)?;
        self.order_index.write_required("order_index", &mut changes)?;

        if changes.is_empty() {
            return Err(AppError::field("body", "No fields to update"));
        }
        changes.insert("updated_at".into(), serde_json::json!(Utc::now()));
        Ok(changes)
    }
}

impl Project {
    pub fn to_view(&self, locale: Locale) -> ProjectView {
        ProjectView {
            id: self.id,
            title: locale.pick(&self.title_en, &self.title_ar).to_string(),
            description: locale.pick(&self.description_en, &self.description_ar).to_string(),
            category: self.category,
            tags: self.tags.clone(),
            featured: self.featured,
            image_url: self.image_url.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            order_index: self.order_index,
            dir: locale.dir(),
        }
    }

    pub fn to_admin_view(self) -> ProjectAdminView {
        let tags_text = join_tags(&self.tags);
        ProjectAdminView { project: self, tags_text }
    }
}
