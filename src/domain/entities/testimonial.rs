use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        locale::{Locale, TextDirection},
        option_fields::{OptionField, PatchString},
        validation::{validate_optional_rating, validate_optional_url_field, validate_rating, validate_url},
    },
    errors::AppError,
    infrastructure::cache::Identified,
    lifecycle::Moderation,
    repositories::store::Record,
};

/// How many testimonials the public carousel shows.
pub const CAROUSEL_SIZE: u32 = 6;

fn default_approved() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub client_name: String,
    #[serde(default)]
    pub client_title: Option<String>,
    #[serde(default)]
    pub client_company: Option<String>,
    #[serde(default)]
    pub client_avatar: Option<String>,
    pub testimonial_en: String,
    pub testimonial_ar: String,
    pub rating: i16,
    pub approved: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Identified for Testimonial {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Serialize)]
pub struct TestimonialInsert {
    pub id: Uuid,
    pub client_name: String,
    pub client_title: Option<String>,
    pub client_company: Option<String>,
    pub client_avatar: Option<String>,
    pub testimonial_en: String,
    pub testimonial_ar: String,
    pub rating: i16,
    pub approved: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTestimonialRequest {
    #[validate(length(min = 1, max = 120))]
    pub client_name: String,

    #[validate(length(max = 120))]
    pub client_title: Option<String>,

    #[validate(length(max = 120))]
    pub client_company: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub client_avatar: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub testimonial_en: String,

    #[validate(length(min = 1, max = 2000))]
    pub testimonial_ar: String,

    #[validate(custom(function = "validate_rating"))]
    pub rating: i16,

    #[serde(default = "default_approved")]
    pub approved: bool,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateTestimonialRequest {
    #[validate(length(min = 1, max = 120))]
    pub client_name: PatchString,

    #[validate(length(max = 120))]
    pub client_title: PatchString,

    #[validate(length(max = 120))]
    pub client_company: PatchString,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub client_avatar: PatchString,

    #[validate(length(min = 1, max = 2000))]
    pub testimonial_en: PatchString,

    #[validate(length(min = 1, max = 2000))]
    pub testimonial_ar: PatchString,

    #[validate(custom(function = "validate_optional_rating"))]
    pub rating: OptionField<i16>,

    pub approved: OptionField<bool>,
    pub featured: OptionField<bool>,
}

#[derive(Debug, Serialize)]
pub struct TestimonialView {
    pub id: Uuid,
    pub client_name: String,
    pub client_title: Option<String>,
    pub client_company: Option<String>,
    pub client_avatar: Option<String>,
    pub text: String,
    pub rating: i16,
    pub dir: TextDirection,
}

#[derive(Debug, Serialize)]
pub struct TestimonialAdminView {
    #[serde(flatten)]
    pub testimonial: Testimonial,
    pub moderation: Moderation,
}

impl TryFrom<NewTestimonialRequest> for TestimonialInsert {
    type Error = AppError;

    fn try_from(value: NewTestimonialRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(TestimonialInsert {
            id: Uuid::new_v4(),
            client_name: value.client_name,
            client_title: value.client_title,
            client_company: value.client_company,
            client_avatar: value.client_avatar,
            testimonial_en: value.testimonial_en,
            testimonial_ar: value.testimonial_ar,
            rating: value.rating,
            approved: value.approved,
            featured: value.featured,
            created_at: Utc::now(),
        })
    }
}

impl UpdateTestimonialRequest {
    pub fn into_changes(self) -> Result<Record, AppError> {
        self.validate()?;

        let mut changes = Record::new();
        let encode = |e: serde_json::Error| AppError::InternalError(format!("encoding testimonial changes: {}", e));
        self.client_name.write_required("client_name", &mut changes)?;
        self.client_title.write_to("client_title", &mut changes).map_err(encode)?;
        self.client_company.write_to("client_company", &mut changes).map_err(encode)?;
        self.client_avatar.write_to("client_avatar", &mut changes).map_err(encode)?;
        self.testimonial_en.write_required("testimonial_en", &mut changes)?;
        self.testimonial_ar.write_required("testimonial_ar", &mut changes)?;
        self.rating.write_required("rating", &mut changes)?;
        self.approved.write_required("approved", &mut changes)?;
        self.featured.write_required("featured", &mut changes)?;

        if changes.is_empty() {
            return Err(AppError::field("body", "No fields to update"));
        }
        Ok(changes)
    }
}

impl Testimonial {
    pub fn moderation(&self) -> Moderation {
        Moderation::from_flags(self.approved, self.featured)
    }

    pub fn to_view(&self, locale: Locale) -> TestimonialView {
        TestimonialView {
            id: self.id,
            client_name: self.client_name.clone(),
            client_title: self.client_title.clone(),
            client_company: self.client_company.clone(),
            client_avatar: self.client_avatar.clone(),
            text: locale.pick(&self.testimonial_en, &self.testimonial_ar).to_string(),
            rating: self.rating,
            dir: locale.dir(),
        }
    }

    pub fn to_admin_view(self) -> TestimonialAdminView {
        let moderation = self.moderation();
        TestimonialAdminView { testimonial: self, moderation }
    }
}
