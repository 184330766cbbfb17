pub mod analytics_event;
pub mod blog_post;
pub mod contact_submission;
pub mod dashboard;
pub mod locale;
pub mod option_fields;
pub mod project;
pub mod query;
pub mod testimonial;
pub mod token;
pub mod validation;
