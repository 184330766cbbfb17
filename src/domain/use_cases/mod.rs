pub mod analytics;
pub mod blog;
pub mod contact;
pub mod dashboard;
pub mod extractors;
pub mod projects;
pub mod testimonials;
