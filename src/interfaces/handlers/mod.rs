pub mod analytics;
pub mod blog_posts;
pub mod contact;
pub mod dashboard;
pub mod home;
pub mod projects;
pub mod system;
pub mod testimonials;
