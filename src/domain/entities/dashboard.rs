use serde::Serialize;

/// Row counts shown on the admin overview. A count that failed to load
/// is reported as 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub projects: u64,
    pub contacts: u64,
    pub testimonials: u64,
    pub blog_posts: u64,
    pub total_views: u64,
}
