use tracing::warn;

use crate::{
    entities::dashboard::DashboardStats,
    errors::AppError,
    repositories::store::{ContentStore, Table},
};

pub struct DashboardHandler<S>
where
    S: ContentStore,
{
    pub store: S,
}

impl<S> DashboardHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        DashboardHandler { store }
    }

    /// Runs the five counts side by side. A count that fails shows as 0;
    /// the overview itself never fails.
    pub async fn stats(&self) -> DashboardStats {
        let (projects, contacts, testimonials, blog_posts, total_views) = futures::join!(
            self.store.count(Table::Projects),
            self.store.count(Table::ContactSubmissions),
            self.store.count(Table::Testimonials),
            self.store.count(Table::BlogPosts),
            self.store.count(Table::AnalyticsEvents),
        );

        DashboardStats {
            projects: or_zero(Table::Projects, projects),
            contacts: or_zero(Table::ContactSubmissions, contacts),
            testimonials: or_zero(Table::Testimonials, testimonials),
            blog_posts: or_zero(Table::BlogPosts, blog_posts),
            total_views: or_zero(Table::AnalyticsEvents, total_views),
        }
    }
}

fn or_zero(table: Table, result: Result<u64, AppError>) -> u64 {
    result.unwrap_or_else(|e| {
        warn!(%table, error = %e, "Dashboard count failed");
        0
    })
}
