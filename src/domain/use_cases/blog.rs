use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    entities::{
        blog_post::{
            write_publication, BlogPost, BlogPostAdminView, BlogPostDetail, BlogPostInsert,
            BlogPostSummary, NewBlogPostRequest, UpdateBlogPostRequest,
        },
        locale::Locale,
    },
    errors::AppError,
    infrastructure::cache::EntityCache,
    lifecycle::Publication,
    repositories::store::{
        fetch_all, fetch_by_id, fetch_one, insert_as, update_as, ContentStore, Record, SelectQuery, Table,
    },
};

pub struct BlogPostHandler<S>
where
    S: ContentStore,
{
    pub store: S,
    cache: EntityCache<BlogPost>,
}

impl<S> BlogPostHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        BlogPostHandler { store, cache: EntityCache::new("blog_posts") }
    }

    async fn load_all(&self) -> Result<Vec<BlogPost>, AppError> {
        let query = SelectQuery::from(Table::BlogPosts).order_desc("created_at");
        fetch_all(&self.store, &query).await
    }

    async fn require(&self, id: Uuid) -> Result<BlogPost, AppError> {
        fetch_by_id(&self.store, Table::BlogPosts, id)
            .await?
            .ok_or_else(|| AppError::Store(format!("no blog post with id {}", id)))
    }

    /// Published posts, newest publication first.
    pub async fn list_published(&self, locale: Locale) -> Result<Vec<BlogPostSummary>, AppError> {
        let query = SelectQuery::from(Table::BlogPosts)
            .eq("published", true)
            .order_desc("published_at");
        let posts: Vec<BlogPost> = fetch_all(&self.store, &query).await?;
        Ok(posts.iter().map(|p| p.to_summary(locale)).collect())
    }

    /// Reads a published post and counts the view. The counter is bumped
    /// with a plain read-then-write; losing that write only costs a view.
    pub async fn get_published_by_slug(&self, slug: &str, locale: Locale) -> Result<BlogPostDetail, AppError> {
        let query = SelectQuery::from(Table::BlogPosts)
            .eq("slug", slug.trim())
            .eq("published", true);
        let post: BlogPost = fetch_one(&self.store, query)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

        let mut changes = Record::new();
        changes.insert("views".into(), json!(post.views + 1));
        if let Err(e) = self.store.update(Table::BlogPosts, post.id, changes).await {
            warn!(post_id = %post.id, error = %e, "Failed to increment blog post views");
        }

        Ok(post.to_detail(locale))
    }

    pub async fn admin_list(&self, refresh: bool) -> Result<Vec<BlogPostAdminView>, AppError> {
        let posts = self.cache.list_or_load(refresh, || self.load_all()).await?;
        Ok(posts.into_iter().map(BlogPost::to_admin_view).collect())
    }

    pub async fn create(&self, request: NewBlogPostRequest) -> Result<BlogPostAdminView, AppError> {
        let insert = BlogPostInsert::try_from(request)?;
        let post: BlogPost = insert_as(&self.store, Table::BlogPosts, &insert).await?;

        info!(post_id = %post.id, slug = %post.slug, published = post.published, "Blog post created");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(post.to_admin_view())
    }

    pub async fn update(&self, id: Uuid, request: UpdateBlogPostRequest) -> Result<BlogPostAdminView, AppError> {
        let current = self.require(id).await?;
        let changes = request.into_changes(&current, Utc::now())?;
        let post: BlogPost = update_as(&self.store, Table::BlogPosts, id, changes).await?;

        self.cache.refresh_with(|| self.load_all()).await;
        Ok(post.to_admin_view())
    }

    pub async fn publish(&self, id: Uuid) -> Result<BlogPostAdminView, AppError> {
        self.transition(id, |p, now| p.publish(now)).await
    }

    pub async fn unpublish(&self, id: Uuid) -> Result<BlogPostAdminView, AppError> {
        self.transition(id, |p, _| p.unpublish()).await
    }

    pub async fn toggle_published(&self, id: Uuid) -> Result<BlogPostAdminView, AppError> {
        self.transition(id, |p, now| p.toggle(now)).await
    }

    /// Applies a publish-state change. When the state does not move nothing
    /// is written.
    async fn transition<F>(&self, id: Uuid, next: F) -> Result<BlogPostAdminView, AppError>
    where
        F: FnOnce(Publication, chrono::DateTime<Utc>) -> Publication,
    {
        let current = self.require(id).await?;
        let now = Utc::now();
        let before = current.publication();
        let after = next(before, now);

        if after == before {
            return Ok(current.to_admin_view());
        }

        let mut changes = Record::new();
        write_publication(&after, &mut changes);
        changes.insert("updated_at".into(), json!(now));
        let post: BlogPost = update_as(&self.store, Table::BlogPosts, id, changes).await?;

        info!(post_id = %id, published = post.published, published_at = ?post.published_at, "Blog post publication changed");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(post.to_admin_view())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(Table::BlogPosts, id).await?;

        info!(post_id = %id, "Blog post deleted");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(())
    }
}
