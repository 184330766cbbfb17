use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    entities::{
        locale::Locale,
        testimonial::{
            NewTestimonialRequest, Testimonial, TestimonialAdminView, TestimonialInsert,
            TestimonialView, UpdateTestimonialRequest, CAROUSEL_SIZE,
        },
    },
    errors::AppError,
    infrastructure::cache::EntityCache,
    repositories::store::{
        fetch_all, fetch_by_id, insert_as, update_as, ContentStore, Record, SelectQuery, Table,
    },
};

pub struct TestimonialHandler<S>
where
    S: ContentStore,
{
    pub store: S,
    cache: EntityCache<Testimonial>,
}

impl<S> TestimonialHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        TestimonialHandler { store, cache: EntityCache::new("testimonials") }
    }

    async fn load_all(&self) -> Result<Vec<Testimonial>, AppError> {
        let query = SelectQuery::from(Table::Testimonials).order_desc("created_at");
        fetch_all(&self.store, &query).await
    }

    async fn require(&self, id: Uuid) -> Result<Testimonial, AppError> {
        fetch_by_id(&self.store, Table::Testimonials, id)
            .await?
            .ok_or_else(|| AppError::Store(format!("no testimonial with id {}", id)))
    }

    /// Home page carousel: approved and featured only, newest first.
    pub async fn carousel(&self, locale: Locale) -> Result<Vec<TestimonialView>, AppError> {
        let query = SelectQuery::from(Table::Testimonials)
            .eq("approved", true)
            .eq("featured", true)
            .order_desc("created_at")
            .limit(CAROUSEL_SIZE);
        let testimonials: Vec<Testimonial> = fetch_all(&self.store, &query).await?;

        Ok(testimonials
            .iter()
            .filter(|t| t.moderation().is_public())
            .map(|t| t.to_view(locale))
            .collect())
    }

    pub async fn admin_list(&self, refresh: bool) -> Result<Vec<TestimonialAdminView>, AppError> {
        let testimonials = self.cache.list_or_load(refresh, || self.load_all()).await?;
        Ok(testimonials.into_iter().map(Testimonial::to_admin_view).collect())
    }

    pub async fn create(&self, request: NewTestimonialRequest) -> Result<TestimonialAdminView, AppError> {
        let insert = TestimonialInsert::try_from(request)?;
        let testimonial: Testimonial = insert_as(&self.store, Table::Testimonials, &insert).await?;

        info!(testimonial_id = %testimonial.id, moderation = ?testimonial.moderation(), "Testimonial created");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(testimonial.to_admin_view())
    }

    pub async fn update(&self, id: Uuid, request: UpdateTestimonialRequest) -> Result<TestimonialAdminView, AppError> {
        let changes = request.into_changes()?;
        let testimonial: Testimonial = update_as(&self.store, Table::Testimonials, id, changes).await?;

        self.cache.refresh_with(|| self.load_all()).await;
        Ok(testimonial.to_admin_view())
    }

    pub async fn toggle_approved(&self, id: Uuid) -> Result<TestimonialAdminView, AppError> {
        let current = self.require(id).await?;
        self.flip(id, "approved", !current.approved).await
    }

    pub async fn toggle_featured(&self, id: Uuid) -> Result<TestimonialAdminView, AppError> {
        let current = self.require(id).await?;
        self.flip(id, "featured", !current.featured).await
    }

    async fn flip(&self, id: Uuid, column: &'static str, value: bool) -> Result<TestimonialAdminView, AppError> {
        let mut changes = Record::new();
        changes.insert(column.into(), json!(value));
        let testimonial: Testimonial = update_as(&self.store, Table::Testimonials, id, changes).await?;

        info!(testimonial_id = %id, column, value, moderation = ?testimonial.moderation(), "Testimonial flag toggled");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(testimonial.to_admin_view())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(Table::Testimonials, id).await?;

        info!(testimonial_id = %id, "Testimonial deleted");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(())
    }
}
