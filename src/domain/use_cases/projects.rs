use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    entities::{
        locale::Locale,
        project::{
            NewProjectRequest, Project, ProjectAdminView, ProjectCategory, ProjectInsert, ProjectListQuery,
            ProjectListResponse, ProjectView, UpdateProjectRequest,
        },
    },
    errors::AppError,
    infrastructure::cache::EntityCache,
    repositories::store::{
        fetch_all, fetch_by_id, insert_as, update_as, ContentStore, Record, SelectQuery, Table,
    },
};

pub struct ProjectHandler<S>
where
    S: ContentStore,
{
    pub store: S,
    cache: EntityCache<Project>,
}

impl<S> ProjectHandler<S>
where
    S: ContentStore,
{
    pub fn new(store: S) -> Self {
        ProjectHandler { store, cache: EntityCache::new("projects") }
    }

    /// Display order: `order_index` ascending, then insertion order.
    fn ordered() -> SelectQuery {
        SelectQuery::from(Table::Projects)
            .order_asc("order_index")
            .order_asc("created_at")
    }

    async fn load_all(&self) -> Result<Vec<Project>, AppError> {
        fetch_all(&self.store, &Self::ordered()).await
    }

    async fn require(&self, id: Uuid) -> Result<Project, AppError> {
        fetch_by_id(&self.store, Table::Projects, id)
            .await?
            .ok_or_else(|| AppError::Store(format!("no project with id {}", id)))
    }

    /// Portfolio section of the home page.
    pub async fn list_featured(&self, locale: Locale) -> Result<Vec<ProjectView>, AppError> {
        let query = Self::ordered().eq("featured", true);
        let projects: Vec<Project> = fetch_all(&self.store, &query).await?;
        Ok(projects.iter().map(|p| p.to_view(locale)).collect())
    }

    /// Projects page: every project plus the categories present, optionally
    /// narrowed to one category.
    pub async fn list_public(&self, query: &ProjectListQuery) -> Result<ProjectListResponse, AppError> {
        let projects = self.load_all().await?;

        let mut categories: Vec<ProjectCategory> = Vec::new();
        for project in &projects {
            if !categories.contains(&project.category) {
                categories.push(project.category);
            }
        }

        let projects = projects
            .iter()
            .filter(|p| query.category.is_none_or(|c| p.category == c))
            .map(|p| p.to_view(query.locale))
            .collect();

        Ok(ProjectListResponse { categories, projects })
    }

    pub async fn get_public(&self, id: Uuid, locale: Locale) -> Result<ProjectView, AppError> {
        let project: Option<Project> = fetch_by_id(&self.store, Table::Projects, id).await?;
        project
            .map(|p| p.to_view(locale))
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    pub async fn admin_list(&self, refresh: bool) -> Result<Vec<ProjectAdminView>, AppError> {
        let projects = self.cache.list_or_load(refresh, || self.load_all()).await?;
        Ok(projects.into_iter().map(Project::to_admin_view).collect())
    }

    pub async fn create(&self, request: NewProjectRequest) -> Result<ProjectAdminView, AppError> {
        let insert = ProjectInsert::try_from(request)?;
        let project: Project = insert_as(&self.store, Table::Projects, &insert).await?;

        info!(project_id = %project.id, "Project created");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(project.to_admin_view())
    }

    pub async fn update(&self, id: Uuid, request: UpdateProjectRequest) -> Result<ProjectAdminView, AppError> {
        let changes = request.into_changes()?;
        let project: Project = update_as(&self.store, Table::Projects, id, changes).await?;

        self.cache.refresh_with(|| self.load_all()).await;
        Ok(project.to_admin_view())
    }

    pub async fn toggle_featured(&self, id: Uuid) -> Result<ProjectAdminView, AppError> {
        let current = self.require(id).await?;

        let mut changes = Record::new();
        changes.insert("featured".into(), json!(!current.featured));
        changes.insert("updated_at".into(), json!(Utc::now()));
        let project: Project = update_as(&self.store, Table::Projects, id, changes).await?;

        info!(project_id = %id, featured = project.featured, "Project featured flag toggled");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(project.to_admin_view())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(Table::Projects, id).await?;

        info!(project_id = %id, "Project deleted");
        self.cache.refresh_with(|| self.load_all()).await;
        Ok(())
    }
}
