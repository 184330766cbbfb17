use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        locale::LocaleQuery,
        project::{NewProjectRequest, ProjectListQuery, UpdateProjectRequest},
        query::{AdminListQuery, DeleteQuery},
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ProjectListQuery>,
) -> Result<impl Responder, AppError> {
    let response = state.projects.list_public(&query).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn list_featured_projects(
    state: web::Data<AppState>,
    query: web::Query<LocaleQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.projects.list_featured(query.locale).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state))]
pub async fn get_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<LocaleQuery>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&project_id)?;
    let project = state.projects.get_public(id, query.locale).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn admin_list_projects(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state.projects.admin_list(query.refresh).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.projects.create(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&project_id)?;
    let project = state.projects.update(id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_project_featured(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&project_id)?;
    let project = state.projects.toggle_featured(id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&project_id)?;
    query.ensure_confirmed()?;
    state.projects.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
