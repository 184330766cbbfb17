use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        blog_post::{NewBlogPostRequest, UpdateBlogPostRequest},
        locale::LocaleQuery,
        query::{AdminListQuery, DeleteQuery},
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_published_posts(
    state: web::Data<AppState>,
    query: web::Query<LocaleQuery>,
) -> Result<impl Responder, AppError> {
    let posts = state.blog.list_published(query.locale).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(state))]
pub async fn get_post_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<LocaleQuery>,
) -> Result<impl Responder, AppError> {
    let post = state.blog.get_published_by_slug(&slug, query.locale).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn admin_list_posts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> Result<impl Responder, AppError> {
    let posts = state.blog.admin_list(query.refresh).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state.blog.create(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&post_id)?;
    let post = state.blog.update(id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn publish_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&post_id)?;
    let post = state.blog.publish(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn unpublish_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&post_id)?;
    let post = state.blog.unpublish(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_post_published(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&post_id)?;
    let post = state.blog.toggle_published(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn delete_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&post_id)?;
    query.ensure_confirmed()?;
    state.blog.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
