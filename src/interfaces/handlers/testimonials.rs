use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        locale::LocaleQuery,
        query::{AdminListQuery, DeleteQuery},
        testimonial::{NewTestimonialRequest, UpdateTestimonialRequest},
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_carousel(
    state: web::Data<AppState>,
    query: web::Query<LocaleQuery>,
) -> Result<impl Responder, AppError> {
    let testimonials = state.testimonials.carousel(query.locale).await?;
    Ok(HttpResponse::Ok().json(testimonials))
}

#[instrument(skip(_claims, state))]
pub async fn admin_list_testimonials(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> Result<impl Responder, AppError> {
    let testimonials = state.testimonials.admin_list(query.refresh).await?;
    Ok(HttpResponse::Ok().json(testimonials))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_testimonial(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewTestimonialRequest>,
) -> Result<impl Responder, AppError> {
    let testimonial = state.testimonials.create(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(testimonial))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_testimonial(
    _claims: AdminClaims,
    testimonial_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateTestimonialRequest>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&testimonial_id)?;
    let testimonial = state.testimonials.update(id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(testimonial))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_testimonial_approved(
    _claims: AdminClaims,
    testimonial_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&testimonial_id)?;
    let testimonial = state.testimonials.toggle_approved(id).await?;
    Ok(HttpResponse::Ok().json(testimonial))
}

#[instrument(skip(_claims, state))]
pub async fn toggle_testimonial_featured(
    _claims: AdminClaims,
    testimonial_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&testimonial_id)?;
    let testimonial = state.testimonials.toggle_featured(id).await?;
    Ok(HttpResponse::Ok().json(testimonial))
}

#[instrument(skip(_claims, state))]
pub async fn delete_testimonial(
    _claims: AdminClaims,
    testimonial_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&testimonial_id)?;
    query.ensure_confirmed()?;
    state.testimonials.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
