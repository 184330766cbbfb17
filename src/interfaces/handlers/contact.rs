use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::{
        contact_submission::{ContactListQuery, NewContactSubmission, NotesUpdateRequest, StatusChangeRequest},
        query::DeleteQuery,
    },
    errors::AppError,
    limiter::RateDecision,
    use_cases::extractors::AdminClaims,
    utils::{get_client_ip::get_client_ip, valid_uuid::valid_uuid},
    AppState,
};

#[instrument(skip(req, state, data))]
pub async fn submit_contact_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<NewContactSubmission>,
) -> Result<impl Responder, AppError> {
    // Rejected bodies do not count against the client's window.
    data.validate()?;

    let client_ip = get_client_ip(&req, state.trust_forwarded_for);

    let remaining = match state.contact_limiter.check(&client_ip) {
        RateDecision::Allowed { remaining } => remaining,
        RateDecision::Limited { retry_after_secs } => {
            tracing::warn!(client_ip = %client_ip, retry_after_secs, "Contact form rate limited");
            return Err(AppError::RateLimited(retry_after_secs));
        }
    };

    let response = state.contacts.submit(data.into_inner()).await?;

    Ok(HttpResponse::Created()
        .insert_header(("X-RateLimit-Remaining", remaining.to_string()))
        .json(response))
}

#[instrument(skip(_claims, state))]
pub async fn admin_list_contacts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<ContactListQuery>,
) -> Result<impl Responder, AppError> {
    let submissions = state.contacts.admin_list(&query).await?;
    Ok(HttpResponse::Ok().json(submissions))
}

#[instrument(skip(_claims, state, data))]
pub async fn change_contact_status(
    _claims: AdminClaims,
    submission_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<StatusChangeRequest>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&submission_id)?;
    let submission = state.contacts.change_status(id, data.status).await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_contact_notes(
    _claims: AdminClaims,
    submission_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<NotesUpdateRequest>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&submission_id)?;
    let submission = state.contacts.update_notes(id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[instrument(skip(_claims, state))]
pub async fn delete_contact(
    _claims: AdminClaims,
    submission_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&submission_id)?;
    query.ensure_confirmed()?;
    state.contacts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
