use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{use_cases::extractors::AdminClaims, AppState};

#[instrument(skip(_claims, state))]
pub async fn dashboard_stats(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> impl Responder {
    HttpResponse::Ok().json(state.dashboard.stats().await)
}
