use actix_web::{http::header::USER_AGENT, web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::analytics_event::NewAnalyticsEvent, errors::AppError, AppState};

#[instrument(skip(req, state, data))]
pub async fn record_event(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<NewAnalyticsEvent>,
) -> Result<impl Responder, AppError> {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.chars().take(512).collect::<String>());

    let recorded = state.analytics.record(data.into_inner(), user_agent).await?;
    Ok(HttpResponse::Created().json(recorded))
}
