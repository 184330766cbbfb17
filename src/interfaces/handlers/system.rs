use actix_web::{web, get, HttpResponse, Responder};
use humantime::format_duration;
use once_cell::sync::Lazy;
use chrono::Utc;
use parking_lot::RwLock;
use std::{
    time::Duration,
    sync::atomic::{AtomicI64, Ordering},
};
use serde::Serialize;
use crate::{constants::START_TIME, AppState};

const HEALTH_CACHE_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    store_backend: String,
    store: String,
    version: String,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn build_health_response(state: &web::Data<AppState>) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let (status, store) = match state.store.ping().await {
        Ok(()) => ("healthy", "OK".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Content store ping failed");
            ("degraded", "Unavailable".to_string())
        }
    };

    HealthCheckResponse {
        status: status.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        store_backend: state.store_backend.to_string(),
        store,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > HEALTH_CACHE_SECS {
        let response = build_health_response(&state).await;
        *CACHED_STATUS.write() = response.clone();
        LAST_CHECK.store(now, Ordering::Relaxed);
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::Ok().json(CACHED_STATUS.read().clone())
    }
}
