use std::{sync::Arc, time::Duration};

use anyhow::Context;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, lifecycle, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, cache, db, limiter, utils};

use auth::jwt::JwtService;
use limiter::ClientRateLimiter;
use repositories::{PostgrestStore, SharedStore, SqlxStore};
use settings::{AppConfig, StoreBackend};
use use_cases::{
    analytics::AnalyticsHandler, blog::BlogPostHandler, contact::ContactHandler,
    dashboard::DashboardHandler, projects::ProjectHandler, testimonials::TestimonialHandler,
};

pub struct AppState {
    pub projects: ProjectHandler<SharedStore>,
    pub blog: BlogPostHandler<SharedStore>,
    pub testimonials: TestimonialHandler<SharedStore>,
    pub contacts: ContactHandler<SharedStore>,
    pub dashboard: DashboardHandler<SharedStore>,
    pub analytics: AnalyticsHandler<SharedStore>,
    pub jwt_service: JwtService,
    pub contact_limiter: ClientRateLimiter,
    pub store: SharedStore,
    pub store_backend: StoreBackend,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: SharedStore) -> Self {
        AppState {
            projects: ProjectHandler::new(store.clone()),
            blog: BlogPostHandler::new(store.clone()),
            testimonials: TestimonialHandler::new(store.clone()),
            contacts: ContactHandler::new(store.clone()),
            dashboard: DashboardHandler::new(store.clone()),
            analytics: AnalyticsHandler::new(store.clone()),
            jwt_service: JwtService::new(config),
            contact_limiter: ClientRateLimiter::new(
                config.contact_rate_limit,
                Duration::from_secs(config.contact_rate_window_secs),
            ),
            store,
            store_backend: config.store_backend,
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}

/// Opens the configured content store.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    let store: SharedStore = match config.store_backend {
        StoreBackend::Rest => {
            let client = db::rest::create_gateway_client(config)?;
            let store = PostgrestStore::new(client, &config.supabase_url)
                .context("invalid SUPABASE_URL")?;
            Arc::new(store)
        }
        StoreBackend::Postgres => {
            let pool = db::postgres::create_pool(&config.database_url)
                .await
                .context("connecting to Postgres")?;
            if config.run_migrations {
                db::postgres::run_migrations(&pool).await.context("running migrations")?;
            }
            Arc::new(SqlxStore::new(pool))
        }
    };
    Ok(store)
}
