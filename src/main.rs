use std::time::Duration;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use portfolio_cms::{
    background_task::start_limiter_eviction_task,
    connect_store,
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);

    let store = connect_store(&config).await?;
    let app_state = web::Data::new(AppState::new(&config, store));

    let server_addr = format!("{}:{}", config.host, config.port);
    let origins = config.cors_origins();

    tracing::info!(
        "Starting {} v{} on {} (store: {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.store_backend
    );

    let limiter = app_state.contact_limiter.clone();
    let idle_ttl = Duration::from_secs(config.contact_rate_window_secs * 2);

    let state = app_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(NormalizePath::trim())
            .wrap(AuthMiddleware)
            .wrap(build_cors(&origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)?
    .run();

    tokio::spawn(start_limiter_eviction_task(limiter, idle_ttl));

    tokio::select! {
        res = server => res?,
        _ = shutdown_signal() => {},
    }

    tracing::info!("Server stopped");
    Ok(())
}
