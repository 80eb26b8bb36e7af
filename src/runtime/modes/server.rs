//! Server mode
//!
//! Builds the store and services, then runs the actix-web HTTP server until
//! it receives a stop signal.

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, Condition, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{self, middleware::RequestIdMiddleware, services::AppStartTime};
use crate::config::{ApiConfig, StaticConfig};
use crate::runtime::lifetime;

/// 服务器最多使用的 worker 数
const MAX_WORKERS: usize = 32;

/// Validate CORS configuration at startup
fn validate_cors_config(api_config: &ApiConfig) {
    if api_config.cors_allowed_origins.is_empty() {
        warn!(
            "CORS allowed origins is empty. \
            No cross-origin requests will be allowed. \
            Use '[\"*\"]' for any origin."
        );
    } else if api_config.cors_allowed_origins.iter().any(|o| o == "*") {
        info!("CORS: any origin allowed");
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(api_config: &ApiConfig) -> Cors {
    let origins = &api_config.cors_allowed_origins;

    // 空列表 = 浏览器默认同源策略
    if origins.is_empty() {
        return Cors::default();
    }

    let mut cors = if origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = cors
        .allowed_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header("x-request-id")
        .expose_headers(["x-request-id"])
        .max_age(api_config.cors_max_age);

    cors
}

/// Security headers added to every response
fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare(&config).await.map_err(|e| {
        tracing::error!("Server startup failed: {}", e);
        e
    })?;

    let url_service = startup.url_service.clone();
    let db_for_shutdown = startup.store.get_db().clone();

    let cpu_count = config.server.cpu_count.clamp(1, MAX_WORKERS);
    warn!("Using {} CPU cores for the server", cpu_count);

    let api_config = config.api.clone();
    validate_cors_config(&api_config);

    let rate_limit = api_config.rate_limit.clone();
    let governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(rate_limit.seconds_per_request.max(1))
        .burst_size(rate_limit.burst_size.max(1))
        .finish()
        .context("Invalid rate limit configuration")?;
    if rate_limit.enabled {
        warn!(
            "Rate limiting enabled: 1 request per {}s per client IP, burst {}",
            rate_limit.seconds_per_request, rate_limit.burst_size
        );
    }

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&api_config);
        let api_config = api_config.clone();

        App::new()
            .wrap(Condition::new(
                rate_limit.enabled,
                Governor::new(&governor_config),
            ))
            .wrap(Condition::new(
                api_config.security_headers,
                security_headers(),
            ))
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(RequestIdMiddleware) // 最外层，为每个请求生成 request_id
            .app_data(web::Data::from(url_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(api_config.payload_limit))
            .configure(move |cfg| api::configure(cfg, &api_config))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    lifetime::shutdown::close_database(db_for_shutdown).await;
    Ok(())
}
