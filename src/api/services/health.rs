use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{error, info, trace};

use crate::api::types::{HealthResponse, HealthStorageCheck};
use crate::services::UrlService;

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    /// GET /health：存储可用时 200，否则 503
    pub async fn health_check(
        service: web::Data<UrlService>,
        app_start_time: web::Data<AppStartTime>,
    ) -> HttpResponse {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = service.store().backend_name().to_string();

        let storage = match tokio::time::timeout(Duration::from_secs(5), service.stats()).await {
            Ok(Ok(stats)) => HealthStorageCheck {
                status: "healthy".to_string(),
                backend,
                url_count: Some(stats.total_urls),
                total_clicks: Some(stats.total_clicks),
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    url_count: None,
                    total_clicks: None,
                    error: Some("storage unavailable".to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    url_count: None,
                    total_clicks: None,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let is_healthy = storage.status == "healthy";

        let body = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            storage,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}s",
            start_time.elapsed(),
            body.status,
            uptime
        );

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        HttpResponse::build(status).json(body)
    }

    // 活跃性检查，不访问存储
    pub async fn liveness_check() -> HttpResponse {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
