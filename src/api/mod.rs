//! HTTP API
//!
//! - `POST/GET /api/urls`, `GET/DELETE /api/urls/{code}`
//! - `GET /r/{code}` 302 跳转
//! - `GET /health`, `GET /health/live`

pub mod helpers;
pub mod middleware;
pub mod services;
pub mod types;

use actix_web::web;

use crate::config::ApiConfig;

/// 注册全部路由以及 JSON 解析配置
///
/// 服务器和集成测试共用，`UrlService` 与 `AppStartTime` 由调用方以 `app_data` 注入。
pub fn configure(cfg: &mut web::ServiceConfig, api_config: &ApiConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(api_config.payload_limit)
            .error_handler(helpers::json_error_handler),
    )
    .service(services::health_routes())
    .service(services::url_routes())
    .service(services::redirect_routes());
}
