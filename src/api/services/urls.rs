//! /api/urls 路由

use actix_web::{HttpResponse, web};
use tracing::{info, trace};

use crate::api::helpers::error_from_shortly;
use crate::api::types::{CreateUrlRequest, UrlResponse};
use crate::services::UrlService;

pub struct UrlApiService;

impl UrlApiService {
    /// POST /api/urls
    pub async fn create_url(
        service: web::Data<UrlService>,
        body: web::Json<CreateUrlRequest>,
    ) -> HttpResponse {
        let req = body.into_inner();

        match service.shorten(req.original_url.as_deref()).await {
            Ok(record) => {
                info!("API: created {} for {}", record.short_code, record.original_url);
                HttpResponse::Created().json(UrlResponse::from_record(record, &service))
            }
            Err(e) => error_from_shortly(&e),
        }
    }

    /// GET /api/urls
    pub async fn list_urls(service: web::Data<UrlService>) -> HttpResponse {
        match service.list().await {
            Ok(records) => {
                trace!("API: listing {} urls", records.len());
                let body: Vec<UrlResponse> = records
                    .into_iter()
                    .map(|r| UrlResponse::from_record(r, &service))
                    .collect();
                HttpResponse::Ok().json(body)
            }
            Err(e) => error_from_shortly(&e),
        }
    }

    /// GET /api/urls/{code}
    pub async fn get_url(service: web::Data<UrlService>, path: web::Path<String>) -> HttpResponse {
        let code = path.into_inner();

        match service.get(&code).await {
            Ok(record) => HttpResponse::Ok().json(UrlResponse::from_record(record, &service)),
            Err(e) => error_from_shortly(&e),
        }
    }

    /// DELETE /api/urls/{code}
    pub async fn delete_url(
        service: web::Data<UrlService>,
        path: web::Path<String>,
    ) -> HttpResponse {
        let code = path.into_inner();

        match service.remove(&code).await {
            Ok(()) => {
                info!("API: deleted {}", code);
                HttpResponse::NoContent().finish()
            }
            Err(e) => error_from_shortly(&e),
        }
    }
}

/// /api/urls 路由配置
pub fn url_routes() -> actix_web::Scope {
    web::scope("/api/urls")
        .route("", web::post().to(UrlApiService::create_url))
        .route("", web::get().to(UrlApiService::list_urls))
        .route("/{code}", web::get().to(UrlApiService::get_url))
        .route("/{code}", web::delete().to(UrlApiService::delete_url))
}
