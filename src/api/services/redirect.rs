use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{debug, error, trace};

use crate::api::helpers::error_from_shortly;
use crate::codegen::is_valid_short_code;
use crate::errors::ShortlyError;
use crate::services::{NOT_FOUND_MESSAGE, UrlService};
use crate::utils::redirect_location;

pub struct RedirectService;

impl RedirectService {
    /// GET /r/{code}：302 跳转并计数
    pub async fn handle_redirect(
        service: web::Data<UrlService>,
        path: web::Path<String>,
    ) -> HttpResponse {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            // 非法短码，直接 404，不查库
            trace!("Invalid short code rejected: {}", code);
            return error_from_shortly(&ShortlyError::not_found(NOT_FOUND_MESSAGE));
        }

        match service.resolve(&code).await {
            Ok(record) => match redirect_location(&record.original_url) {
                Ok(location) => {
                    debug!("Redirecting {} -> {}", code, location);
                    HttpResponse::build(StatusCode::FOUND)
                        .insert_header(("Location", location))
                        .finish()
                }
                Err(e) => {
                    error!("Stored target of {} is not a usable Location: {}", code, e);
                    error_from_shortly(&ShortlyError::serialization(e.to_string()))
                }
            },
            Err(e) => error_from_shortly(&e),
        }
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/r").route("/{code}", web::get().to(RedirectService::handle_redirect))
}
