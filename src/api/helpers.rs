//! API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use tracing::{debug, error};

use crate::errors::ShortlyError;

use super::types::ErrorBody;

/// 构建错误响应
pub fn error_response(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            error: message.to_string(),
            code: code.to_string(),
        })
}

/// 从 ShortlyError 构建错误响应
///
/// 内部错误记录详情，只向客户端返回通用消息。
pub fn error_from_shortly(err: &ShortlyError) -> HttpResponse {
    if err.is_user_facing() {
        debug!("Request rejected: {}", err);
    } else {
        error!("Request failed [{}]: {}", err.code(), err);
    }
    error_response(err.http_status(), err.code(), err.client_message())
}

/// JSON 解析失败统一返回 400
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Malformed JSON body: {}", err);

    let status = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        _ => StatusCode::BAD_REQUEST,
    };
    let message = if status == StatusCode::BAD_REQUEST {
        "Invalid JSON body"
    } else {
        "Request body too large"
    };

    let response = error_response(status, "E001", message);
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_internal_error_is_masked() {
        let err = ShortlyError::database_operation("disk I/O error at page 42");
        let resp = error_from_shortly(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "E007");
    }

    #[actix_rt::test]
    async fn test_not_found_keeps_message() {
        let resp = error_from_shortly(&ShortlyError::not_found("URL not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "URL not found");
    }
}
