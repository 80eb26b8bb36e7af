//! HTTP 请求/响应结构（camelCase JSON）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::UrlService;
use crate::storage::UrlRecord;

/// POST /api/urls 请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub original_url: Option<String>,
}

/// 单条短链接的响应形状
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// 由 base_url 计算，不落库
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, service: &UrlService) -> Self {
        let short_url = service.short_url(&record.short_code);
        Self {
            id: record.id,
            original_url: record.original_url,
            short_code: record.short_code,
            short_url,
            created_at: record.created_at,
            click_count: record.click_count,
        }
    }
}

/// 错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// GET /health 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// 运行秒数
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_clicks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_uses_camel_case() {
        let req: CreateUrlRequest =
            serde_json::from_str(r#"{"originalUrl":"https://example.com"}"#).unwrap();
        assert_eq!(req.original_url.as_deref(), Some("https://example.com"));

        let req: CreateUrlRequest = serde_json::from_str("{}").unwrap();
        assert!(req.original_url.is_none());

        let req: CreateUrlRequest =
            serde_json::from_str(r#"{"original_url":"https://example.com"}"#).unwrap();
        assert!(req.original_url.is_none());
    }

    #[test]
    fn test_url_response_field_names() {
        let resp = UrlResponse {
            id: 1,
            original_url: "https://example.com".to_string(),
            short_code: "abc1234".to_string(),
            short_url: "http://localhost:8080/r/abc1234".to_string(),
            created_at: Utc::now(),
            click_count: 0,
        };
        let value = serde_json::to_value(&resp).unwrap();
        for key in [
            "id",
            "originalUrl",
            "shortCode",
            "shortUrl",
            "createdAt",
            "clickCount",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }
}
