use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条短链接记录
///
/// `id`、`short_code`、`original_url`、`created_at` 创建后不可变，
/// `click_count` 只会被重定向流量递增。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

/// 聚合统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlStats {
    pub total_urls: u64,
    pub total_clicks: u64,
}
