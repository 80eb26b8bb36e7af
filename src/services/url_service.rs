//! URL management service
//!
//! The validation boundary in front of [`UrlStore`]. HTTP handlers and CLI
//! commands both go through here, so the scheme policy is applied the same
//! way for every entry point.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::codegen::is_valid_short_code;
use crate::errors::{Result, ShortlyError};
use crate::storage::{UrlRecord, UrlStats, UrlStore};
use crate::utils::{UrlValidationError, validate_url, validation_error_message};

/// 404 响应中使用的消息
pub const NOT_FOUND_MESSAGE: &str = "URL not found";

/// 短链接的重定向路径前缀
pub const REDIRECT_PREFIX: &str = "/r/";

#[derive(Clone)]
pub struct UrlService {
    store: Arc<UrlStore>,
    base_url: String,
}

impl UrlService {
    pub fn new(store: Arc<UrlStore>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    pub fn store(&self) -> &Arc<UrlStore> {
        &self.store
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/r/{code}`，不落库
    pub fn short_url(&self, code: &str) -> String {
        format!("{}{}{}", self.base_url, REDIRECT_PREFIX, code)
    }

    /// 校验并创建短链接
    pub async fn shorten(&self, original_url: Option<&str>) -> Result<UrlRecord> {
        let url = Self::validate(original_url)?;
        self.store.create(url).await
    }

    /// 按短码读取，不计点击
    pub async fn get(&self, code: &str) -> Result<UrlRecord> {
        if !is_valid_short_code(code) {
            return Err(ShortlyError::not_found(NOT_FOUND_MESSAGE));
        }

        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| ShortlyError::not_found(NOT_FOUND_MESSAGE))
    }

    pub async fn list(&self) -> Result<Vec<UrlRecord>> {
        self.store.find_all().await
    }

    /// 删除短链接，不存在时返回 NotFound
    pub async fn remove(&self, code: &str) -> Result<()> {
        if is_valid_short_code(code) && self.store.delete(code).await? {
            Ok(())
        } else {
            Err(ShortlyError::not_found(NOT_FOUND_MESSAGE))
        }
    }

    /// 重定向查找：读取记录并将点击数 +1
    ///
    /// 返回的是递增之前读到的记录。
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord> {
        let record = self.get(code).await?;

        // 记录可能在查找和计数之间被删除，此时仍按已读到的目标跳转
        if !self.store.increment_clicks(code).await? {
            warn!("Short URL {} disappeared before its click was counted", code);
        }

        debug!("Resolved {} -> {}", code, record.original_url);
        Ok(record)
    }

    pub async fn stats(&self) -> Result<UrlStats> {
        self.store.stats().await
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    /// 校验原始 URL，返回去掉首尾空白后的地址
    fn validate(original_url: Option<&str>) -> Result<&str> {
        let url = original_url.ok_or_else(|| {
            ShortlyError::validation(validation_error_message(&UrlValidationError::Missing))
        })?;

        validate_url(url).map_err(|e| {
            debug!("Rejected original URL {:?}: {}", url, e);
            ShortlyError::validation(validation_error_message(&e))
        })?;

        Ok(url.trim())
    }
}
