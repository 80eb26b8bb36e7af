//! Mutation operations for UrlStore
//!
//! This module contains all write database operations.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ExprTrait, QueryFilter, sea_query::Expr};
use tracing::{debug, error, info, warn};

use super::converters::{model_to_record, new_active_model};
use super::retry::{self, ErrorClass, Replay};
use super::UrlStore;
use crate::errors::{Result, ShortlyError};
use crate::storage::UrlRecord;

use migration::entities::url;

impl UrlStore {
    /// 创建新记录
    ///
    /// 单条 INSERT，由 short_code 的唯一索引兜底。冲突时换一个短码重试，
    /// 共尝试 `max_attempts` 次。
    pub async fn create(&self, original_url: &str) -> Result<UrlRecord> {
        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();

            match self.try_insert(original_url, &code).await {
                Ok(record) => {
                    info!(
                        "Short URL created: {} -> {} (id {})",
                        record.short_code, record.original_url, record.id
                    );
                    return Ok(record);
                }
                Err(ShortlyError::DuplicateCode(_)) => {
                    warn!(
                        "Short code collision on '{}' (attempt {}/{})",
                        code, attempt, self.max_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        error!(
            "Failed to allocate a unique short code after {} attempts",
            self.max_attempts
        );
        Err(ShortlyError::code_generation_exhausted(format!(
            "no unique short code after {} attempts",
            self.max_attempts
        )))
    }

    async fn try_insert(&self, original_url: &str, code: &str) -> Result<UrlRecord> {
        let db = &self.db;

        // 断线时 INSERT 可能已提交，不重放
        let result = retry::with_retry(
            &format!("create({})", code),
            self.retry_config,
            Replay::NotIdempotent,
            || async { new_active_model(original_url, code).insert(db).await },
        )
        .await;

        match result {
            Ok(model) => Ok(model_to_record(model)),
            Err(e) if retry::classify(&e) == ErrorClass::DuplicateCode => {
                Err(ShortlyError::duplicate_code(code))
            }
            Err(e) => {
                error!("插入短链接失败: {}", e);
                Err(ShortlyError::database_operation(format!(
                    "插入短链接失败: {}",
                    e
                )))
            }
        }
    }

    /// 点击数原子 +1，返回是否命中记录
    pub async fn increment_clicks(&self, code: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("increment_clicks({})", code),
            self.retry_config,
            Replay::NotIdempotent,
            || async {
                url::Entity::update_many()
                    .col_expr(
                        url::Column::ClickCount,
                        Expr::col(url::Column::ClickCount).add(1i64),
                    )
                    .filter(url::Column::ShortCode.eq(code))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            error!("更新点击数失败: {}", e);
            ShortlyError::database_operation(format!("更新点击数失败: {}", e))
        })?;

        debug!(
            "Click increment for {}: {} row(s) affected",
            code, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    /// 删除记录，返回是否确实删除了一行；重复删除返回 false
    pub async fn delete(&self, code: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("delete({})", code),
            self.retry_config,
            Replay::Idempotent,
            || async {
                url::Entity::delete_many()
                    .filter(url::Column::ShortCode.eq(code))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| ShortlyError::database_operation(format!("删除短链接失败: {}", e)))?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Short URL deleted: {}", code);
        }
        Ok(removed)
    }
}
