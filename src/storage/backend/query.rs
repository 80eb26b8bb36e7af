//! Query operations for UrlStore
//!
//! This module contains all read-only database operations.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::{debug, error};

use super::converters::model_to_record;
use super::retry::{self, Replay};
use super::UrlStore;
use crate::errors::{Result, ShortlyError};
use crate::storage::{UrlRecord, UrlStats};

use migration::entities::url;

/// 统计查询结果
#[derive(Debug, FromQueryResult)]
struct StatsResult {
    total_urls: i64,
    total_clicks: Option<i64>,
}

impl UrlStore {
    /// 按短码精确查找
    pub async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("find_by_code({})", code),
            self.retry_config,
            Replay::Idempotent,
            || async {
                url::Entity::find()
                    .filter(url::Column::ShortCode.eq(code))
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            error!("查询短链接失败（重试后仍失败）: {}", e);
            ShortlyError::database_operation(format!("查询短链接失败: {}", e))
        })?;

        Ok(model.map(model_to_record))
    }

    /// 所有记录，最新创建的在前
    pub async fn find_all(&self) -> Result<Vec<UrlRecord>> {
        let db = &self.db;

        let models = retry::with_retry("find_all", self.retry_config, Replay::Idempotent, || async {
            url::Entity::find()
                .order_by_desc(url::Column::CreatedAt)
                .order_by_desc(url::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| {
            error!("加载所有短链接失败: {}", e);
            ShortlyError::database_operation(format!("加载所有短链接失败: {}", e))
        })?;

        debug!("Loaded {} url records", models.len());
        Ok(models.into_iter().map(model_to_record).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let db = &self.db;

        retry::with_retry("count", self.retry_config, Replay::Idempotent, || async {
            url::Entity::find().count(db).await
        })
        .await
        .map_err(|e| ShortlyError::database_operation(format!("统计短链接数量失败: {}", e)))
    }

    /// 链接总数与点击总数（SeaORM DSL 聚合查询）
    pub async fn stats(&self) -> Result<UrlStats> {
        let result = url::Entity::find()
            .select_only()
            .column_as(url::Column::Id.count(), "total_urls")
            .column_as(url::Column::ClickCount.sum(), "total_clicks")
            .into_model::<StatsResult>()
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("统计查询失败: {}", e);
                ShortlyError::database_operation(format!("统计查询失败: {}", e))
            })?;

        Ok(match result {
            Some(stats) => UrlStats {
                total_urls: stats.total_urls.max(0) as u64,
                total_clicks: stats.total_clicks.unwrap_or(0).max(0) as u64,
            },
            None => UrlStats::default(),
        })
    }
}
