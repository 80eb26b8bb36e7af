//! SeaORM storage backend
//!
//! Durable store for URL records on SQLite, MySQL/MariaDB or PostgreSQL.
//! Uniqueness of short codes is enforced by the `UNIQUE` index on
//! `short_code`, never by an application-level check.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::codegen::{CodeGenerator, RandomCodeGenerator};
use crate::config::{CodeConfig, DatabaseConfig};
use crate::errors::{Result, ShortlyError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, new_active_model};
pub use retry::{ErrorClass, Replay, classify, is_unique_violation};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortlyError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        "postgresql" => "postgres".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based URL record store
#[derive(Clone)]
pub struct UrlStore {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
    generator: Arc<dyn CodeGenerator>,
    /// 每次 create 最多尝试插入的次数
    max_attempts: u32,
}

impl UrlStore {
    /// 连接数据库、运行迁移，使用随机短码生成器
    pub async fn new(db_config: &DatabaseConfig, code_config: &CodeConfig) -> Result<Self> {
        let database_url = db_config.database_url.trim();
        if database_url.is_empty() {
            return Err(ShortlyError::database_config("database_url 未设置"));
        }

        let backend_name = normalize_backend_name(&infer_backend_from_url(database_url)?);

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, db_config).await?
        } else {
            connect_generic(database_url, &backend_name, db_config).await?
        };

        run_migrations(&db).await?;

        info!(
            "{} storage initialized (code length {}, max attempts {})",
            backend_name.to_uppercase(),
            code_config.length,
            code_config.max_attempts
        );

        Ok(Self {
            db,
            backend_name,
            retry_config: retry::RetryConfig::from(db_config),
            generator: Arc::new(RandomCodeGenerator::new(code_config.length)),
            max_attempts: code_config.max_attempts.max(1),
        })
    }

    /// 替换短码生成器
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
