//! 数据库错误分类与重试
//!
//! 每个 `DbErr` 先被归为四类之一：
//! - `Busy`：连接池耗尽、SQLite BUSY/LOCKED、死锁回滚，语句确定没有生效
//! - `ConnectionLost`：执行中断线，语句可能已经提交
//! - `DuplicateCode`：`short_code` 唯一约束冲突，交给 `create` 换码
//! - `Fatal`：其余错误，直接返回
//!
//! `Busy` 总是可以重放；`ConnectionLost` 只对幂等语句重放，
//! 否则 INSERT 会多出一行、点击数会多加一次。

use std::future::Future;
use std::time::Duration;

use sea_orm::error::RuntimeErr;
use sea_orm::{DbErr, SqlErr};
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// SQLite 主错误码和扩展错误码：BUSY、LOCKED、BUSY_RECOVERY、LOCKED_SHAREDCACHE、BUSY_SNAPSHOT
const SQLITE_BUSY_CODES: &[&str] = &["5", "6", "261", "262", "517"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Busy,
    ConnectionLost,
    DuplicateCode,
    Fatal,
}

/// 语句能否安全地执行多次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// SELECT、DELETE
    Idempotent,
    /// INSERT、`click_count + 1`
    NotIdempotent,
}

impl Replay {
    fn allows(self, class: ErrorClass) -> bool {
        match class {
            ErrorClass::Busy => true,
            ErrorClass::ConnectionLost => self == Replay::Idempotent,
            ErrorClass::DuplicateCode | ErrorClass::Fatal => false,
        }
    }
}

pub fn classify(err: &DbErr) -> ErrorClass {
    if is_unique_violation(err) {
        return ErrorClass::DuplicateCode;
    }

    match err {
        DbErr::ConnectionAcquire(_) => ErrorClass::Busy,
        DbErr::Conn(_) => ErrorClass::ConnectionLost,
        DbErr::Exec(runtime) | DbErr::Query(runtime) if is_busy(runtime) => ErrorClass::Busy,
        _ => ErrorClass::Fatal,
    }
}

/// 判断是否为唯一约束冲突（urls 表上只有 short_code 是唯一列）
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("unique constraint failed")
        || msg.contains("duplicate entry")
        || msg.contains("duplicate key value")
}

fn is_busy(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            let by_code = sqlx_err
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .is_some_and(|code| SQLITE_BUSY_CODES.contains(&code.as_ref()));
            by_code || busy_message(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => busy_message(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn busy_message(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("database is locked") || msg.contains("database table is locked") || msg.contains("deadlock")
}

/// 重放次数与退避区间，来自 `[database]` 配置段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// 第 `retry` 次重放前的等待：base * 2^(retry-1)，封顶 max，再加至多 1/4 的随机抖动
    fn delay_for(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(16);
        let capped = self.base_delay_ms.saturating_mul(1 << shift).min(self.max_delay_ms);
        Duration::from_millis(capped + rand::random_range(0..=capped / 4))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// 执行 `operation`，遇到 `replay` 允许的错误时按退避重放，最多 `max_retries` 次
pub async fn with_retry<T, F, Fut>(
    op: &str,
    config: RetryConfig,
    replay: Replay,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut retries = 0;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(op, retries, "database operation recovered");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let class = classify(&err);
        if !replay.allows(class) || retries >= config.max_retries {
            if retries > 0 {
                warn!(op, retries, error = %err, "database operation failed after retries");
            }
            return Err(err);
        }

        retries += 1;
        let delay = config.delay_for(retries);
        warn!(
            op,
            retry = retries,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            class = ?class,
            error = %err,
            "transient database error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::error::ConnAcquireErr;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 4,
        }
    }

    fn locked() -> DbErr {
        DbErr::Exec(RuntimeErr::Internal("database is locked".to_string()))
    }

    fn reset() -> DbErr {
        DbErr::Conn(RuntimeErr::Internal("connection reset by peer".to_string()))
    }

    fn duplicate() -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: urls.short_code".to_string(),
        ))
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)),
            ErrorClass::Busy
        );
        assert_eq!(classify(&locked()), ErrorClass::Busy);
        assert_eq!(classify(&reset()), ErrorClass::ConnectionLost);
        assert_eq!(classify(&duplicate()), ErrorClass::DuplicateCode);
        assert_eq!(
            classify(&DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"urls_short_code_key\"".to_string()
            ))),
            ErrorClass::DuplicateCode
        );
        assert_eq!(
            classify(&DbErr::Exec(RuntimeErr::Internal("disk I/O error".to_string()))),
            ErrorClass::Fatal
        );
        assert_eq!(
            classify(&DbErr::RecordNotFound("x".to_string())),
            ErrorClass::Fatal
        );
    }

    #[test]
    fn test_replay_policy() {
        assert!(Replay::Idempotent.allows(ErrorClass::ConnectionLost));
        assert!(!Replay::NotIdempotent.allows(ErrorClass::ConnectionLost));
        assert!(Replay::NotIdempotent.allows(ErrorClass::Busy));
        for replay in [Replay::Idempotent, Replay::NotIdempotent] {
            assert!(!replay.allows(ErrorClass::DuplicateCode));
            assert!(!replay.allows(ErrorClass::Fatal));
        }
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let config = RetryConfig {
            max_retries: 10,
            base_delay_ms: 50,
            max_delay_ms: 300,
        };
        let ms = |retry| config.delay_for(retry).as_millis() as u64;

        assert!((50..=62).contains(&ms(1)));
        assert!((100..=125).contains(&ms(2)));
        assert!((200..=250).contains(&ms(3)));
        assert!((300..=375).contains(&ms(4)));
        assert!((300..=375).contains(&ms(40)));
    }

    #[test]
    fn test_config_from_database_section() {
        let config = RetryConfig::from(&DatabaseConfig {
            retry_count: 6,
            retry_base_delay_ms: 20,
            retry_max_delay_ms: 900,
            ..Default::default()
        });
        assert_eq!(
            config,
            RetryConfig {
                max_retries: 6,
                base_delay_ms: 20,
                max_delay_ms: 900,
            }
        );
    }

    #[tokio::test]
    async fn test_busy_is_replayed_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("create(abc)", fast(), Replay::NotIdempotent, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 2 { Err(locked()) } else { Ok(n) } }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry("count", fast(), Replay::Idempotent, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)) }
        })
        .await;

        assert!(matches!(result, Err(DbErr::ConnectionAcquire(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_lost_connection_replays_only_idempotent_statements() {
        let calls = AtomicU32::new(0);
        let result = with_retry("find_all", fast(), Replay::Idempotent, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n == 0 { Err(reset()) } else { Ok(()) } }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // INSERT 可能已经提交，重放会多写一行
        let calls = AtomicU32::new(0);
        let result = with_retry("create(abc)", fast(), Replay::NotIdempotent, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(reset()) }
        })
        .await;
        assert!(matches!(result, Err(DbErr::Conn(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_returned_immediately() {
        let calls = AtomicU32::new(0);
        let result = with_retry("create(abc)", fast(), Replay::NotIdempotent, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(duplicate()) }
        })
        .await;

        assert_eq!(classify(&result.unwrap_err()), ErrorClass::DuplicateCode);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
