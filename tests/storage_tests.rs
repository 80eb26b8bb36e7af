//! Storage backend tests
//!
//! Tests for UrlStore using temporary SQLite databases.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use shortly::codegen::{CodeGenerator, DEFAULT_CODE_LENGTH, is_valid_short_code};
use shortly::config::{CodeConfig, DatabaseConfig};
use shortly::errors::ShortlyError;
use shortly::storage::{StorageFactory, UrlStore};
use tempfile::TempDir;

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_store(codes: CodeConfig) -> (UrlStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        retry_base_delay_ms: 10,
        retry_max_delay_ms: 50,
        ..Default::default()
    };

    let store = UrlStore::new(&db_config, &codes)
        .await
        .expect("Failed to create store");

    (store, temp_dir)
}

async fn default_store() -> (UrlStore, TempDir) {
    create_temp_store(CodeConfig::default()).await
}

/// 总是返回同一个短码的生成器，并记录调用次数
struct FixedCodeGenerator {
    code: String,
    calls: Arc<AtomicU32>,
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.code.clone()
    }
}

// =============================================================================
// create / find_by_code
// =============================================================================

#[tokio::test]
async fn test_create_then_find() {
    let (store, _dir) = default_store().await;

    let record = store.create("https://example.com").await.unwrap();
    assert_eq!(record.original_url, "https://example.com");
    assert_eq!(record.click_count, 0);
    assert_eq!(record.short_code.len(), DEFAULT_CODE_LENGTH);
    assert!(is_valid_short_code(&record.short_code));

    let found = store.find_by_code(&record.short_code).await.unwrap().unwrap();
    assert_eq!(found, record);
}

#[tokio::test]
async fn test_find_unknown_code() {
    let (store, _dir) = default_store().await;

    assert!(store.find_by_code("nope123").await.unwrap().is_none());
    // 非法字符同样只是查不到
    assert!(store.find_by_code("'; DROP TABLE urls--").await.unwrap().is_none());
}

#[tokio::test]
async fn test_configured_code_length() {
    let (store, _dir) = create_temp_store(CodeConfig {
        length: 12,
        max_attempts: 5,
    })
    .await;

    let record = store.create("https://example.com/long").await.unwrap();
    assert_eq!(record.short_code.len(), 12);
}

#[tokio::test]
async fn test_codes_are_unique() {
    let (store, _dir) = default_store().await;

    let mut codes = HashSet::new();
    for i in 0..50 {
        let record = store
            .create(&format!("https://example.com/{}", i))
            .await
            .unwrap();
        assert!(codes.insert(record.short_code));
    }
    assert_eq!(store.count().await.unwrap(), 50);
}

#[tokio::test]
async fn test_same_url_twice_gets_two_codes() {
    let (store, _dir) = default_store().await;

    let a = store.create("https://example.com").await.unwrap();
    let b = store.create("https://example.com").await.unwrap();
    assert_ne!(a.short_code, b.short_code);
    assert_ne!(a.id, b.id);
}

// =============================================================================
// 短码冲突
// =============================================================================

#[tokio::test]
async fn test_collision_exhausts_after_max_attempts() {
    let (store, _dir) = create_temp_store(CodeConfig {
        length: 7,
        max_attempts: 4,
    })
    .await;

    let calls = Arc::new(AtomicU32::new(0));
    let store = store.with_generator(Arc::new(FixedCodeGenerator {
        code: "SAME123".to_string(),
        calls: calls.clone(),
    }));

    let first = store.create("https://first.example.com").await.unwrap();
    assert_eq!(first.short_code, "SAME123");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let err = store.create("https://second.example.com").await.unwrap_err();
    assert!(matches!(err, ShortlyError::CodeGenerationExhausted(_)));
    assert!(!err.is_user_facing());
    assert_eq!(calls.load(Ordering::SeqCst), 1 + 4);

    // 第一条记录不受影响，也没有多出任何行
    let found = store.find_by_code("SAME123").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://first.example.com");
    assert_eq!(store.count().await.unwrap(), 1);
}

/// 前两次冲突，第三次拿到新短码
struct CollideThenFresh {
    calls: AtomicU32,
}

impl CodeGenerator for CollideThenFresh {
    fn generate(&self) -> String {
        match self.calls.fetch_add(1, Ordering::SeqCst) {
            0..=2 => "TAKEN00".to_string(),
            n => format!("FRESH{:02}", n),
        }
    }
}

#[tokio::test]
async fn test_collision_retries_with_new_code() {
    let (store, _dir) = default_store().await;
    let store = store.with_generator(Arc::new(CollideThenFresh {
        calls: AtomicU32::new(0),
    }));

    let first = store.create("https://a.example.com").await.unwrap();
    assert_eq!(first.short_code, "TAKEN00");

    // 第 2、3 次生成冲突，第 4 次成功
    let second = store.create("https://b.example.com").await.unwrap();
    assert_eq!(second.short_code, "FRESH03");
}

// =============================================================================
// find_all
// =============================================================================

#[tokio::test]
async fn test_find_all_newest_first() {
    let (store, _dir) = default_store().await;

    let a = store.create("https://a.example.com").await.unwrap();
    let b = store.create("https://b.example.com").await.unwrap();
    let c = store.create("https://c.example.com").await.unwrap();

    let all = store.find_all().await.unwrap();
    let codes: Vec<&str> = all.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(
        codes,
        vec![
            c.short_code.as_str(),
            b.short_code.as_str(),
            a.short_code.as_str()
        ]
    );
}

#[tokio::test]
async fn test_find_all_empty() {
    let (store, _dir) = default_store().await;
    assert!(store.find_all().await.unwrap().is_empty());
}

// =============================================================================
// increment_clicks
// =============================================================================

#[tokio::test]
async fn test_increment_clicks() {
    let (store, _dir) = default_store().await;
    let record = store.create("https://example.com").await.unwrap();

    assert!(store.increment_clicks(&record.short_code).await.unwrap());
    assert!(store.increment_clicks(&record.short_code).await.unwrap());

    let found = store.find_by_code(&record.short_code).await.unwrap().unwrap();
    assert_eq!(found.click_count, 2);
}

#[tokio::test]
async fn test_increment_unknown_code_is_noop() {
    let (store, _dir) = default_store().await;
    assert!(!store.increment_clicks("missing").await.unwrap());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    const N: i64 = 40;

    let (store, _dir) = default_store().await;
    let store = Arc::new(store);
    let record = store.create("https://example.com/hot").await.unwrap();

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let store = store.clone();
            let code = record.short_code.clone();
            tokio::spawn(async move { store.increment_clicks(&code).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    let found = store.find_by_code(&record.short_code).await.unwrap().unwrap();
    assert_eq!(found.click_count, N);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_urls, 1);
    assert_eq!(stats.total_clicks, N as u64);
}

// =============================================================================
// delete
// =============================================================================

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (store, _dir) = default_store().await;
    let record = store.create("https://example.com").await.unwrap();

    assert!(store.delete(&record.short_code).await.unwrap());
    assert!(store.find_by_code(&record.short_code).await.unwrap().is_none());
    assert!(!store.delete(&record.short_code).await.unwrap());
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let (store, _dir) = default_store().await;

    let a = store.create("https://a.example.com").await.unwrap();
    let b = store.create("https://b.example.com").await.unwrap();
    assert!(b.id > a.id);

    assert!(store.delete(&b.short_code).await.unwrap());
    let c = store.create("https://c.example.com").await.unwrap();
    assert!(c.id > b.id);
}

#[tokio::test]
async fn test_delete_leaves_other_records() {
    let (store, _dir) = default_store().await;
    let a = store.create("https://a.example.com").await.unwrap();
    let b = store.create("https://b.example.com").await.unwrap();

    store.delete(&a.short_code).await.unwrap();

    let all = store.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].short_code, b.short_code);
}

// =============================================================================
// 持久化与工厂
// =============================================================================

#[tokio::test]
async fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_config = DatabaseConfig {
        database_url: format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("persist.db").display()
        ),
        ..Default::default()
    };

    let code = {
        let store = StorageFactory::create(&db_config, &CodeConfig::default())
            .await
            .unwrap();
        let record = store.create("https://persist.example.com").await.unwrap();
        store.increment_clicks(&record.short_code).await.unwrap();
        record.short_code
    };

    let store = StorageFactory::create(&db_config, &CodeConfig::default())
        .await
        .unwrap();
    let found = store.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://persist.example.com");
    assert_eq!(found.click_count, 1);
    assert_eq!(store.backend_name(), "sqlite");
}

#[tokio::test]
async fn test_creates_missing_database_directory() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("data").join("nested").join("urls.db");
    let db_config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let store = UrlStore::new(&db_config, &CodeConfig::default())
        .await
        .unwrap();
    store.create("https://example.com").await.unwrap();
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_unsupported_database_url() {
    let db_config = DatabaseConfig {
        database_url: "redis://localhost".to_string(),
        ..Default::default()
    };
    let result = UrlStore::new(&db_config, &CodeConfig::default()).await;
    assert!(matches!(result, Err(ShortlyError::DatabaseConfig(_))));
}
