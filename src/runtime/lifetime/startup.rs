use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::UrlService;
use crate::storage::{StorageFactory, UrlStore};

/// 启动时构建的共享对象，服务器与 CLI 共用
pub struct StartupContext {
    pub store: Arc<UrlStore>,
    pub url_service: Arc<UrlService>,
}

/// 连接存储并组装服务
pub async fn prepare(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(&config.database, &config.codes)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", store.backend_name());

    let base_url = config.public_base_url();
    let url_service = Arc::new(UrlService::new(store.clone(), base_url));
    info!("Short URLs will use base URL {}", url_service.base_url());

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(StartupContext { store, url_service })
}
