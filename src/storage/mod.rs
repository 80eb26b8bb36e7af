use std::sync::Arc;

use crate::config::{CodeConfig, DatabaseConfig};
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::UrlStore;
pub use models::{UrlRecord, UrlStats};

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(
        db_config: &DatabaseConfig,
        code_config: &CodeConfig,
    ) -> Result<Arc<UrlStore>> {
        let store = UrlStore::new(db_config, code_config).await?;
        Ok(Arc::new(store))
    }
}
