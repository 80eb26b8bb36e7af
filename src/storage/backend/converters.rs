use crate::storage::UrlRecord;
use migration::entities::url;

/// 将 Sea-ORM Model 转换为 UrlRecord
pub fn model_to_record(model: url::Model) -> UrlRecord {
    UrlRecord {
        id: i64::from(model.id),
        original_url: model.original_url,
        short_code: model.short_code,
        created_at: model.created_at,
        click_count: model.click_count.max(0),
    }
}

/// 构造待插入的 ActiveModel，id 交给数据库分配
pub fn new_active_model(original_url: &str, short_code: &str) -> url::ActiveModel {
    use sea_orm::ActiveValue::*;

    url::ActiveModel {
        id: NotSet,
        original_url: Set(original_url.to_string()),
        short_code: Set(short_code.to_string()),
        created_at: Set(chrono::Utc::now()),
        click_count: Set(0),
    }
}
