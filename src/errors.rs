use std::fmt;

use actix_web::http::StatusCode;

/// 对外统一的内部错误提示，不暴露存储细节
pub const GENERIC_FAILURE_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub enum ShortlyError {
    Validation(String),
    NotFound(String),
    DuplicateCode(String),
    CodeGenerationExhausted(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl ShortlyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortlyError::Validation(_) => "E001",
            ShortlyError::NotFound(_) => "E002",
            ShortlyError::DuplicateCode(_) => "E003",
            ShortlyError::CodeGenerationExhausted(_) => "E004",
            ShortlyError::DatabaseConfig(_) => "E005",
            ShortlyError::DatabaseConnection(_) => "E006",
            ShortlyError::DatabaseOperation(_) => "E007",
            ShortlyError::FileOperation(_) => "E008",
            ShortlyError::Serialization(_) => "E009",
            ShortlyError::Config(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortlyError::Validation(_) => "Validation Error",
            ShortlyError::NotFound(_) => "Resource Not Found",
            ShortlyError::DuplicateCode(_) => "Duplicate Short Code",
            ShortlyError::CodeGenerationExhausted(_) => "Code Generation Exhausted",
            ShortlyError::DatabaseConfig(_) => "Database Configuration Error",
            ShortlyError::DatabaseConnection(_) => "Database Connection Error",
            ShortlyError::DatabaseOperation(_) => "Database Operation Error",
            ShortlyError::FileOperation(_) => "File Operation Error",
            ShortlyError::Serialization(_) => "Serialization Error",
            ShortlyError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情（内部使用，可能包含存储细节）
    pub fn message(&self) -> &str {
        match self {
            ShortlyError::Validation(msg)
            | ShortlyError::NotFound(msg)
            | ShortlyError::DuplicateCode(msg)
            | ShortlyError::CodeGenerationExhausted(msg)
            | ShortlyError::DatabaseConfig(msg)
            | ShortlyError::DatabaseConnection(msg)
            | ShortlyError::DatabaseOperation(msg)
            | ShortlyError::FileOperation(msg)
            | ShortlyError::Serialization(msg)
            | ShortlyError::Config(msg) => msg,
        }
    }

    /// 只有校验失败和未找到是面向用户的错误
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ShortlyError::Validation(_) | ShortlyError::NotFound(_)
        )
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortlyError::Validation(_) => StatusCode::BAD_REQUEST,
            ShortlyError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给客户端的消息，内部错误统一替换为通用提示
    pub fn client_message(&self) -> &str {
        if self.is_user_facing() {
            self.message()
        } else {
            GENERIC_FAILURE_MESSAGE
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortlyError {}

// 便捷的构造函数
impl ShortlyError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortlyError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortlyError::NotFound(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(msg: T) -> Self {
        ShortlyError::DuplicateCode(msg.into())
    }

    pub fn code_generation_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortlyError::CodeGenerationExhausted(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortlyError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortlyError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortlyError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortlyError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortlyError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortlyError::Config(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortlyError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortlyError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShortlyError {
    fn from(err: std::io::Error) -> Self {
        ShortlyError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortlyError {
    fn from(err: serde_json::Error) -> Self {
        ShortlyError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortlyError>;
