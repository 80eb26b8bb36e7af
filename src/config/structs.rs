use serde::{Deserialize, Serialize};

use crate::codegen::DEFAULT_CODE_LENGTH;
use crate::errors::{Result, ShortlyError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，例如 SHORTLY__SERVER__PORT=9000
pub const ENV_PREFIX: &str = "SHORTLY";

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
///
/// - server: 监听地址、对外 base URL、worker 数量
/// - database: 数据库连接与重试
/// - codes: 短码长度与碰撞重试次数
/// - api: CORS、安全响应头、限流
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub codes: CodeConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值。`path` 为 None 时读取可选的 config.toml，
    /// 显式指定的文件必须存在。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let (file, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(file).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ShortlyError::config(format!("Failed to build config: {}", e)))?;

        let config: StaticConfig = settings
            .try_deserialize()
            .map_err(|e| ShortlyError::config(format!("Failed to deserialize config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ShortlyError::config("server.port must be greater than 0"));
        }
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.codes.length) {
            return Err(ShortlyError::config(format!(
                "codes.length must be between {} and {}, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, self.codes.length
            )));
        }
        if self.codes.max_attempts == 0 {
            return Err(ShortlyError::config(
                "codes.max_attempts must be at least 1",
            ));
        }
        if self.database.database_url.trim().is_empty() {
            return Err(ShortlyError::config("database.database_url is empty"));
        }
        if self.database.pool_size == 0 {
            return Err(ShortlyError::config(
                "database.pool_size must be greater than 0",
            ));
        }
        if self.api.rate_limit.enabled
            && (self.api.rate_limit.seconds_per_request == 0 || self.api.rate_limit.burst_size == 0)
        {
            return Err(ShortlyError::config(
                "api.rate_limit.seconds_per_request and burst_size must be greater than 0",
            ));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ShortlyError::config(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// 对外可见的 base URL，未配置时由监听地址推导，去掉末尾的 '/'
    pub fn public_base_url(&self) -> String {
        match self.server.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.server.host, self.server.port),
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShortlyError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// shortUrl 的前缀，例如 https://sho.rt
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 短码生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeConfig {
    #[serde(default = "default_code_length")]
    pub length: usize,
    /// 短码冲突时最多尝试插入的次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// HTTP API 策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age: usize,
    #[serde(default = "default_security_headers")]
    pub security_headers: bool,
    /// JSON 请求体上限（字节）
    #[serde(default = "default_payload_limit")]
    pub payload_limit: usize,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// 按客户端 IP 的令牌桶限流
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,
    /// 每隔多少秒补充一个令牌
    #[serde(default = "default_rate_limit_seconds_per_request")]
    pub seconds_per_request: u64,
    #[serde(default = "default_rate_limit_burst")]
    pub burst_size: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://data/urls.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_max_attempts() -> u32 {
    5
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> usize {
    3600
}

fn default_security_headers() -> bool {
    true
}

fn default_payload_limit() -> usize {
    64 * 1024
}

fn default_rate_limit_seconds_per_request() -> u64 {
    1
}

fn default_rate_limit_burst() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            base_url: None,
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            length: default_code_length(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: default_cors_allowed_origins(),
            cors_max_age: default_cors_max_age(),
            security_headers: default_security_headers(),
            payload_limit: default_payload_limit(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seconds_per_request: default_rate_limit_seconds_per_request(),
            burst_size: default_rate_limit_burst(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
