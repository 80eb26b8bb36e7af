//! URL 验证模块
//!
//! 只接受带主机名的 http/https 绝对地址，其余协议一律拒绝。

use url::Url;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    Missing,
    EmptyUrl,
    DangerousProtocol(String),
    InvalidProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "originalUrl is required"),
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// 验证原始 URL
///
/// 1. 不为空
/// 2. 不是危险协议
/// 3. 不含控制字符（`Url::parse` 会悄悄去掉 tab/CR/LF，原样存下后无法作为 Location 头）
/// 4. 能解析为绝对 URL 且带主机名
/// 5. 协议为 http 或 https
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "control characters are not allowed".to_string(),
        ));
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(*p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(UrlValidationError::InvalidProtocol(format!(
            "{}:",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat(
            "missing host".to_string(),
        ));
    }

    Ok(())
}

/// 生成重定向用的 Location 值
///
/// 纯可见 ASCII 的地址原样返回；含空格或非 ASCII 字符时使用 `Url` 的序列化结果，
/// 其中路径和查询已经过百分号编码。
pub fn redirect_location(url: &str) -> Result<String, UrlValidationError> {
    if url.bytes().all(|b| b.is_ascii_graphic()) {
        return Ok(url.to_string());
    }

    Url::parse(url)
        .map(String::from)
        .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::Missing => "originalUrl is required",
        UrlValidationError::EmptyUrl => "originalUrl is required",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidProtocol(_) => "Only http and https URLs are allowed",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}
