//! Short code generation
//!
//! Codes are drawn at random from the base-62 alphabet. Uniqueness is not the
//! generator's job: the store inserts under a `UNIQUE` constraint and asks for
//! a fresh code whenever the insert collides.

/// Base-62 字母表：大写 + 小写 + 数字
pub const BASE62_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 默认短码长度（62^7 ≈ 3.5 万亿）
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// 查询时允许的最大短码长度
pub const MAX_SHORT_CODE_LENGTH: usize = 64;

/// Produces candidate short codes.
///
/// Implementations must be safe to call from many requests at once and must
/// not assume they are the only generator writing to the store.
pub trait CodeGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// Fixed-length random codes over [`BASE62_ALPHABET`].
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| BASE62_ALPHABET[rand::random_range(0..BASE62_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 校验短码格式：非空、不超过最大长度、只包含 ASCII 字母和数字
///
/// 在访问数据库之前拒绝非法短码。
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LENGTH
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
