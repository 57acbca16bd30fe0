//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型，重试逻辑通过 `is_retryable` 标记判断，
//! 不依赖异常层级。

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 速率限制错误
    #[error("请求速率过快，已达到限制")]
    RateLimitExceeded,

    /// 翻译服务拒绝请求
    #[error("翻译服务错误: HTTP {status}: {message}")]
    ApiError {
        /// HTTP 状态码
        status: u16,
        /// 服务返回的错误消息
        message: String,
    },

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 缓存错误
    #[error("缓存错误: {0}")]
    CacheError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 处理错误
    #[error("处理错误: {0}")]
    ProcessingError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::RateLimitExceeded => true,
            TranslationError::ApiError { .. } => false,
            TranslationError::ConfigError(_) => false,
            TranslationError::CacheError(_) => false,
            TranslationError::SerializationError(_) => false,
            TranslationError::ProcessingError(_) => false,
        }
    }

    /// 检查错误是否为速率限制信号
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, TranslationError::RateLimitExceeded)
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::CacheError(format!("IO错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;
