//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值。
//! 优先级：默认值 < 配置文件 < 环境变量 < 命令行参数（由 main 应用）。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 语言对
    pub source_lang: String,
    pub target_lang: String,

    // API 设置
    pub api_url: String,
    pub api_key: String,
    pub folder_id: String,

    // 批次配置
    pub batch_size: usize,
    pub max_batch_chars: usize,

    // 速率与重试
    pub requests_per_window: u32,
    pub max_retry_attempts: usize,
    pub request_timeout_secs: u64,

    // 语言切换控件文案
    pub source_label: String,
    pub target_label: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            api_url: constants::DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            folder_id: String::new(),
            batch_size: constants::DEFAULT_BATCH_SIZE,
            max_batch_chars: constants::DEFAULT_MAX_BATCH_CHARS,
            requests_per_window: constants::DEFAULT_REQUESTS_PER_WINDOW,
            max_retry_attempts: constants::MAX_RETRY_ATTEMPTS,
            request_timeout_secs: constants::REQUEST_TIMEOUT.as_secs(),
            source_label: constants::DEFAULT_SOURCE_LABEL.to_string(),
            target_label: constants::DEFAULT_TARGET_LABEL.to_string(),
        }
    }
}

impl TranslationConfig {
    /// 创建带指定语言对的默认配置
    pub fn default_with_langs(source_lang: &str, target_lang: &str) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            ..Self::default()
        }
    }

    /// 单次请求的超时时间
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 加载配置：搜索配置文件，然后应用环境变量覆盖
    pub fn load() -> TranslationResult<Self> {
        let mut config = Self::default();

        for path in constants::CONFIG_PATHS {
            if Path::new(path).exists() {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    TranslationError::ConfigError(format!("读取配置文件 {} 失败: {}", path, e))
                })?;
                config = toml::from_str(&content)?;
                tracing::debug!("已加载配置文件: {}", path);
                break;
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{translation, EnvVar};

        if let Ok(key) = translation::ApiKey::get() {
            self.api_key = key;
        }

        if let Ok(folder) = translation::FolderId::get() {
            self.folder_id = folder;
        }

        if let Ok(url) = translation::ApiUrl::get() {
            tracing::info!("环境变量覆盖 API URL: {}", url);
            self.api_url = url;
        }

        if let Ok(lang) = translation::SourceLang::get() {
            self.source_lang = lang;
        }

        if let Ok(lang) = translation::TargetLang::get() {
            self.target_lang = lang;
        }

        if let Ok(size) = translation::BatchSize::get() {
            self.batch_size = size;
        }

        if let Ok(chars) = translation::MaxBatchChars::get() {
            self.max_batch_chars = chars;
        }

        if let Ok(rpm) = translation::RequestsPerMinute::get() {
            self.requests_per_window = rpm;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.batch_size == 0 {
            return Err(TranslationError::ConfigError(
                "批次大小不能为0".to_string(),
            ));
        }

        if self.max_batch_chars == 0 {
            return Err(TranslationError::ConfigError(
                "批次字符上限不能为0".to_string(),
            ));
        }

        if self.requests_per_window == 0 {
            return Err(TranslationError::ConfigError(
                "窗口请求数不能为0".to_string(),
            ));
        }

        if self.source_lang.trim().is_empty() || self.target_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError(
                "语言代码不能为空".to_string(),
            ));
        }

        Ok(())
    }

    /// 验证服务凭证，缺失则在启动时报错
    pub fn validate_credentials(&self) -> TranslationResult<()> {
        if self.api_key.trim().is_empty() || self.folder_id.trim().is_empty() {
            return Err(TranslationError::ConfigError(
                "缺少服务凭证：需要在环境中设置 YANDEX_API_KEY 和 YANDEX_FOLDER_ID".to_string(),
            ));
        }
        Ok(())
    }
}
