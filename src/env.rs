//! 统一的环境变量管理
//!
//! 提供类型安全、可验证的环境变量访问器，以及 .env 文件加载。

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Environment variable '{}': {}",
            self.variable, self.message
        )
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "not set".to_string(),
            }),
        }
    }

    fn get_or(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

fn parse_usize(name: &str, value: &str) -> EnvResult<usize> {
    value.trim().parse().map_err(|_| EnvError {
        variable: name.to_string(),
        message: format!("invalid integer '{}'", value),
    })
}

/// 翻译相关环境变量定义
pub mod translation {
    use super::*;

    /// 翻译服务 API 密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "YANDEX_API_KEY";
        const DESCRIPTION: &'static str = "API key for the batch translation service";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 翻译服务目录标识
    pub struct FolderId;
    impl EnvVar<String> for FolderId {
        const NAME: &'static str = "YANDEX_FOLDER_ID";
        const DESCRIPTION: &'static str = "Cloud folder id for the batch translation service";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 翻译服务地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "TRANSLATE_API_URL";
        const DESCRIPTION: &'static str = "Override the translation endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let trimmed = value.trim();
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                Ok(trimmed.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("invalid URL '{}'", value),
                })
            }
        }
    }

    /// 源语言代码
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "TRANSLATE_SOURCE_LANG";
        const DESCRIPTION: &'static str = "Source language code (e.g. ru)";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_lowercase())
        }
    }

    /// 目标语言代码
    pub struct TargetLang;
    impl EnvVar<String> for TargetLang {
        const NAME: &'static str = "TRANSLATE_TARGET_LANG";
        const DESCRIPTION: &'static str = "Target language code (e.g. uz)";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_lowercase())
        }
    }

    /// 单批次最大条目数
    pub struct BatchSize;
    impl EnvVar<usize> for BatchSize {
        const NAME: &'static str = "TRANSLATE_BATCH_SIZE";
        const DESCRIPTION: &'static str = "Maximum texts per batch request";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_usize(Self::NAME, value)
        }
    }

    /// 单批次最大字符数
    pub struct MaxBatchChars;
    impl EnvVar<usize> for MaxBatchChars {
        const NAME: &'static str = "TRANSLATE_MAX_CHARS";
        const DESCRIPTION: &'static str = "Maximum total characters per batch request";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_usize(Self::NAME, value)
        }
    }

    /// 每分钟请求上限
    pub struct RequestsPerMinute;
    impl EnvVar<u32> for RequestsPerMinute {
        const NAME: &'static str = "REQUESTS_PER_MINUTE";
        const DESCRIPTION: &'static str = "Request budget per rate window";

        fn parse(value: &str) -> EnvResult<u32> {
            value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: format!("invalid integer '{}'", value),
            })
        }
    }
}

/// 加载 .env 文件（静默失败，环境变量可能已由外部提供）
pub fn load_dotenv() {
    for env_file in [".env", "env", "env.sample"] {
        if std::path::Path::new(env_file).exists() {
            match dotenv::from_filename(env_file) {
                Ok(_) => {
                    tracing::debug!("已加载环境文件: {}", env_file);
                    return;
                }
                Err(e) => {
                    tracing::warn!("加载环境文件 {} 失败: {}", env_file, e);
                }
            }
        }
    }

    // 退回默认查找
    let _ = dotenv::dotenv();
}
