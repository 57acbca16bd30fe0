//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::TranslationConfig;

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 批次处理相关
    pub const DEFAULT_BATCH_SIZE: usize = 80;
    pub const DEFAULT_MAX_BATCH_CHARS: usize = 9000;

    // 速率限制与重试
    pub const DEFAULT_REQUESTS_PER_WINDOW: u32 = 300;
    pub const RATE_WINDOW: Duration = Duration::from_secs(60);
    pub const MAX_RETRY_ATTEMPTS: usize = 6;
    pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
    pub const MAX_BACKOFF: Duration = Duration::from_secs(30);
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    // 默认API设置
    pub const DEFAULT_API_URL: &str =
        "https://translate.api.cloud.yandex.net/translate/v2/translate";

    // 默认语言对与切换控件文案
    pub const DEFAULT_SOURCE_LANG: &str = "ru";
    pub const DEFAULT_TARGET_LANG: &str = "uz";
    pub const DEFAULT_SOURCE_LABEL: &str = "Русский";
    pub const DEFAULT_TARGET_LABEL: &str = "O'zbekcha";

    // 可翻译属性
    pub const TRANSLATABLE_ATTRS: &[&str] = &["title", "alt", "aria-label", "placeholder"];

    // 跳过的元素：其整个子树都不参与翻译
    pub const SKIP_ELEMENTS: &[&str] = &["script", "style", "code", "pre", "noscript"];

    // 携带描述内容的 meta 标签选择器（属性名，属性值）
    pub const META_DESC_SELECTORS: &[(&str, &str)] =
        &[("name", "description"), ("property", "og:description")];

    // 文件识别
    pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
    pub const REPORT_FILE_NAME: &str = "translation_report.csv";
    pub const DEFAULT_GLOSSARY_FILE: &str = "translate_glossary.csv";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &["sitetrans.toml", ".sitetrans.toml"];
}

/// 检查是否存在配置文件
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(path).exists())
}
