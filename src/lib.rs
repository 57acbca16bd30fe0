//! # Sitetrans 库
//!
//! 把静态 HTML 站点从一种语言批量翻译为另一种语言，保留标记结构、
//! 节点顺序与站点导航元数据。
//!
//! ## 模块组织
//!
//! - `core` - 运行驱动与主要处理逻辑
//! - `parsers` - HTML 解析、序列化与语言标注
//! - `translation` - 翻译管道（收集、批次、缓存、术语表、客户端）
//! - `env` - 环境变量与 .env 加载

pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::{
    run, DocumentRecord, MirrorOutcome, RunOptions, RunReport, RunSummary, SitetransError,
};
pub use crate::translation::{
    CacheStore, GlossaryStore, TranslationClient, TranslationConfig, TranslationService,
    YandexCloudBackend,
};
