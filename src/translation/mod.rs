//! 翻译模块
//!
//! 提供完整的 HTML 站点翻译功能，采用清晰的模块化架构：
//! - **core**: 翻译客户端与编排服务
//! - **pipeline**: 文本处理管道（收集、批次、术语表）
//! - **storage**: 缓存与持久化存储
//! - **config**: 配置管理
//! - **error**: 错误处理
//! - **processor**: 译文回写

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod processor;
pub mod storage;

// ============================================================================
// 核心API导出
// ============================================================================

pub use config::TranslationConfig;
pub use self::core::{
    DocumentTexts, TranslationBackend, TranslationClient, TranslationService, YandexCloudBackend,
};
pub use error::{TranslationError, TranslationResult};
pub use pipeline::{build_batches, Batch, GlossaryRule, GlossaryStore, TextCollector, TextUnit, UnitKind};
pub use processor::TranslationProcessor;
pub use storage::CacheStore;
