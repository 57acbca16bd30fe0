//! 核心翻译模块
//!
//! - `client`: 与外部批量翻译服务的交互（批次、限速、重试）
//! - `service`: 编排缓存、术语表与客户端的翻译服务

pub mod client;
pub mod service;

pub use client::{ClientStats, RateWindow, TranslationBackend, TranslationClient, YandexCloudBackend};
pub use service::{DocumentTexts, ServiceStats, TranslationService};
