//! 存储管理模块
//!
//! 翻译结果的持久化缓存。

pub mod cache;

pub use cache::{CacheStats, CacheStore};
