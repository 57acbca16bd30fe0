//! 翻译缓存存储
//!
//! 源文本到译文的精确映射，持久化为可人工查看的 JSON 平面文件。
//! 缓存键是译前术语处理之后的文本；流水线是单向的，不需要语言对键。
//! 缓存只增不减，跨运行复用，损坏的缓存文件降级为空缓存而不是中断运行。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::translation::error::{TranslationError, TranslationResult};

/// 缓存统计信息
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub loaded_entries: usize,
    pub new_entries: usize,
}

impl CacheStats {
    /// 缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 持久化翻译缓存
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    entries: HashMap<String, String>,
    stats: CacheStats,
}

impl CacheStore {
    /// 从磁盘加载缓存
    ///
    /// 文件缺失或内容损坏都按空缓存处理：损坏的缓存只是降级为零命中，
    /// 绝不中断运行。
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("缓存文件损坏，按空缓存处理: {} ({})", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => {
                tracing::debug!("缓存文件不存在，从空缓存开始: {}", path.display());
                HashMap::new()
            }
        };

        let loaded = entries.len();
        tracing::debug!("已加载 {} 条缓存", loaded);

        Self {
            path: path.to_path_buf(),
            entries,
            stats: CacheStats {
                loaded_entries: loaded,
                ..Default::default()
            },
        }
    }

    /// 查询译文
    pub fn get(&mut self, text: &str) -> Option<String> {
        match self.entries.get(text) {
            Some(translated) => {
                self.stats.hits += 1;
                Some(translated.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// 写入译文
    pub fn set(&mut self, text: String, translated: String) {
        if self.entries.insert(text, translated).is_none() {
            self.stats.new_entries += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// 将完整映射写回磁盘
    pub fn persist(&self) -> TranslationResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TranslationError::CacheError(format!(
                    "创建缓存目录 {} 失败: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(|e| {
            TranslationError::CacheError(format!("写入缓存 {} 失败: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            "缓存已持久化: {} ({} 条)",
            self.path.display(),
            self.entries.len()
        );
        Ok(())
    }
}
