//! 翻译编排服务
//!
//! 串联术语表、缓存与客户端：译前规则 → 缓存查询 → 去重 →
//! 网络翻译 → 译后规则 → 写缓存，最终给出源文本到译文的映射。
//! 同一运行内重复的源文本只翻译一次；缓存命中完全跳过网络调用。

use std::collections::HashMap;
use std::time::Instant;

use crate::translation::core::client::TranslationClient;
use crate::translation::error::TranslationResult;
use crate::translation::pipeline::glossary::GlossaryStore;
use crate::translation::storage::cache::CacheStore;

/// 一个文档的三类文本序列（收集顺序）
#[derive(Debug, Clone, Default)]
pub struct DocumentTexts {
    pub text_runs: Vec<String>,
    pub attributes: Vec<String>,
    pub meta: Vec<String>,
}

impl DocumentTexts {
    pub fn total(&self) -> usize {
        self.text_runs.len() + self.attributes.len() + self.meta.len()
    }
}

/// 服务统计信息
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceStats {
    pub texts_seen: usize,
    pub unique_texts: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub chars_translated: usize,
    pub processing_time_ms: u64,
}

/// 统一的翻译服务
pub struct TranslationService {
    client: TranslationClient,
    glossary: GlossaryStore,
    stats: ServiceStats,
}

impl TranslationService {
    pub fn new(client: TranslationClient, glossary: GlossaryStore) -> Self {
        Self {
            client,
            glossary,
            stats: ServiceStats::default(),
        }
    }

    pub fn glossary(&self) -> &GlossaryStore {
        &self.glossary
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// 对一串文本应用译前术语规则
    ///
    /// 结果同时是缓存键：表面相同但术语处理结果不同的文本不会串台。
    pub fn apply_pre_glossary(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .map(|text| self.glossary.apply_pre(text))
            .collect()
    }

    /// 翻译去重后的文本集合，返回源文本 → 最终译文的映射
    ///
    /// 输入应当已经过译前术语处理。缓存命中的文本不再进入网络请求；
    /// 网络返回的译文先过译后术语规则，再写入缓存和映射。
    pub fn translate_unique(
        &mut self,
        texts: &[String],
        cache: &mut CacheStore,
    ) -> TranslationResult<HashMap<String, String>> {
        let started = Instant::now();
        self.stats.texts_seen += texts.len();

        let mut mapping: HashMap<String, String> = HashMap::new();
        let mut pending: Vec<String> = Vec::new();

        for text in texts {
            if mapping.contains_key(text) || pending.contains(text) {
                continue;
            }

            match cache.get(text) {
                Some(cached) => {
                    self.stats.cache_hits += 1;
                    mapping.insert(text.clone(), cached);
                }
                None => {
                    self.stats.cache_misses += 1;
                    pending.push(text.clone());
                }
            }
        }

        self.stats.unique_texts += mapping.len() + pending.len();

        if !pending.is_empty() {
            tracing::debug!("{} 条文本未命中缓存，提交翻译", pending.len());
            let translated = self.client.translate(&pending)?;

            for (source, raw) in pending.into_iter().zip(translated) {
                let finalized = self.glossary.apply_post(&raw);
                self.stats.chars_translated += source.chars().count();
                cache.set(source.clone(), finalized.clone());
                mapping.insert(source, finalized);
            }
        }

        self.stats.processing_time_ms += started.elapsed().as_millis() as u64;
        Ok(mapping)
    }

    /// 翻译一个文档的全部文本序列
    ///
    /// 三类序列统一去重翻译，再各自按原顺序解析回等长的替换序列，
    /// 映射对文本、属性、meta 一视同仁地覆盖所有重复出现。
    pub fn translate_document(
        &mut self,
        texts: &DocumentTexts,
        cache: &mut CacheStore,
    ) -> TranslationResult<DocumentTexts> {
        let mut all = Vec::with_capacity(texts.total());
        all.extend_from_slice(&texts.text_runs);
        all.extend_from_slice(&texts.attributes);
        all.extend_from_slice(&texts.meta);

        let mapping = self.translate_unique(&all, cache)?;

        Ok(DocumentTexts {
            text_runs: resolve(&texts.text_runs, &mapping),
            attributes: resolve(&texts.attributes, &mapping),
            meta: resolve(&texts.meta, &mapping),
        })
    }
}

/// 按映射逐条解析替换文本；缺失映射时保留原文
fn resolve(texts: &[String], mapping: &HashMap<String, String>) -> Vec<String> {
    texts
        .iter()
        .map(|text| mapping.get(text).cloned().unwrap_or_else(|| text.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::config::TranslationConfig;
    use crate::translation::core::client::TranslationBackend;
    use crate::translation::error::TranslationResult;
    use crate::translation::pipeline::glossary::GlossaryRule;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingUppercaseBackend {
        calls: Rc<Cell<usize>>,
        texts_sent: Rc<Cell<usize>>,
    }

    impl TranslationBackend for CountingUppercaseBackend {
        fn translate_batch(&self, texts: &[String]) -> TranslationResult<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            self.texts_sent.set(self.texts_sent.get() + texts.len());
            Ok(texts.iter().map(|t| t.to_uppercase()).collect())
        }
    }

    fn service_with_counter(
        glossary: GlossaryStore,
    ) -> (TranslationService, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let texts_sent = Rc::new(Cell::new(0));
        let backend = CountingUppercaseBackend {
            calls: calls.clone(),
            texts_sent: texts_sent.clone(),
        };
        let client = TranslationClient::new(Box::new(backend), &TranslationConfig::default());
        (TranslationService::new(client, glossary), calls, texts_sent)
    }

    fn cache() -> CacheStore {
        CacheStore::load(std::path::Path::new("/nonexistent/test-cache.json"))
    }

    #[test]
    fn test_duplicates_translated_once() {
        let (mut service, _, texts_sent) = service_with_counter(GlossaryStore::empty());
        let mut cache = cache();

        let texts: Vec<String> = vec!["дом", "дом", "стена", "дом"]
            .into_iter()
            .map(String::from)
            .collect();
        let mapping = service.translate_unique(&texts, &mut cache).unwrap();

        assert_eq!(texts_sent.get(), 2);
        assert_eq!(mapping.get("дом").map(String::as_str), Some("ДОМ"));
        assert_eq!(mapping.get("стена").map(String::as_str), Some("СТЕНА"));
    }

    #[test]
    fn test_cache_hit_short_circuits_network() {
        let (mut service, calls, _) = service_with_counter(GlossaryStore::empty());
        let mut cache = cache();
        cache.set("дом".to_string(), "uy".to_string());

        let mapping = service
            .translate_unique(&["дом".to_string()], &mut cache)
            .unwrap();

        assert_eq!(calls.get(), 0);
        assert_eq!(mapping.get("дом").map(String::as_str), Some("uy"));
        assert_eq!(service.stats().cache_hits, 1);
    }

    #[test]
    fn test_results_are_cached() {
        let (mut service, calls, _) = service_with_counter(GlossaryStore::empty());
        let mut cache = cache();

        service
            .translate_unique(&["потолок".to_string()], &mut cache)
            .unwrap();
        service
            .translate_unique(&["потолок".to_string()], &mut cache)
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_pre_glossary_applied_before_cache_key() {
        let glossary =
            GlossaryStore::from_rules(vec![GlossaryRule::exact("гипсокартон", "gipsokarton")]);
        let (mut service, calls, _) = service_with_counter(glossary);
        let mut cache = cache();

        let prepared =
            service.apply_pre_glossary(&["лист гипсокартон и гипсокартон".to_string()]);
        // 每处出现都在进入缓存键之前被替换
        assert_eq!(prepared, vec!["лист gipsokarton и gipsokarton"]);

        // 缓存键是术语处理后的文本
        cache.set(
            "лист gipsokarton и gipsokarton".to_string(),
            "кэшировано".to_string(),
        );
        let mapping = service.translate_unique(&prepared, &mut cache).unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(
            mapping.get(&prepared[0]).map(String::as_str),
            Some("кэшировано")
        );
    }

    #[test]
    fn test_post_glossary_applied_before_caching() {
        // 大写后端会原样保留非字母文本，模拟译文中残留的源术语
        let glossary = GlossaryStore::from_rules(vec![GlossaryRule::exact("№1", "No.1")]);
        let (mut service, _, _) = service_with_counter(glossary);
        let mut cache = cache();

        let mapping = service
            .translate_unique(&["профиль №1".to_string()], &mut cache)
            .unwrap();

        assert_eq!(
            mapping.get("профиль №1").map(String::as_str),
            Some("ПРОФИЛЬ No.1")
        );
        // 缓存里存的也是译后术语处理过的结果
        assert_eq!(cache.get("профиль №1").as_deref(), Some("ПРОФИЛЬ No.1"));
    }

    #[test]
    fn test_document_texts_resolved_uniformly() {
        let (mut service, _, _) = service_with_counter(GlossaryStore::empty());
        let mut cache = cache();

        let texts = DocumentTexts {
            text_runs: vec!["метка".to_string(), "заголовок".to_string()],
            attributes: vec!["метка".to_string()],
            meta: vec!["описание".to_string()],
        };

        let resolved = service.translate_document(&texts, &mut cache).unwrap();

        assert_eq!(resolved.text_runs, vec!["МЕТКА", "ЗАГОЛОВОК"]);
        // 属性里的同一文本得到同一译文
        assert_eq!(resolved.attributes, vec!["МЕТКА"]);
        assert_eq!(resolved.meta, vec!["ОПИСАНИЕ"]);
    }
}
