//! 翻译客户端
//!
//! 负责与外部批量翻译服务的全部交互：批次划分、滑动窗口限速、
//! 指数退避重试。流水线是单线程顺序执行的，唯一会挂起控制流的
//! 操作就是这里的限速等待与退避等待，两者都是阻塞睡眠。

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::translation::config::{constants, TranslationConfig};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::batch::{build_batches, Batch};

/// 批量翻译后端接口
///
/// 一次调用对应一次服务请求：输入一批源文本，返回等长的译文序列。
/// 速率限制必须以区别于一般传输失败的 `RateLimitExceeded` 信号上报。
pub trait TranslationBackend {
    fn translate_batch(&self, texts: &[String]) -> TranslationResult<Vec<String>>;
}

// ============================================================================
// Yandex Cloud Translate v2 后端
// ============================================================================

#[derive(Serialize)]
struct TranslateRequest<'a> {
    #[serde(rename = "folderId")]
    folder_id: &'a str,
    #[serde(rename = "sourceLanguageCode")]
    source_language_code: &'a str,
    #[serde(rename = "targetLanguageCode")]
    target_language_code: &'a str,
    texts: &'a [String],
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<TranslationItem>,
}

#[derive(Deserialize)]
struct TranslationItem {
    text: String,
}

/// 生产后端：Yandex Cloud Translate v2 批量接口
pub struct YandexCloudBackend {
    http: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    folder_id: String,
    source_lang: String,
    target_lang: String,
}

impl YandexCloudBackend {
    pub fn new(config: &TranslationConfig) -> TranslationResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            folder_id: config.folder_id.clone(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
        })
    }
}

impl TranslationBackend for YandexCloudBackend {
    fn translate_batch(&self, texts: &[String]) -> TranslationResult<Vec<String>> {
        let body = TranslateRequest {
            folder_id: &self.folder_id,
            source_language_code: &self.source_lang,
            target_language_code: &self.target_lang,
            texts,
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .json(&body)
            .send()?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TranslationError::RateLimitExceeded);
        }
        if status.is_server_error() {
            // 5xx 按瞬时服务故障处理，可重试
            return Err(TranslationError::NetworkError(format!(
                "服务端错误: HTTP {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let parsed: TranslateResponse = response.json()?;
        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}

// ============================================================================
// 滑动请求窗口
// ============================================================================

/// 固定时长窗口内的请求数预算
///
/// 预算耗尽时阻塞等待窗口到期；每次真实发出的请求（含重试）都计数。
pub struct RateWindow {
    limit: u32,
    window: Duration,
    window_start: Instant,
    used: u32,
}

impl RateWindow {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            window_start: Instant::now(),
            used: 0,
        }
    }

    /// 占用一个请求名额，必要时睡眠至窗口到期
    pub fn acquire(&mut self) {
        let elapsed = self.window_start.elapsed();

        if elapsed >= self.window {
            self.window_start = Instant::now();
            self.used = 0;
        } else if self.used >= self.limit {
            let wait = self.window - elapsed;
            tracing::info!("请求窗口预算已用尽，等待 {:?}", wait);
            thread::sleep(wait);
            self.window_start = Instant::now();
            self.used = 0;
        }

        self.used += 1;
    }
}

// ============================================================================
// 客户端
// ============================================================================

/// 客户端统计信息
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientStats {
    pub requests_sent: u64,
    pub retries: u64,
    pub rate_limit_hits: u64,
    pub batches_completed: u64,
}

/// 翻译客户端
pub struct TranslationClient {
    backend: Box<dyn TranslationBackend>,
    rate: RateWindow,
    max_items: usize,
    max_chars: usize,
    max_attempts: usize,
    stats: ClientStats,
}

impl TranslationClient {
    pub fn new(backend: Box<dyn TranslationBackend>, config: &TranslationConfig) -> Self {
        Self {
            backend,
            rate: RateWindow::new(config.requests_per_window, constants::RATE_WINDOW),
            max_items: config.batch_size,
            max_chars: config.max_batch_chars,
            max_attempts: config.max_retry_attempts.max(1),
            stats: ClientStats::default(),
        }
    }

    /// 翻译一组（已去重的）源文本
    ///
    /// 返回与输入等长且顺序一致的译文序列。按批次顺序拼接，
    /// 批次内保持请求顺序，保证第 i 条输入对应第 i 条输出。
    pub fn translate(&mut self, texts: &[String]) -> TranslationResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches = build_batches(texts, self.max_items, self.max_chars);
        tracing::debug!("{} 条文本划分为 {} 个批次", texts.len(), batches.len());

        let mut results = Vec::with_capacity(texts.len());
        for batch in &batches {
            let translated = self.send_with_retry(batch)?;

            if translated.len() != batch.texts.len() {
                // 结果条数对不上意味着 1:1 映射被破坏，必须中止
                return Err(TranslationError::ProcessingError(format!(
                    "批次 {} 返回 {} 条结果，预期 {} 条",
                    batch.id,
                    translated.len(),
                    batch.texts.len()
                )));
            }

            results.extend(translated);
            self.stats.batches_completed += 1;
        }

        Ok(results)
    }

    /// 发送单个批次，对可重试失败做指数退避
    ///
    /// 速率限制信号与一般传输失败共用同一重试上限；
    /// 任何一种耗尽重试都让失败向上传播，绝不悄悄丢弃文本。
    fn send_with_retry(&mut self, batch: &Batch) -> TranslationResult<Vec<String>> {
        let mut backoff = constants::INITIAL_BACKOFF;
        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            self.rate.acquire();
            self.stats.requests_sent += 1;

            match self.backend.translate_batch(&batch.texts) {
                Ok(translated) => {
                    if attempt > 0 {
                        tracing::info!("{} 在第 {} 次重试后成功", batch.summary(), attempt);
                    }
                    return Ok(translated);
                }
                Err(e) if e.is_retryable() => {
                    if e.is_rate_limit() {
                        self.stats.rate_limit_hits += 1;
                        tracing::warn!("{} 触发速率限制，{:?} 后重试", batch.summary(), backoff);
                    } else {
                        tracing::warn!("{} 传输失败: {}，{:?} 后重试", batch.summary(), e, backoff);
                    }

                    self.stats.retries += 1;
                    last_error = Some(e);

                    if attempt + 1 < self.max_attempts {
                        thread::sleep(backoff);
                        backoff = std::cmp::min(backoff * 2, constants::MAX_BACKOFF);
                    }
                }
                Err(e) => {
                    tracing::error!("{} 出现不可重试错误: {}", batch.summary(), e);
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TranslationError::ProcessingError(format!(
                "批次 {} 经 {} 次尝试后仍然失败",
                batch.id, self.max_attempts
            ))
        }))
    }

    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }
}
