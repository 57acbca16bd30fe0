//! 翻译批次划分
//!
//! 将待翻译文本贪心地分组为同时满足条目数上限和字符数上限的批次。
//! 单条超长文本独占一个批次照常发送，不会被丢弃或截断。

/// 一个翻译批次
#[derive(Debug, Clone)]
pub struct Batch {
    /// 批次序号（从 1 开始）
    pub id: usize,
    /// 批次内的源文本，顺序即请求顺序
    pub texts: Vec<String>,
    /// 字符总数
    pub chars: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// 批次的简要描述，用于日志
    pub fn summary(&self) -> String {
        format!("批次 {}: {} 条, {} 字符", self.id, self.texts.len(), self.chars)
    }
}

/// 按条目数与字符数双上限贪心划分批次
///
/// 一个条目在当前批次非空且会触破任一上限时开启新批次；
/// 因此批次至少包含一条文本，超过字符上限的单条文本独占批次发出。
pub fn build_batches(texts: &[String], max_items: usize, max_chars: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_chars = 0;

    let flush = |current: &mut Vec<String>, current_chars: &mut usize, batches: &mut Vec<Batch>| {
        if !current.is_empty() {
            batches.push(Batch {
                id: batches.len() + 1,
                texts: std::mem::take(current),
                chars: std::mem::take(current_chars),
            });
        }
    };

    for text in texts {
        let chars = text.chars().count();
        let would_overflow =
            current.len() >= max_items || current_chars + chars > max_chars;

        if !current.is_empty() && would_overflow {
            flush(&mut current, &mut current_chars, &mut batches);
        }

        current.push(text.clone());
        current_chars += chars;
    }

    flush(&mut current, &mut current_chars, &mut batches);

    batches
}
