//! 术语表规则存储
//!
//! 从 CSV 文件加载有序的 (源模式, 目标词, 模式) 规则。
//! 规则在译前改写源文本（进入缓存键之前），在译后强制目标术语。
//! 不匹配的规则应用后是恒等变换。

use std::path::Path;

use regex::Regex;

/// 规则匹配模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlossaryMode {
    /// 精确子串替换
    Exact,
    /// 正则表达式替换
    Regex,
}

/// 单条术语规则
#[derive(Debug, Clone)]
pub struct GlossaryRule {
    pub pattern: String,
    pub replacement: String,
    pub mode: GlossaryMode,
    /// 正则模式在加载时编译；编译失败的规则不会进入存储
    compiled: Option<Regex>,
}

impl GlossaryRule {
    /// 构造精确模式规则
    pub fn exact(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            mode: GlossaryMode::Exact,
            compiled: None,
        }
    }

    /// 构造正则模式规则；模式非法时返回 None
    pub fn regex(pattern: &str, replacement: &str) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(compiled) => Some(Self {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
                mode: GlossaryMode::Regex,
                compiled: Some(compiled),
            }),
            Err(e) => {
                tracing::warn!("术语规则正则无效，已跳过: '{}' ({})", pattern, e);
                None
            }
        }
    }

    fn apply(&self, text: &str) -> String {
        match (&self.mode, &self.compiled) {
            (GlossaryMode::Exact, _) => text.replace(&self.pattern, &self.replacement),
            (GlossaryMode::Regex, Some(re)) => {
                re.replace_all(text, self.replacement.as_str()).into_owned()
            }
            (GlossaryMode::Regex, None) => text.to_string(),
        }
    }
}

/// 术语表存储
#[derive(Debug, Clone, Default)]
pub struct GlossaryStore {
    rules: Vec<GlossaryRule>,
}

impl GlossaryStore {
    /// 空规则集
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从既有规则构造存储
    pub fn from_rules(rules: Vec<GlossaryRule>) -> Self {
        Self { rules }
    }

    /// 从 CSV 文件加载规则
    ///
    /// 首行是表头，跳过。文件缺失按空规则集处理，单条坏规则跳过，
    /// 其余规则照常生效。
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!("术语表文件不存在: {}", path.display());
                return Self::empty();
            }
        };

        let mut rules = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line_num == 0 || line.trim().is_empty() {
                continue;
            }

            let fields = parse_csv_row(line);
            if fields.len() < 3 {
                tracing::warn!("术语表第 {} 行字段不足，已跳过: {}", line_num + 1, line);
                continue;
            }

            let (pattern, replacement, mode) = (&fields[0], &fields[1], &fields[2]);
            let rule = match mode.trim().to_lowercase().as_str() {
                // "dt" 是旧格式里精确模式的标记
                "exact" | "dt" => Some(GlossaryRule::exact(pattern, replacement)),
                "regex" => GlossaryRule::regex(pattern, replacement),
                other => {
                    tracing::warn!(
                        "术语表第 {} 行模式未知，已跳过: '{}'",
                        line_num + 1,
                        other
                    );
                    None
                }
            };

            if let Some(rule) = rule {
                rules.push(rule);
            }
        }

        tracing::debug!("已加载 {} 条术语规则", rules.len());
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 译前应用：按顺序应用所有规则
    pub fn apply_pre(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// 译后应用：精确规则重写残留的源术语为规范目标词
    ///
    /// 翻译服务偶尔会原样保留源语言术语；这里只处理精确模式，
    /// 对目标文本跑源语言正则并不安全。
    pub fn apply_post(&self, text: &str) -> String {
        self.rules
            .iter()
            .filter(|rule| rule.mode == GlossaryMode::Exact)
            .fold(text.to_string(), |acc, rule| {
                acc.replace(&rule.pattern, &rule.replacement)
            })
    }
}

/// 解析一行 CSV，支持双引号包裹与 "" 转义
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

/// 写出一个 CSV 字段，必要时加引号
pub fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
