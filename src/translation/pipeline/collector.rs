//! 文本收集器模块
//!
//! 从 DOM 中枚举可翻译单元：文本节点、白名单属性值、描述类 meta 内容。
//! 三类单元各自按文档顺序收集；同一输入的收集结果是确定的，
//! 收集顺序就是回写顺序（第 i 个单元对应第 i 个译文）。

use std::fmt;

use markup5ever_rcdom::{Handle, NodeData};

use crate::parsers::html::dom::{get_node_attr, get_node_name};
use crate::translation::config::constants;

/// 可翻译单元的类别
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// 元素内的文本节点
    TextRun,
    /// 白名单属性值（携带属性名）
    Attribute(String),
    /// meta 描述标签的 content 值
    MetaContent,
}

/// 一个可翻译单元：当前文本加上指回原始位置的节点引用
#[derive(Clone)]
pub struct TextUnit {
    pub text: String,
    pub node: Handle,
    pub kind: UnitKind,
}

impl fmt::Debug for TextUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextUnit")
            .field("text", &self.text)
            .field("kind", &self.kind)
            .finish()
    }
}

/// 收集统计信息
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectorStats {
    pub text_units: usize,
    pub attr_units: usize,
    pub meta_units: usize,
    pub skipped_empty: usize,
}

/// DOM 文本收集器
///
/// 只读遍历；排除标签的整个子树都不参与收集。
pub struct TextCollector {
    skip_elements: &'static [&'static str],
    attributes: &'static [&'static str],
    stats: CollectorStats,
}

impl Default for TextCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCollector {
    pub fn new() -> Self {
        Self {
            skip_elements: constants::SKIP_ELEMENTS,
            attributes: constants::TRANSLATABLE_ATTRS,
            stats: CollectorStats::default(),
        }
    }

    /// 收集文本节点单元（文档顺序）
    pub fn collect_text_units(&mut self, root: &Handle) -> Vec<TextUnit> {
        let mut units = Vec::new();
        self.walk_text(root, &mut units);
        self.stats.text_units = units.len();
        units
    }

    /// 收集白名单属性单元（文档顺序）
    pub fn collect_attribute_units(&mut self, root: &Handle) -> Vec<TextUnit> {
        let mut units = Vec::new();
        self.walk_attributes(root, &mut units);
        self.stats.attr_units = units.len();
        units
    }

    /// 收集 meta 描述单元（文档顺序）
    pub fn collect_meta_units(&mut self, root: &Handle) -> Vec<TextUnit> {
        let mut units = Vec::new();
        self.walk_meta(root, &mut units);
        self.stats.meta_units = units.len();
        units
    }

    pub fn stats(&self) -> &CollectorStats {
        &self.stats
    }

    fn is_excluded(&self, node: &Handle) -> bool {
        get_node_name(node)
            .map(|name| {
                let lowered = name.to_lowercase();
                self.skip_elements.iter().any(|skip| *skip == lowered)
            })
            .unwrap_or(false)
    }

    fn walk_text(&mut self, node: &Handle, units: &mut Vec<TextUnit>) {
        match node.data {
            NodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    self.stats.skipped_empty += 1;
                } else {
                    units.push(TextUnit {
                        text,
                        node: node.clone(),
                        kind: UnitKind::TextRun,
                    });
                }
            }
            NodeData::Element { .. } => {
                if self.is_excluded(node) {
                    return;
                }
                for child in node.children.borrow().iter() {
                    self.walk_text(child, units);
                }
            }
            // 注释、doctype 等节点不含可翻译文本，但 Document 节点要继续下探
            _ => {
                for child in node.children.borrow().iter() {
                    self.walk_text(child, units);
                }
            }
        }
    }

    fn walk_attributes(&mut self, node: &Handle, units: &mut Vec<TextUnit>) {
        if let NodeData::Element { .. } = node.data {
            if self.is_excluded(node) {
                return;
            }

            for attr_name in self.attributes {
                if let Some(value) = get_node_attr(node, attr_name) {
                    if value.trim().is_empty() {
                        self.stats.skipped_empty += 1;
                    } else {
                        units.push(TextUnit {
                            text: value,
                            node: node.clone(),
                            kind: UnitKind::Attribute(attr_name.to_string()),
                        });
                    }
                }
            }
        }

        for child in node.children.borrow().iter() {
            self.walk_attributes(child, units);
        }
    }

    fn walk_meta(&mut self, node: &Handle, units: &mut Vec<TextUnit>) {
        if let NodeData::Element { .. } = node.data {
            if self.is_excluded(node) {
                return;
            }

            if get_node_name(node) == Some("meta") && is_description_meta(node) {
                if let Some(content) = get_node_attr(node, "content") {
                    if content.trim().is_empty() {
                        self.stats.skipped_empty += 1;
                    } else {
                        units.push(TextUnit {
                            text: content,
                            node: node.clone(),
                            kind: UnitKind::MetaContent,
                        });
                    }
                }
            }
        }

        for child in node.children.borrow().iter() {
            self.walk_meta(child, units);
        }
    }
}

fn is_description_meta(node: &Handle) -> bool {
    constants::META_DESC_SELECTORS
        .iter()
        .any(|(attr, value)| get_node_attr(node, attr).as_deref() == Some(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::html_to_dom;
    use markup5ever_rcdom::RcDom;

    fn parse(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8")
    }

    fn texts(units: &[TextUnit]) -> Vec<&str> {
        units.iter().map(|u| u.text.as_str()).collect()
    }

    #[test]
    fn test_text_units_in_document_order() {
        let dom = parse(
            "<html><head><title>Заголовок</title></head>\
             <body><h1>Один</h1><div><p>Два</p></div><p>Три</p></body></html>",
        );
        let mut collector = TextCollector::new();
        let units = collector.collect_text_units(&dom.document);

        assert_eq!(texts(&units), vec!["Заголовок", "Один", "Два", "Три"]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = "<html><body><p>a</p><p title=\"t\">b</p><img alt=\"c\"></body></html>";
        let dom = parse(html);
        let mut collector = TextCollector::new();
        let first: Vec<String> = collector
            .collect_text_units(&dom.document)
            .iter()
            .map(|u| u.text.clone())
            .collect();

        let dom2 = parse(html);
        let second: Vec<String> = collector
            .collect_text_units(&dom2.document)
            .iter()
            .map(|u| u.text.clone())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_excluded_subtrees_are_pruned() {
        let dom = parse(
            "<html><body><p>Видимый</p>\
             <script>var x = 'нет';</script>\
             <style>.a { content: 'нет'; }</style>\
             <pre>form<code>atted</code></pre>\
             <noscript>нет</noscript></body></html>",
        );
        let mut collector = TextCollector::new();
        let units = collector.collect_text_units(&dom.document);

        assert_eq!(texts(&units), vec!["Видимый"]);
    }

    #[test]
    fn test_whitespace_only_runs_skipped() {
        let dom = parse("<html><body><p>  </p><p>Текст</p></body></html>");
        let mut collector = TextCollector::new();
        let units = collector.collect_text_units(&dom.document);

        assert_eq!(units.len(), 1);
        assert!(collector.stats().skipped_empty > 0);
    }

    #[test]
    fn test_attribute_units_whitelist_only() {
        let dom = parse(
            "<html><body>\
             <img src=\"x.png\" alt=\"Схема\" class=\"wide\">\
             <input placeholder=\"Имя\" name=\"field\">\
             <a href=\"/x\" title=\"Подробнее\" aria-label=\"Открыть\">ссылка</a>\
             </body></html>",
        );
        let mut collector = TextCollector::new();
        let units = collector.collect_attribute_units(&dom.document);

        let kinds: Vec<&UnitKind> = units.iter().map(|u| &u.kind).collect();
        assert_eq!(units.len(), 4);
        assert!(kinds.contains(&&UnitKind::Attribute("alt".to_string())));
        assert!(kinds.contains(&&UnitKind::Attribute("placeholder".to_string())));
        assert!(kinds.contains(&&UnitKind::Attribute("title".to_string())));
        assert!(kinds.contains(&&UnitKind::Attribute("aria-label".to_string())));
        // src / class / name / href 不在白名单
        assert!(!texts(&units).contains(&"x.png"));
    }

    #[test]
    fn test_meta_units() {
        let dom = parse(
            "<html><head>\
             <meta name=\"description\" content=\"Описание страницы\">\
             <meta property=\"og:description\" content=\"OG описание\">\
             <meta name=\"viewport\" content=\"width=device-width\">\
             <meta name=\"description\" content=\"\">\
             </head><body></body></html>",
        );
        let mut collector = TextCollector::new();
        let units = collector.collect_meta_units(&dom.document);

        assert_eq!(texts(&units), vec!["Описание страницы", "OG описание"]);
        assert!(units.iter().all(|u| u.kind == UnitKind::MetaContent));
    }
}
