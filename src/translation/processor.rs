//! 翻译结果回写
//!
//! 将译文写回收集时记录的原始位置：第 i 个单元对应第 i 条替换文本。
//! 只改写单元自身的内容，兄弟顺序、周围标记和不可翻译节点保持原样。

use markup5ever_rcdom::NodeData;

use crate::parsers::html::dom::set_node_attr;
use crate::translation::pipeline::collector::{TextUnit, UnitKind};

/// 回写统计信息
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorStats {
    pub text_nodes_updated: usize,
    pub attributes_updated: usize,
    pub meta_updated: usize,
}

/// 翻译回写处理器
#[derive(Default)]
pub struct TranslationProcessor {
    stats: ProcessorStats,
}

impl TranslationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按序回写替换文本
    ///
    /// 替换序列比单元序列短时，缺失位置写入空串——绝不保留过期原文，
    /// 也不因此报错。
    pub fn apply(&mut self, units: &[TextUnit], replacements: &[String]) {
        for (index, unit) in units.iter().enumerate() {
            let new_text = replacements.get(index).map(String::as_str).unwrap_or("");

            match &unit.kind {
                UnitKind::TextRun => {
                    if let NodeData::Text { contents } = &unit.node.data {
                        let mut contents = contents.borrow_mut();
                        contents.clear();
                        contents.push_slice(new_text);
                        self.stats.text_nodes_updated += 1;
                    }
                }
                UnitKind::Attribute(attr_name) => {
                    set_node_attr(&unit.node, attr_name, Some(new_text));
                    self.stats.attributes_updated += 1;
                }
                UnitKind::MetaContent => {
                    set_node_attr(&unit.node, "content", Some(new_text));
                    self.stats.meta_updated += 1;
                }
            }
        }
    }

    pub fn stats(&self) -> &ProcessorStats {
        &self.stats
    }
}
