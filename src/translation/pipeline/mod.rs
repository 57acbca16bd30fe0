//! 文本处理管道模块
//!
//! 负责从 DOM 收集可翻译单元、划分请求批次、应用术语规则。

pub mod batch;
pub mod collector;
pub mod glossary;

pub use batch::{build_batches, Batch};
pub use collector::{CollectorStats, TextCollector, TextUnit, UnitKind};
pub use glossary::{GlossaryMode, GlossaryRule, GlossaryStore};
