//! 文档解析器模块
//!
//! 当前仅包含 HTML 解析器；整个流水线围绕 HTML 文档树工作。

pub mod html;
