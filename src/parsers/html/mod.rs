//! HTML 解析与文档树操作
//!
//! - `dom`: 解析与节点级工具（属性读写、节点构造）
//! - `serializer`: 序列化与 doctype 保留
//! - `metadata`: 语言标注、交叉语言链接与字符集探测

pub mod dom;
pub mod metadata;
pub mod serializer;

pub use dom::{
    append_child, create_element_node, create_text_node, decode_bytes, find_nodes,
    get_child_node_by_name, get_node_attr, get_node_name, html_to_dom, prepend_child,
    remove_children_where, set_node_attr,
};
pub use metadata::{
    annotate_source, annotate_translated, ascent_prefix, get_charset, relative_depth,
    LANG_SWITCH_ATTR,
};
pub use serializer::{capture_doctype, restore_doctype, serialize_document};
