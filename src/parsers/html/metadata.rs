//! 文档语言标注
//!
//! 负责交叉语言链接元数据：根元素 `lang` 属性、`<link rel="alternate">`
//! 头部链接、页内语言切换控件，以及嵌套文档的相对路径计算。
//! 两个角色（翻译输出页 / 源语言页）的注入都是幂等的：
//! 重复运行会先移除上一次注入的链接与控件。

use markup5ever_rcdom::{Handle, RcDom};

use crate::parsers::html::dom::{
    append_child, create_element_node, create_text_node, find_nodes, get_child_node_by_name,
    get_node_attr, get_node_name, prepend_child, remove_children_where,
};
use crate::translation::config::TranslationConfig;

/// 标记已注入语言切换控件的属性
pub const LANG_SWITCH_ATTR: &str = "data-lang-switch";

/// 切换控件的固定样式，沿用站点无关的浮动角标外观
const SWITCHER_STYLE: &str = "position:fixed;bottom:12px;right:12px;z-index:9999;\
font-family:inherit;font-size:13px;background:#fff;border:1px solid #ddd;\
border-radius:6px;padding:6px 10px;box-shadow:0 2px 8px rgba(0,0,0,0.08)";

/// 相对路径的目录深度（路径分隔符个数）
pub fn relative_depth(rel_path: &str) -> usize {
    rel_path.matches('/').count()
}

/// 生成上溯前缀：`../` 重复 `levels` 次
pub fn ascent_prefix(levels: usize) -> String {
    "../".repeat(levels)
}

/// 从 meta 标签探测文档字符集
pub fn get_charset(root: &Handle) -> Option<String> {
    for meta in find_nodes(root, "meta") {
        if let Some(charset) = get_node_attr(&meta, "charset") {
            if !charset.trim().is_empty() {
                return Some(charset.trim().to_string());
            }
        }

        // 旧式 <meta http-equiv="content-type" content="text/html; charset=...">
        if let Some(http_equiv) = get_node_attr(&meta, "http-equiv") {
            if http_equiv.eq_ignore_ascii_case("content-type") {
                if let Some(content) = get_node_attr(&meta, "content") {
                    if let Some(pos) = content.to_lowercase().find("charset=") {
                        let charset = content[pos + "charset=".len()..]
                            .trim()
                            .trim_matches(|c| c == '"' || c == '\'' || c == ';')
                            .to_string();
                        if !charset.is_empty() {
                            return Some(charset);
                        }
                    }
                }
            }
        }
    }
    None
}

/// 翻译输出页角色：设置目标语言、注入指回源文档的链接与控件
///
/// 输出树嵌套在语言子目录下一层，所以上溯层数是 depth + 1。
pub fn annotate_translated(dom: &RcDom, rel_path: &str, config: &TranslationConfig) {
    let html = ensure_html(dom);
    let head = ensure_head(&html);
    let body = ensure_body(&html);

    remove_language_annotations(&head, &body);

    crate::parsers::html::dom::set_node_attr(&html, "lang", Some(config.target_lang.as_str()));

    let up_levels = ascent_prefix(relative_depth(rel_path) + 1);
    let href = format!("{}{}", up_levels, rel_path);

    inject_alternate_link(&head, &config.source_lang, &href);
    inject_switcher(&body, &href, &config.source_lang, &config.source_label);
}

/// 源语言页角色：保留既有语言属性、注入指向译文的链接与控件
pub fn annotate_source(dom: &RcDom, rel_path: &str, config: &TranslationConfig) {
    let html = ensure_html(dom);
    let head = ensure_head(&html);
    let body = ensure_body(&html);

    remove_language_annotations(&head, &body);

    if get_node_attr(&html, "lang").map_or(true, |lang| lang.trim().is_empty()) {
        crate::parsers::html::dom::set_node_attr(&html, "lang", Some(config.source_lang.as_str()));
    }

    let up_levels = ascent_prefix(relative_depth(rel_path));
    let href = format!("{}{}/{}", up_levels, config.target_lang, rel_path);

    inject_alternate_link(&head, &config.target_lang, &href);
    inject_switcher(&body, &href, &config.target_lang, &config.target_label);
}

/// 缺失 html 根时合成最小结构
fn ensure_html(dom: &RcDom) -> Handle {
    match get_child_node_by_name(&dom.document, "html") {
        Some(html) => html,
        None => {
            let html = create_element_node("html", &[]);
            append_child(&dom.document, &html);
            html
        }
    }
}

fn ensure_head(html: &Handle) -> Handle {
    match get_child_node_by_name(html, "head") {
        Some(head) => head,
        None => {
            let head = create_element_node("head", &[]);
            prepend_child(html, &head);
            head
        }
    }
}

fn ensure_body(html: &Handle) -> Handle {
    match get_child_node_by_name(html, "body") {
        Some(body) => body,
        None => {
            let body = create_element_node("body", &[]);
            append_child(html, &body);
            body
        }
    }
}

/// 移除上一次注入的交叉语言链接与切换控件
///
/// 翻译输出页由已标注的源页生成，其中可能带着源页注入的控件副本，
/// 所以两个角色统一清理两个方向的残留。
fn remove_language_annotations(head: &Handle, body: &Handle) {
    remove_children_where(head, is_alternate_language_link);
    remove_children_where(body, |child| {
        get_node_attr(child, LANG_SWITCH_ATTR).is_some()
    });
}

fn is_alternate_language_link(node: &Handle) -> bool {
    if get_node_name(node) != Some("link") {
        return false;
    }

    let is_alternate = get_node_attr(node, "rel")
        .map(|rel| {
            rel.split_whitespace()
                .any(|part| part.eq_ignore_ascii_case("alternate"))
        })
        .unwrap_or(false);

    is_alternate && get_node_attr(node, "hreflang").is_some()
}

fn inject_alternate_link(head: &Handle, hreflang: &str, href: &str) {
    let link = create_element_node(
        "link",
        &[("rel", "alternate"), ("hreflang", hreflang), ("href", href)],
    );
    append_child(head, &link);
}

fn inject_switcher(body: &Handle, href: &str, hreflang: &str, label: &str) {
    let container = create_element_node("div", &[(LANG_SWITCH_ATTR, ""), ("style", SWITCHER_STYLE)]);
    let link = create_element_node("a", &[("href", href), ("hreflang", hreflang)]);
    append_child(&link, &create_text_node(label));
    append_child(&container, &link);
    append_child(body, &container);
}
