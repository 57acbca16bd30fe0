use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

/// 序列化文档；`document_encoding` 非空时按该字符集编码输出
pub fn serialize_document(dom: &RcDom, document_encoding: &str) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())
        .expect("Unable to serialize DOM into buffer");

    if !document_encoding.is_empty() {
        if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.to_vec();
        }
    }

    buf
}

/// 从原始文档开头捕获 doctype 声明
///
/// 只认文件头部的声明，原样截取到第一个 `>` 为止。
pub fn capture_doctype(source: &str) -> Option<String> {
    let trimmed = source.trim_start();
    match trimmed.get(..9) {
        Some(prefix) if prefix.eq_ignore_ascii_case("<!doctype") => trimmed
            .find('>')
            .map(|end| trimmed[..=end].to_string()),
        _ => None,
    }
}

/// 如果解析/序列化往返丢失了 doctype，则重新补回捕获的声明
pub fn restore_doctype(html: String, doctype: Option<&str>) -> String {
    match doctype {
        Some(decl) if !html.trim_start().to_lowercase().starts_with("<!doctype") => {
            format!("{}\n{}", decl, html)
        }
        _ => html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::html_to_dom;

    #[test]
    fn test_serialize_roundtrip_keeps_text() {
        let html = "<html><head></head><body><p>Привет мир</p></body></html>";
        let dom = html_to_dom(html.as_bytes(), "utf-8");
        let out = String::from_utf8(serialize_document(&dom, "")).unwrap();
        assert!(out.contains("Привет мир"));
    }

    #[test]
    fn test_capture_doctype() {
        assert_eq!(
            capture_doctype("<!DOCTYPE html>\n<html></html>").as_deref(),
            Some("<!DOCTYPE html>")
        );
        assert_eq!(
            capture_doctype("  <!doctype html>\n<html></html>").as_deref(),
            Some("<!doctype html>")
        );
        assert_eq!(capture_doctype("<html></html>"), None);
    }

    #[test]
    fn test_restore_doctype_only_when_missing() {
        let restored = restore_doctype("<html></html>".to_string(), Some("<!DOCTYPE html>"));
        assert!(restored.starts_with("<!DOCTYPE html>\n"));

        let untouched = restore_doctype(
            "<!DOCTYPE html><html></html>".to_string(),
            Some("<!DOCTYPE html>"),
        );
        assert_eq!(untouched, "<!DOCTYPE html><html></html>");

        let no_doctype = restore_doctype("<html></html>".to_string(), None);
        assert_eq!(no_doctype, "<html></html>");
    }
}
