//! 翻译管道端到端测试
//!
//! 用大写桩后端跑完整的两页语料，验证可见文本被翻译、
//! 不可翻译内容原样保留、双向交叉语言链接一致、报告行正确。

mod common;

use std::fs;

use common::{test_config, test_service, write_corpus, UppercaseBackend};
use sitetrans::core::{run, RunOptions};
use sitetrans::translation::CacheStore;

fn run_corpus(annotate_source: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("site");
    fs::create_dir_all(&src).unwrap();
    write_corpus(&src);

    let config = test_config();
    let options = RunOptions {
        source_root: src.clone(),
        output_root: src.join(&config.target_lang),
        cache_path: dir.path().join("cache.json"),
        glossary_path: dir.path().join("glossary.csv"),
        annotate_source,
        clean_output: false,
    };

    let mut service = test_service(Box::new(UppercaseBackend));
    let mut cache = CacheStore::load(&options.cache_path);

    let summary = run(&options, &config, &mut service, &mut cache).unwrap();
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.mirrored, 1);
    assert_eq!(summary.skipped, 0);

    dir
}

#[test]
fn test_visible_text_translated_markup_preserved() {
    let dir = run_corpus(true);
    let out = fs::read_to_string(dir.path().join("site/uz/index.html")).unwrap();

    // 可见文本全部大写
    assert!(out.contains("ДОБРО ПОЖАЛОВАТЬ"));
    assert!(out.contains("ЭТО ГЛАВНАЯ СТРАНИЦА."));
    assert!(out.contains("<title>ГЛАВНАЯ</title>"));

    // 脚本内容与不可翻译属性原样保留
    assert!(out.contains("var untouched = \"не переводить\";"));
    assert!(out.contains("src=\"logo.png\""));

    // 白名单属性与 meta 描述被翻译
    assert!(out.contains("alt=\"ЛОГОТИП\""));
    assert!(out.contains("content=\"ОПИСАНИЕ САЙТА\""));

    // doctype 保留在文件开头
    assert!(out.trim_start().to_lowercase().starts_with("<!doctype"));

    // 根元素语言切换到目标语言
    assert!(out.contains("lang=\"uz\""));
}

#[test]
fn test_alternate_links_mutually_consistent() {
    let dir = run_corpus(true);

    // 翻译输出页指回源页：深度 0 上溯一层
    let translated = fs::read_to_string(dir.path().join("site/uz/index.html")).unwrap();
    assert!(translated.contains("hreflang=\"ru\""));
    assert!(translated.contains("href=\"../index.html\""));

    // 源页指向译文
    let source = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert!(source.contains("hreflang=\"uz\""));
    assert!(source.contains("href=\"uz/index.html\""));
    // 源页语言属性保留
    assert!(source.contains("lang=\"ru\""));

    // 嵌套一层的文档：译文上溯两层，源页上溯一层再进语言子目录
    let nested_translated =
        fs::read_to_string(dir.path().join("site/uz/docs/page.html")).unwrap();
    assert!(nested_translated.contains("href=\"../../docs/page.html\""));

    let nested_source = fs::read_to_string(dir.path().join("site/docs/page.html")).unwrap();
    assert!(nested_source.contains("href=\"../uz/docs/page.html\""));
}

#[test]
fn test_switcher_controls_injected_once() {
    let dir = run_corpus(true);

    let translated = fs::read_to_string(dir.path().join("site/uz/index.html")).unwrap();
    assert_eq!(translated.matches("data-lang-switch").count(), 1);
    assert!(translated.contains(">Русский</a>"));

    let source = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert_eq!(source.matches("data-lang-switch").count(), 1);
    assert!(source.contains(">O'zbekcha</a>"));
}

#[test]
fn test_run_report_rows_and_counts() {
    let dir = run_corpus(true);
    let report = fs::read_to_string(dir.path().join("site/uz/translation_report.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(
        lines[0],
        "rel_path,src,dst,text_nodes,attr_texts,meta_texts"
    );
    // 两个文档各一行，排序后的遍历顺序：docs/page.html 在前
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("docs/page.html,"));
    assert!(lines[2].starts_with("index.html,"));

    // docs/page.html: title + h2 + p + 注入的切换控件文案 = 4 个文本段，
    // 1 个 title 属性，0 个 meta 描述
    assert!(lines[1].ends_with(",4,1,0"));
    // index.html: title + h1 + p + 切换控件文案 = 4，alt = 1，description = 1
    assert!(lines[2].ends_with(",4,1,1"));
}

#[test]
fn test_assets_mirrored_byte_for_byte() {
    let dir = run_corpus(false);
    let original = fs::read(dir.path().join("site/style.css")).unwrap();
    let mirrored = fs::read(dir.path().join("site/uz/style.css")).unwrap();
    assert_eq!(original, mirrored);
}

#[test]
fn test_output_root_excluded_from_walk() {
    let dir = run_corpus(false);
    // 输出目录里不能出现 uz/uz 嵌套
    assert!(!dir.path().join("site/uz/uz").exists());
}
