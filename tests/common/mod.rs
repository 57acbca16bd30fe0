//! 集成测试共享工具
//!
//! 提供桩翻译后端与测试语料生成。

// 各测试二进制只用到部分工具
#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use sitetrans::translation::error::TranslationResult;
use sitetrans::translation::{
    GlossaryStore, TranslationBackend, TranslationClient, TranslationConfig, TranslationService,
};

/// 把输入全部大写的桩后端
pub struct UppercaseBackend;

impl TranslationBackend for UppercaseBackend {
    fn translate_batch(&self, texts: &[String]) -> TranslationResult<Vec<String>> {
        Ok(texts.iter().map(|t| t.to_uppercase()).collect())
    }
}

/// 统计请求次数的大写桩后端
pub struct CountingBackend {
    pub calls: Rc<Cell<usize>>,
}

impl CountingBackend {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl TranslationBackend for CountingBackend {
    fn translate_batch(&self, texts: &[String]) -> TranslationResult<Vec<String>> {
        self.calls.set(self.calls.get() + 1);
        Ok(texts.iter().map(|t| t.to_uppercase()).collect())
    }
}

/// 带占位凭证的测试配置
pub fn test_config() -> TranslationConfig {
    TranslationConfig {
        api_key: "test-key".to_string(),
        folder_id: "test-folder".to_string(),
        ..Default::default()
    }
}

/// 用给定后端装配翻译服务
pub fn test_service(backend: Box<dyn TranslationBackend>) -> TranslationService {
    let client = TranslationClient::new(backend, &test_config());
    TranslationService::new(client, GlossaryStore::empty())
}

/// 写出两页测试语料：根目录一页、嵌套一层一页，外加一个静态资源
pub fn write_corpus(root: &Path) {
    fs::create_dir_all(root.join("docs")).unwrap();

    fs::write(
        root.join("index.html"),
        "<!DOCTYPE html>\n\
         <html lang=\"ru\"><head>\
         <meta charset=\"utf-8\">\
         <meta name=\"description\" content=\"Описание сайта\">\
         <title>Главная</title>\
         </head><body>\
         <h1>Добро пожаловать</h1>\
         <p>Это главная страница.</p>\
         <img src=\"logo.png\" alt=\"Логотип\">\
         <script>var untouched = \"не переводить\";</script>\
         </body></html>\n",
    )
    .unwrap();

    fs::write(
        root.join("docs").join("page.html"),
        "<!DOCTYPE html>\n\
         <html lang=\"ru\"><head>\
         <title>Документация</title>\
         </head><body>\
         <h2>Раздел</h2>\
         <p title=\"Подсказка\">Текст страницы.</p>\
         </body></html>\n",
    )
    .unwrap();

    fs::write(root.join("style.css"), "body { margin: 0; }\n").unwrap();
}
