//! sitetrans 命令行入口
//!
//! 解析参数、装配配置（默认值 < 配置文件 < 环境变量 < 命令行），
//! 校验服务凭证后驱动整个翻译运行。致命错误以非零退出码结束。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sitetrans::core::{run, RunOptions};
use sitetrans::env;
use sitetrans::translation::config::constants;
use sitetrans::translation::{
    CacheStore, GlossaryStore, TranslationClient, TranslationConfig, TranslationService,
    YandexCloudBackend,
};

/// 静态 HTML 站点批量翻译工具
#[derive(Parser, Debug)]
#[command(name = "sitetrans", version, about)]
struct Cli {
    /// 源站点根目录
    #[arg(long, default_value = ".")]
    src: PathBuf,

    /// 输出根目录（默认为源目录下的目标语言子目录）
    #[arg(long)]
    dst: Option<PathBuf>,

    /// 缓存文件路径
    #[arg(long)]
    cache: Option<PathBuf>,

    /// 术语表 CSV 路径
    #[arg(long)]
    glossary: Option<PathBuf>,

    /// 源语言代码
    #[arg(long)]
    source_lang: Option<String>,

    /// 目标语言代码
    #[arg(long)]
    target_lang: Option<String>,

    /// 同时在原地为源语言页面注入交叉语言链接
    #[arg(long, default_value_t = false)]
    modify_source: bool,

    /// 运行前清空输出目录，避免嵌套残留
    #[arg(long, default_value_t = false)]
    clean: bool,

    /// 单批次最大条目数
    #[arg(long)]
    batch_size: Option<usize>,

    /// 单批次最大字符数
    #[arg(long)]
    max_chars: Option<usize>,

    /// 每分钟请求上限
    #[arg(long)]
    requests_per_minute: Option<u32>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(tracing::Level::INFO)
        .init();

    env::load_dotenv();

    let cli = Cli::parse();

    let mut config = match TranslationConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("加载配置失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 命令行参数覆盖
    if let Some(lang) = cli.source_lang {
        config.source_lang = lang;
    }
    if let Some(lang) = cli.target_lang {
        config.target_lang = lang;
    }
    if let Some(size) = cli.batch_size {
        config.batch_size = size;
    }
    if let Some(chars) = cli.max_chars {
        config.max_batch_chars = chars;
    }
    if let Some(rpm) = cli.requests_per_minute {
        config.requests_per_window = rpm;
    }

    if let Err(e) = config.validate() {
        tracing::error!("配置无效: {}", e);
        return ExitCode::FAILURE;
    }

    // 缺失凭证在启动时即失败，不开始遍历
    if let Err(e) = config.validate_credentials() {
        tracing::error!("{}", e);
        return ExitCode::from(2);
    }

    let source_root = cli.src;
    let output_root = cli
        .dst
        .unwrap_or_else(|| source_root.join(&config.target_lang));
    let cache_path = cli.cache.unwrap_or_else(|| {
        source_root.join(".cache").join(format!(
            "{}_{}.json",
            config.source_lang, config.target_lang
        ))
    });
    let glossary_path = cli
        .glossary
        .unwrap_or_else(|| source_root.join(constants::DEFAULT_GLOSSARY_FILE));

    let options = RunOptions {
        source_root,
        output_root,
        cache_path,
        glossary_path,
        annotate_source: cli.modify_source,
        clean_output: cli.clean,
    };

    let backend = match YandexCloudBackend::new(&config) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("初始化翻译后端失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let glossary = GlossaryStore::load(&options.glossary_path);
    if !glossary.is_empty() {
        tracing::info!("术语表: {} 条规则", glossary.len());
    }

    let client = TranslationClient::new(Box::new(backend), &config);
    let mut service = TranslationService::new(client, glossary);
    let mut cache = CacheStore::load(&options.cache_path);

    tracing::info!(
        "开始翻译 {} -> {}: {} => {}",
        config.source_lang,
        config.target_lang,
        options.source_root.display(),
        options.output_root.display()
    );

    match run(&options, &config, &mut service, &mut cache) {
        Ok(summary) => {
            let stats = service.stats();
            tracing::info!(
                "翻译完成: {} 个文档, {} 个资源, 缓存命中 {} / 未命中 {}",
                summary.documents,
                summary.mirrored,
                stats.cache_hits,
                stats.cache_misses
            );
            tracing::info!("报告: {}", summary.report_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("运行中止: {}", e);
            ExitCode::FAILURE
        }
    }
}
