use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use markup5ever_rcdom::RcDom;
use walkdir::WalkDir;

use crate::parsers::html::{
    annotate_source, annotate_translated, capture_doctype, decode_bytes, get_charset, html_to_dom,
    restore_doctype, serialize_document,
};
use crate::translation::config::constants;
use crate::translation::config::TranslationConfig;
use crate::translation::error::TranslationError;
use crate::translation::pipeline::collector::{TextCollector, TextUnit};
use crate::translation::pipeline::glossary::csv_escape;
use crate::translation::processor::TranslationProcessor;
use crate::translation::storage::cache::CacheStore;
use crate::translation::DocumentTexts;
use crate::translation::TranslationService;

/// Represents errors that can occur while processing a corpus
///
/// This error type encapsulates all possible errors that can occur
/// when running the translation pipeline over a document tree.
#[derive(Debug)]
pub struct SitetransError {
    details: String,
}

impl SitetransError {
    /// Creates a new SitetransError with the given message
    pub fn new(msg: &str) -> SitetransError {
        SitetransError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for SitetransError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for SitetransError {}

impl From<std::io::Error> for SitetransError {
    fn from(error: std::io::Error) -> Self {
        SitetransError::new(&error.to_string())
    }
}

impl From<TranslationError> for SitetransError {
    fn from(error: TranslationError) -> Self {
        SitetransError::new(&error.to_string())
    }
}

/// Configuration options for a translation run
///
/// Paths are taken as provided; the output root is excluded from the
/// source walk to prevent recursive nesting on reruns.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub cache_path: PathBuf,
    pub glossary_path: PathBuf,
    /// Also annotate source-locale documents in place
    pub annotate_source: bool,
    /// Remove the output root before running
    pub clean_output: bool,
}

/// One row of the run report
#[derive(Clone, Debug)]
pub struct DocumentRecord {
    pub rel_path: String,
    pub source_path: String,
    pub dest_path: String,
    pub text_units: usize,
    pub attr_units: usize,
    pub meta_units: usize,
}

/// Ordered per-document records, written once at the end of a run
#[derive(Debug, Default)]
pub struct RunReport {
    records: Vec<DocumentRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DocumentRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// Writes the report as CSV with a header row
    pub fn write_csv(&self, path: &Path) -> Result<(), SitetransError> {
        let mut out = String::from("rel_path,src,dst,text_nodes,attr_texts,meta_texts\n");
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_escape(&record.rel_path),
                csv_escape(&record.source_path),
                csv_escape(&record.dest_path),
                record.text_units,
                record.attr_units,
                record.meta_units
            ));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, out)?;
        Ok(())
    }
}

/// Outcome of mirroring one non-document file
///
/// Mirroring is best-effort: a single unreadable file is recorded and
/// skipped, it never aborts the walk.
#[derive(Clone, Debug)]
pub enum MirrorOutcome {
    Copied(PathBuf),
    Skipped { path: PathBuf, reason: String },
}

/// Totals for a completed run
#[derive(Debug)]
pub struct RunSummary {
    pub documents: usize,
    pub mirrored: usize,
    pub skipped: usize,
    pub cache_entries: usize,
    pub report_path: PathBuf,
    pub mirror_outcomes: Vec<MirrorOutcome>,
}

/// Runs the full pipeline over the source corpus
///
/// Documents are processed one at a time in deterministic traversal order;
/// non-document files are mirrored byte-for-byte. The run report is written
/// into the output root and the cache is persisted before returning.
pub fn run(
    options: &RunOptions,
    config: &TranslationConfig,
    service: &mut TranslationService,
    cache: &mut CacheStore,
) -> Result<RunSummary, SitetransError> {
    if options.clean_output && options.output_root.exists() {
        tracing::info!("清理输出目录: {}", options.output_root.display());
        fs::remove_dir_all(&options.output_root)?;
    }

    let mut report = RunReport::new();
    let mut mirror_outcomes: Vec<MirrorOutcome> = Vec::new();

    let walker = WalkDir::new(&options.source_root).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("目录遍历跳过一项: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        // Never traverse anything already under the output root
        if path.starts_with(&options.output_root) {
            continue;
        }

        let rel_path = match normalized_rel_path(path, &options.source_root) {
            Some(rel) => rel,
            None => continue,
        };

        if is_html_file(path) {
            if options.annotate_source {
                annotate_source_file(path, &rel_path, config)?;
            }

            let dest_path = options.output_root.join(rel_path.replace('/', std::path::MAIN_SEPARATOR_STR));
            let record = process_document(path, &dest_path, &rel_path, config, service, cache)?;
            tracing::info!(
                "已翻译 {} ({} 文本 / {} 属性 / {} 元描述)",
                rel_path,
                record.text_units,
                record.attr_units,
                record.meta_units
            );
            report.push(record);
        } else {
            let dest_path = options.output_root.join(rel_path.replace('/', std::path::MAIN_SEPARATOR_STR));
            match mirror_file(path, &dest_path) {
                Ok(()) => mirror_outcomes.push(MirrorOutcome::Copied(path.to_path_buf())),
                Err(e) => {
                    tracing::warn!("镜像文件失败，已跳过 {}: {}", path.display(), e);
                    mirror_outcomes.push(MirrorOutcome::Skipped {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    let report_path = options.output_root.join(constants::REPORT_FILE_NAME);
    report.write_csv(&report_path)?;
    cache.persist()?;

    let mirrored = mirror_outcomes
        .iter()
        .filter(|o| matches!(o, MirrorOutcome::Copied(_)))
        .count();
    let skipped = mirror_outcomes.len() - mirrored;

    let summary = RunSummary {
        documents: report.len(),
        mirrored,
        skipped,
        cache_entries: cache.len(),
        report_path,
        mirror_outcomes,
    };

    tracing::info!(
        "运行完成于 {}: {} 个文档, {} 个资源已镜像, {} 个跳过",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        summary.documents,
        summary.mirrored,
        summary.skipped
    );

    Ok(summary)
}

/// Translates one HTML document into the output tree
fn process_document(
    source_path: &Path,
    dest_path: &Path,
    rel_path: &str,
    config: &TranslationConfig,
    service: &mut TranslationService,
    cache: &mut CacheStore,
) -> Result<DocumentRecord, SitetransError> {
    let data = fs::read(source_path)?;
    let (dom, encoding) = parse_with_charset(&data);
    let doctype = capture_doctype(&decode_bytes(&data, &encoding));

    let mut collector = TextCollector::new();
    let text_units = collector.collect_text_units(&dom.document);
    let attr_units = collector.collect_attribute_units(&dom.document);
    let meta_units = collector.collect_meta_units(&dom.document);

    let texts = DocumentTexts {
        text_runs: service.apply_pre_glossary(&unit_texts(&text_units)),
        attributes: service.apply_pre_glossary(&unit_texts(&attr_units)),
        meta: service.apply_pre_glossary(&unit_texts(&meta_units)),
    };

    let resolved = service.translate_document(&texts, cache)?;

    let mut processor = TranslationProcessor::new();
    processor.apply(&text_units, &resolved.text_runs);
    processor.apply(&attr_units, &resolved.attributes);
    processor.apply(&meta_units, &resolved.meta);

    annotate_translated(&dom, rel_path, config);

    write_document(&dom, doctype.as_deref(), dest_path)?;

    Ok(DocumentRecord {
        rel_path: rel_path.to_string(),
        source_path: source_path.display().to_string(),
        dest_path: dest_path.display().to_string(),
        text_units: text_units.len(),
        attr_units: attr_units.len(),
        meta_units: meta_units.len(),
    })
}

/// Annotates a source-locale document in place
fn annotate_source_file(
    source_path: &Path,
    rel_path: &str,
    config: &TranslationConfig,
) -> Result<(), SitetransError> {
    let data = fs::read(source_path)?;
    let (dom, encoding) = parse_with_charset(&data);
    let doctype = capture_doctype(&decode_bytes(&data, &encoding));

    annotate_source(&dom, rel_path, config);

    write_document(&dom, doctype.as_deref(), source_path)
}

/// Parses HTML bytes, honoring a meta-declared charset when present
fn parse_with_charset(data: &[u8]) -> (RcDom, String) {
    let dom = html_to_dom(data, "utf-8");

    if let Some(charset) = get_charset(&dom.document) {
        if !charset.eq_ignore_ascii_case("utf-8") {
            let reparsed = html_to_dom(data, &charset);
            return (reparsed, charset);
        }
    }

    (dom, "utf-8".to_string())
}

/// Serializes the document and writes it as UTF-8, re-prepending a
/// doctype the parse/serialize round-trip may have dropped
fn write_document(dom: &RcDom, doctype: Option<&str>, path: &Path) -> Result<(), SitetransError> {
    let html = String::from_utf8_lossy(&serialize_document(dom, "")).to_string();
    let html = restore_doctype(html, doctype);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}

fn unit_texts(units: &[TextUnit]) -> Vec<String> {
    units.iter().map(|unit| unit.text.clone()).collect()
}

/// Checks whether a path looks like an HTML document
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lowered = ext.to_lowercase();
            constants::HTML_EXTENSIONS.iter().any(|e| *e == lowered)
        })
        .unwrap_or(false)
}

/// Relative path with forward-slash separators, as used in reports and links
fn normalized_rel_path(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(|rel| {
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    })
}

/// Mirrors one non-document file byte-for-byte
fn mirror_file(source: &Path, dest: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)?;
    Ok(())
}
