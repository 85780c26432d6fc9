//! The "produce sections from text" capability.
//!
//! The local heading-driven parser and the remote LLM extractor are interchangeable
//! behind [`SectionExtractor`]; merge and export never know which one ran.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ingest::markdown::{parse_document, ParserOptions};
use crate::ingest::prompts::{SECTION_EXTRACT_PROMPT, SECTION_EXTRACT_SYSTEM};
use crate::llm_client::LlmClient;
use crate::sections::ParsedSection;

/// Keys checked, in order, when the section array arrives wrapped in an object.
const WRAPPER_KEYS: &[&str] = &["sections", "data", "resume", "result", "items"];
const TITLE_KEYS: &[&str] = &["title", "name", "section"];
const SNIPPET_KEYS: &[&str] = &["snippets", "items", "bullets", "entries"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("The provided document is empty")]
    Empty,

    #[error("No sections could be extracted from the document")]
    NoSections,

    #[error("Document could not be read: {0}")]
    Unreadable(String),

    #[error("Extractor call failed: {0}")]
    Llm(String),

    #[error("Extractor returned malformed output: {0}")]
    Malformed(String),
}

/// Which extractor backend the service runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractorKind {
    #[default]
    Markdown,
    Llm,
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "local" => Ok(Self::Markdown),
            "llm" | "ai" => Ok(Self::Llm),
            other => Err(format!("unknown extractor '{other}'")),
        }
    }
}

#[async_trait]
pub trait SectionExtractor: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn extract(&self, raw_text: &str) -> Result<Vec<ParsedSection>, ExtractError>;
}

/// Local structural parser. Deterministic, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExtractor {
    pub options: ParserOptions,
}

#[async_trait]
impl SectionExtractor for MarkdownExtractor {
    fn backend(&self) -> &'static str {
        "markdown"
    }

    async fn extract(&self, raw_text: &str) -> Result<Vec<ParsedSection>, ExtractError> {
        Ok(parse_document(raw_text, self.options))
    }
}

/// Remote extractor. Output is schema-loose and goes through [`coerce_sections`].
pub struct LlmExtractor {
    llm: LlmClient,
}

impl LlmExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SectionExtractor for LlmExtractor {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn extract(&self, raw_text: &str) -> Result<Vec<ParsedSection>, ExtractError> {
        let prompt = SECTION_EXTRACT_PROMPT.replace("{resume_text}", raw_text);
        let value: Value = self
            .llm
            .call_json(&prompt, SECTION_EXTRACT_SYSTEM)
            .await
            .map_err(|e| ExtractError::Llm(e.to_string()))?;

        coerce_sections(&value).ok_or_else(|| {
            ExtractError::Malformed("no array of sections with titles and snippets".to_string())
        })
    }
}

/// Locates an array of section-like objects in `value` (top level, under a wrapper
/// key, or one object level down) and keeps only records with a non-blank title and
/// at least one non-blank snippet string. `None` when nothing usable remains.
pub fn coerce_sections(value: &Value) -> Option<Vec<ParsedSection>> {
    let records = locate_records(value)?;
    let total = records.len();
    let sections: Vec<ParsedSection> = records.iter().filter_map(coerce_record).collect();

    if sections.len() < total {
        warn!(
            "Discarded {} of {} extracted section record(s) without title or snippets",
            total - sections.len(),
            total
        );
    }
    debug!("Coerced {} section(s) from extractor output", sections.len());

    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

fn locate_records(value: &Value) -> Option<&Vec<Value>> {
    if let Some(array) = value.as_array() {
        return Some(array);
    }
    let object = value.as_object()?;

    if let Some(array) = records_in(object) {
        return Some(array);
    }
    object
        .values()
        .filter_map(Value::as_object)
        .find_map(records_in)
}

fn records_in(object: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    WRAPPER_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_array))
        .chain(object.values().filter_map(Value::as_array))
        .find(|array| array.iter().any(Value::is_object))
}

fn coerce_record(record: &Value) -> Option<ParsedSection> {
    let object = record.as_object()?;

    let title = TITLE_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|t| !t.is_empty())?;

    let snippets: Vec<String> = SNIPPET_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_array))
        .next()?
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();

    if snippets.is_empty() {
        return None;
    }
    Some(ParsedSection::new(title, snippets))
}
