//! Export Serializer: résumé sections -> markdown, plain text, JSON or PDF bytes.
//!
//! Every format works from the same normalized view ([`ExportSection`]). The Header
//! section never prints its own label; its first line becomes the document title.

pub mod font_metrics;
pub mod handlers;
pub mod json;
pub mod markdown;
pub mod pdf;
pub mod text;

use std::str::FromStr;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::sections::models::flatten_sections;
use crate::sections::{Section, TitleAliases};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("No resume content to export")]
    EmptyResume,

    #[error("Unsupported resume export format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF writer failed: {0}")]
    Pdf(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Markdown,
    Text,
    Json,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Markdown,
        ExportFormat::Text,
        ExportFormat::Json,
        ExportFormat::Pdf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown (.md)",
            ExportFormat::Text => "Plain text (.txt)",
            ExportFormat::Json => "JSON (.json)",
            ExportFormat::Pdf => "PDF (.pdf)",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" | "plain-text" => Ok(Self::Text),
            "json" | "structured-data" => Ok(Self::Json),
            "pdf" | "styled-document" => Ok(Self::Pdf),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Entry of the `GET /export/formats` listing.
#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    pub value: ExportFormat,
    pub label: &'static str,
    pub extension: &'static str,
    pub mime_type: &'static str,
}

impl From<ExportFormat> for FormatInfo {
    fn from(format: ExportFormat) -> Self {
        Self {
            value: format,
            label: format.label(),
            extension: format.extension(),
            mime_type: format.mime_type(),
        }
    }
}

/// A section as every serializer sees it: trimmed title, non-blank trimmed items.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSection {
    pub title: String,
    pub items: Vec<String>,
    pub is_header: bool,
}

impl ExportSection {
    /// Header block split into (title line, detail lines). The title loses any
    /// leading `#` markers left over from a markdown source.
    pub fn header_lines(&self) -> Option<(String, Vec<String>)> {
        let mut lines = self
            .items
            .iter()
            .flat_map(|item| item.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let first = lines.next()?;
        let name = first.trim_start_matches('#').trim();
        let name = if name.is_empty() { first } else { name };
        Some((name.to_string(), lines.map(str::to_string).collect()))
    }
}

/// Flattens and trims. Drops sections with neither a title nor any content, and
/// Header sections with no content, since a Header only prints its snippets.
pub fn normalize_sections(aliases: &TitleAliases, sections: &[Section]) -> Vec<ExportSection> {
    flatten_sections(sections.to_vec())
        .into_iter()
        .map(|section| {
            let title = section.title.trim().to_string();
            ExportSection {
                is_header: !title.is_empty() && aliases.is_header(&title),
                items: section
                    .snippets
                    .iter()
                    .map(|s| s.content.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                title,
            }
        })
        .filter(|s| {
            if s.is_header {
                !s.items.is_empty()
            } else {
                !s.title.is_empty() || !s.items.is_empty()
            }
        })
        .collect()
}

pub fn has_exportable_content(aliases: &TitleAliases, sections: &[Section]) -> bool {
    !normalize_sections(aliases, sections).is_empty()
}

pub fn serialize(
    aliases: &TitleAliases,
    sections: &[Section],
    format: ExportFormat,
) -> Result<Bytes, ExportError> {
    if !has_exportable_content(aliases, sections) {
        return Err(ExportError::EmptyResume);
    }
    let normalized = normalize_sections(aliases, sections);

    let bytes = match format {
        ExportFormat::Markdown => Bytes::from(markdown::render(&normalized)),
        ExportFormat::Text => Bytes::from(text::render(&normalized)),
        ExportFormat::Json => Bytes::from(json::render(&normalized)?),
        ExportFormat::Pdf => Bytes::from(pdf::render(&normalized)?),
    };
    Ok(bytes)
}

/// `<base>.<ext>`. A blank base falls back to "resume"; path separators, quotes and
/// control characters are replaced so the name is safe inside a Content-Disposition header.
pub fn file_name(base: &str, format: ExportFormat) -> String {
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let base = if cleaned.is_empty() { "resume" } else { cleaned.as_str() };
    format!("{base}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::Snippet;

    pub(crate) fn export(sections: &[Section], format: ExportFormat) -> Result<Bytes, ExportError> {
        serialize(TitleAliases::builtin(), sections, format)
    }

    pub(crate) fn section(title: &str, snippets: &[&str]) -> Section {
        let mut section = Section::new(title);
        section.snippets = snippets.iter().map(|s| Snippet::for_resume(*s)).collect();
        section
    }

    #[test]
    fn test_format_tokens() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("plain-text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("structured-data".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!(
            "docx".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat("docx".into()))
        );
    }

    #[test]
    fn test_empty_guard_for_every_format() {
        let blank = vec![section("   ", &["  ", ""])];
        for format in ExportFormat::ALL {
            assert_eq!(export(&[], format), Err(ExportError::EmptyResume));
            assert_eq!(export(&blank, format), Err(ExportError::EmptyResume));
        }
        let aliases = TitleAliases::builtin();
        assert!(!has_exportable_content(aliases, &blank));
        assert!(has_exportable_content(aliases, &[section("Skills", &[])]));
    }

    #[test]
    fn test_header_without_snippets_is_not_exportable() {
        let lone_header = vec![section("Contact Info", &["  "])];
        assert!(!has_exportable_content(TitleAliases::builtin(), &lone_header));
        for format in ExportFormat::ALL {
            assert_eq!(export(&lone_header, format), Err(ExportError::EmptyResume));
        }

        let json = export(
            &[section("Header", &[]), section("Skills", &["Rust"])],
            ExportFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["sections"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["sections"][0]["title"], "Skills");
    }

    #[test]
    fn test_normalize_flattens_and_flags_header() {
        let mut parent = section("Experience", &[" Acme "]);
        parent.subsections.push(section("", &["nested"]));
        let normalized = normalize_sections(
            TitleAliases::builtin(),
            &[section("Contact Info", &["Jane"]), parent],
        );
        assert_eq!(normalized.len(), 3);
        assert!(normalized[0].is_header);
        assert!(!normalized[1].is_header);
        assert_eq!(normalized[1].items, vec!["Acme"]);
        assert_eq!(normalized[2].title, "");
    }

    #[test]
    fn test_header_lines_strip_markdown_marker() {
        let header = ExportSection {
            title: "Header".into(),
            items: vec!["# Jane Doe\njane@example.com".into(), "github.com/jane".into()],
            is_header: true,
        };
        let (name, details) = header.header_lines().unwrap();
        assert_eq!(name, "Jane Doe");
        assert_eq!(details, vec!["jane@example.com", "github.com/jane"]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("resume", ExportFormat::Pdf), "resume.pdf");
        assert_eq!(file_name("  ", ExportFormat::Markdown), "resume.md");
        assert_eq!(file_name("a/b\"c", ExportFormat::Text), "a_b_c.txt");
        assert_eq!(file_name("cv\u{1}\tv2\r\n", ExportFormat::Json), "cv__v2.json");
    }
}
