//! Heading-driven document parser.
//!
//! Markdown-style headings (`#` .. `######`) delimit sections. Text above the first
//! section-level heading becomes the `Header` section. Documents without any heading
//! line are handed to the plain-text heuristics in [`super::plain_text`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest::plain_text;
use crate::sections::title::{HEADER_TITLE, UNTITLED_SECTION};
use crate::sections::ParsedSection;

/// Title of the catch-all section.
pub const GENERAL_SECTION: &str = "General";

/// What a level-1 heading means before any section has started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level1Heading {
    /// `# Jane Doe` is the document title and belongs to the Header block;
    /// sections start at level 2.
    #[default]
    JoinsHeader,
    /// `# Skills` starts a section of its own; level 2 headings do too.
    StartsSection,
}

impl FromStr for Level1Heading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" | "joins_header" => Ok(Self::JoinsHeader),
            "section" | "starts_section" => Ok(Self::StartsSection),
            other => Err(format!("unknown level-1 heading mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    pub level1_heading: Level1Heading,
}

/// Converts raw document text into ordered `(title, snippets)` pairs.
///
/// Never fails: a non-empty document that yields no section comes back as a single
/// `General` section holding the whole trimmed text.
pub fn parse_document(text: &str, options: ParserOptions) -> Vec<ParsedSection> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let sections = if lines.iter().any(|line| parse_heading(line).is_some()) {
        HeadingParser::new(options).run(&lines)
    } else {
        debug!("No heading markers found, using plain-text heuristics");
        plain_text::parse_plain_text(&lines)
    };

    if sections.is_empty() && !text.trim().is_empty() {
        debug!("Parser produced no sections, falling back to '{GENERAL_SECTION}'");
        return vec![ParsedSection::new(
            GENERAL_SECTION,
            vec![text.trim().to_string()],
        )];
    }
    sections
}

/// Returns `(level, text)` for `#{1,6}` followed by whitespace or end of line.
/// A bare `##` is a heading with blank text.
pub(crate) fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end();
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

/// Returns the indent of a list item line (`-`, `*`, `+`, `•`, `●`, `1.`, `1)`).
pub(crate) fn list_item_indent(line: &str) -> Option<usize> {
    let body = line.trim_start();
    let indent = line.len() - body.len();
    let mut chars = body.chars();
    let first = chars.next()?;

    let after = match first {
        '•' | '●' => return Some(indent),
        '-' | '*' | '+' => chars.as_str(),
        d if d.is_ascii_digit() => {
            let rest = body.trim_start_matches(|c: char| c.is_ascii_digit());
            rest.strip_prefix('.')
                .or_else(|| rest.strip_prefix(')'))?
        }
        _ => return None,
    };

    if after.starts_with(char::is_whitespace) {
        Some(indent)
    } else {
        None
    }
}

fn leading_indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Accumulates body lines into snippets.
///
/// A blank line ends the snippet. A list item starts a new snippet unless it is
/// indented deeper than the item that opened the current one.
#[derive(Debug, Default)]
pub(crate) struct SnippetBuffer {
    lines: Vec<String>,
    list_indent: Option<usize>,
}

impl SnippetBuffer {
    /// Feeds one line; returns the snippet it completed, if any.
    pub(crate) fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return self.take();
        }

        if let Some(indent) = list_item_indent(line) {
            if self.list_indent.is_some_and(|open| indent > open) {
                self.lines.push(line.to_string());
                return None;
            }
            let done = self.take();
            self.lines.push(line.to_string());
            self.list_indent = Some(indent);
            return done;
        }

        match self.list_indent {
            Some(open) if leading_indent(line) > open => {
                self.lines.push(line.to_string());
                None
            }
            Some(_) => {
                let done = self.take();
                self.lines.push(line.to_string());
                done
            }
            None => {
                self.lines.push(line.to_string());
                None
            }
        }
    }

    /// Ends the current snippet and begins a new one with `line`.
    pub(crate) fn start_with(&mut self, line: &str) -> Option<String> {
        let done = self.take();
        self.lines.push(line.trim_end().to_string());
        done
    }

    /// Flushes the buffer, trimmed of blank leading/trailing lines.
    pub(crate) fn take(&mut self) -> Option<String> {
        self.list_indent = None;
        let lines = std::mem::take(&mut self.lines);
        let trimmed = trim_blank_edges(&lines);
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.join("\n"))
        }
    }
}

pub(crate) fn trim_blank_edges(lines: &[String]) -> &[String] {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end.max(start)]
}

struct HeadingParser {
    options: ParserOptions,
    sections: Vec<ParsedSection>,
    buffer: SnippetBuffer,
    header_lines: Vec<String>,
    capturing_header: bool,
    header_added: bool,
    base_level: Option<usize>,
}

impl HeadingParser {
    fn new(options: ParserOptions) -> Self {
        Self {
            options,
            sections: Vec::new(),
            buffer: SnippetBuffer::default(),
            header_lines: Vec::new(),
            capturing_header: true,
            header_added: false,
            base_level: None,
        }
    }

    fn run(mut self, lines: &[&str]) -> Vec<ParsedSection> {
        for raw in lines {
            let line = raw.trim_end();
            match parse_heading(line) {
                Some((level, text)) if self.capturing_header => {
                    self.header_heading(line, level, text)
                }
                Some((level, text)) => self.body_heading(line, level, text),
                None if self.capturing_header => self.header_lines.push(line.to_string()),
                None => {
                    if let Some(done) = self.buffer.push_line(line) {
                        self.push_snippet(done);
                    }
                }
            }
        }

        self.add_header();
        self.flush_snippet();
        self.sections
    }

    fn header_heading(&mut self, line: &str, level: usize, text: &str) {
        match self.base_level {
            None if level == 1 => {
                self.base_level = Some(2);
                match self.options.level1_heading {
                    Level1Heading::JoinsHeader => self.header_lines.push(line.to_string()),
                    Level1Heading::StartsSection => self.start_section(text),
                }
            }
            None => {
                self.base_level = Some(level);
                self.start_section(text);
            }
            Some(base) if level <= base => self.start_section(text),
            Some(_) => self.header_lines.push(line.to_string()),
        }
    }

    fn body_heading(&mut self, line: &str, level: usize, text: &str) {
        let base = *self.base_level.get_or_insert(level);
        if level <= base {
            self.start_section(text);
        } else {
            if self.sections.is_empty() {
                self.start_section(GENERAL_SECTION);
            }
            if let Some(done) = self.buffer.start_with(line) {
                self.push_snippet(done);
            }
        }
    }

    fn start_section(&mut self, title: &str) {
        self.add_header();
        self.flush_snippet();
        let title = match title.trim() {
            "" => UNTITLED_SECTION,
            t => t,
        };
        self.sections.push(ParsedSection::new(title, Vec::new()));
    }

    fn add_header(&mut self) {
        if !self.header_added {
            let lines = std::mem::take(&mut self.header_lines);
            let trimmed = trim_blank_edges(&lines);
            if !trimmed.is_empty() {
                self.sections
                    .push(ParsedSection::new(HEADER_TITLE, vec![trimmed.join("\n")]));
            }
            self.header_added = true;
        }
        self.capturing_header = false;
    }

    fn flush_snippet(&mut self) {
        if let Some(done) = self.buffer.take() {
            self.push_snippet(done);
        }
    }

    fn push_snippet(&mut self, snippet: String) {
        if self.sections.is_empty() {
            self.sections.push(ParsedSection::new(GENERAL_SECTION, Vec::new()));
        }
        if let Some(section) = self.sections.last_mut() {
            section.snippets.push(snippet);
        }
    }
}
