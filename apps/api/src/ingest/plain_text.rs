//! Heuristic sectioning for documents that carry no heading markers
//! (text pasted from a word processor or extracted from a PDF).

use crate::ingest::header::{format_header, is_shouting, scan_header_block, SECTION_KEYWORDS};
use crate::ingest::markdown::{list_item_indent, SnippetBuffer, GENERAL_SECTION};
use crate::sections::title::HEADER_TITLE;
use crate::sections::ParsedSection;

const MAX_KEYWORD_HEADING_WORDS: usize = 3;
const MAX_SHOUTING_HEADING_WORDS: usize = 6;

pub(crate) fn parse_plain_text(lines: &[&str]) -> Vec<ParsedSection> {
    let block = scan_header_block(lines);
    let mut sections = Vec::new();
    if let Some(header) = format_header(&block.lines) {
        sections.push(ParsedSection::new(HEADER_TITLE, vec![header]));
    }

    let mut body_open = false;
    let mut buffer = SnippetBuffer::default();

    for line in &lines[block.consumed..] {
        if let Some(title) = body_heading_title(line) {
            if let Some(done) = buffer.take() {
                push_snippet(&mut sections, &mut body_open, done);
            }
            sections.push(ParsedSection::new(title, Vec::new()));
            body_open = true;
            continue;
        }
        if let Some(done) = buffer.push_line(line) {
            push_snippet(&mut sections, &mut body_open, done);
        }
    }
    if let Some(done) = buffer.take() {
        push_snippet(&mut sections, &mut body_open, done);
    }

    sections
}

fn push_snippet(sections: &mut Vec<ParsedSection>, body_open: &mut bool, snippet: String) {
    if !*body_open {
        sections.push(ParsedSection::new(GENERAL_SECTION, Vec::new()));
        *body_open = true;
    }
    if let Some(section) = sections.last_mut() {
        section.snippets.push(snippet);
    }
}

/// A short line naming a well-known résumé section, or a short ALL-CAPS line.
fn body_heading_title(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || list_item_indent(line).is_some() {
        return None;
    }

    let candidate = trimmed.trim_end_matches(':').trim();
    let words = candidate.split_whitespace().count();
    let lower = candidate.to_lowercase();

    let keyword = !candidate.ends_with('.')
        && SECTION_KEYWORDS
            .iter()
            .any(|k| lower == *k || (lower.starts_with(k) && words <= MAX_KEYWORD_HEADING_WORDS));
    let shouting = words <= MAX_SHOUTING_HEADING_WORDS && is_shouting(candidate);

    if keyword || shouting {
        Some(candidate.to_string())
    } else {
        None
    }
}
