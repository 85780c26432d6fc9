//! Header-block heuristics for documents without an explicit header heading.

use crate::ingest::markdown::parse_heading;
use crate::sections::title::HEADER_TITLE;
use crate::sections::{sanitize, ParsedSection, TitleAliases};

const MAX_HEADER_LINES: usize = 4;

pub(crate) const SECTION_KEYWORDS: &[&str] = &[
    "summary",
    "professional summary",
    "objective",
    "profile",
    "experience",
    "work experience",
    "professional experience",
    "employment history",
    "skills",
    "technical skills",
    "education",
    "projects",
    "certifications",
    "awards",
    "volunteer",
    "leadership",
    "publications",
];

const BULLET_STARTS: &[char] = &['-', '*', '•', '●'];
const HEADER_DIVIDERS: &[char] = &['|', ',', '@'];

/// Lines at the top of a document, up to the first blank line after content,
/// the first likely section heading, or [`MAX_HEADER_LINES`].
pub(crate) struct HeaderBlock {
    pub lines: Vec<String>,
    /// Index of the first line not taken by the header.
    pub consumed: usize,
}

pub(crate) fn is_likely_section_heading(line: &str, index: usize) -> bool {
    let collapsed = collapse_whitespace(line);
    let lower = collapsed.to_lowercase();

    if parse_heading(&collapsed).is_some() {
        return true;
    }
    if SECTION_KEYWORDS.iter().any(|k| lower.starts_with(k)) {
        return true;
    }
    if collapsed.starts_with(BULLET_STARTS) {
        return true;
    }
    index > 0 && is_shouting(&collapsed)
}

/// ALL-CAPS line with at least four letters and no contact-style dividers.
pub(crate) fn is_shouting(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 4 && line == line.to_uppercase() && !line.contains(HEADER_DIVIDERS)
}

pub(crate) fn scan_header_block(lines: &[&str]) -> HeaderBlock {
    let mut taken = Vec::new();
    let mut consumed = 0;

    for (i, raw) in lines.iter().enumerate() {
        consumed = i;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if taken.is_empty() {
                continue;
            }
            break;
        }

        let normalized = collapse_whitespace(trimmed);
        if is_likely_section_heading(&normalized, taken.len()) {
            break;
        }

        taken.push(normalized);
        consumed = i + 1;
        if taken.len() >= MAX_HEADER_LINES {
            break;
        }
    }

    HeaderBlock {
        lines: taken,
        consumed,
    }
}

/// `name` on the first line, remaining lines joined with ` • ` on the second.
pub(crate) fn format_header(lines: &[String]) -> Option<String> {
    let cleaned: Vec<String> = lines
        .iter()
        .map(|line| {
            let spaced = line
                .split('|')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" | ");
            collapse_whitespace(&spaced)
        })
        .filter(|line| !line.is_empty())
        .collect();

    let (name, details) = cleaned.split_first()?;
    if details.is_empty() {
        Some(name.clone())
    } else {
        Some(format!("{name}\n{}", details.join(" • ")))
    }
}

/// Builds a header snippet from the first lines of raw text, if they look like one.
pub fn header_snippet_from_text(text: &str) -> Option<String> {
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    format_header(&scan_header_block(&lines).lines)
}

/// Canonicalizes titles, sanitizes snippets, drops empty sections and makes sure a
/// Header section, when one can be found, comes first.
///
/// If the extractor produced no Header, one is synthesized from the top of `raw_text`.
pub fn prepare_for_bank(
    aliases: &TitleAliases,
    sections: Vec<ParsedSection>,
    raw_text: &str,
) -> Vec<ParsedSection> {
    let mut prepared: Vec<ParsedSection> = sections
        .into_iter()
        .map(|section| ParsedSection {
            title: aliases.canonicalize(&section.title),
            snippets: section
                .snippets
                .iter()
                .map(|s| sanitize(s))
                .filter(|s| !s.is_empty())
                .collect(),
        })
        .filter(|section| !section.snippets.is_empty())
        .collect();

    if let Some(index) = prepared.iter().position(|s| aliases.is_header(&s.title)) {
        if index > 0 {
            let header = prepared.remove(index);
            prepared.insert(0, header);
        }
        return prepared;
    }

    let header = header_snippet_from_text(raw_text)
        .map(|snippet| sanitize(&snippet))
        .filter(|snippet| !snippet.is_empty());
    if let Some(snippet) = header {
        prepared.insert(0, ParsedSection::new(HEADER_TITLE, vec![snippet]));
    }
    prepared
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> &'static TitleAliases {
        TitleAliases::builtin()
    }

    #[test]
    fn test_header_snippet_from_contact_block() {
        let text = "Jane   Doe\njane@example.com|555-0100\nAustin, TX\n\nExperience\n- Built";
        assert_eq!(
            header_snippet_from_text(text).as_deref(),
            Some("Jane Doe\njane@example.com | 555-0100 • Austin, TX")
        );
    }

    #[test]
    fn test_header_stops_at_keyword_heading() {
        let text = "Jane Doe\nSkills\nRust";
        assert_eq!(header_snippet_from_text(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_header_stops_at_shouting_line_after_name() {
        let text = "JANE DOE\nEXPERIENCE HIGHLIGHTS\nAcme";
        assert_eq!(header_snippet_from_text(text).as_deref(), Some("JANE DOE"));
    }

    #[test]
    fn test_header_caps_at_four_lines() {
        let text = "a\nb\nc\nd\ne\nf";
        assert_eq!(header_snippet_from_text(text).as_deref(), Some("a\nb • c • d"));
    }

    #[test]
    fn test_no_header_when_document_opens_with_heading() {
        assert_eq!(header_snippet_from_text("## Skills\n- Rust"), None);
        assert_eq!(header_snippet_from_text("- Rust\n- Go"), None);
        assert_eq!(header_snippet_from_text("   \n"), None);
    }

    #[test]
    fn test_prepare_moves_existing_header_first() {
        let sections = vec![
            ParsedSection::new("Skills", vec!["- Rust".into()]),
            ParsedSection::new("Contact Info", vec!["Jane Doe".into()]),
        ];
        let prepared = prepare_for_bank(aliases(), sections, "ignored");
        assert_eq!(prepared[0].title, "Header");
        assert_eq!(prepared[1].snippets, vec!["Rust"]);
    }

    #[test]
    fn test_prepare_synthesizes_header_from_text() {
        let sections = vec![ParsedSection::new("Skills", vec!["Rust".into()])];
        let prepared = prepare_for_bank(aliases(), sections, "Jane Doe\njane@example.com\n\nSkills\nRust");
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].title, "Header");
        assert_eq!(prepared[0].snippets, vec!["Jane Doe\njane@example.com"]);
    }

    #[test]
    fn test_prepare_drops_empty_sections() {
        let sections = vec![
            ParsedSection::new("Skills", vec!["  ".into(), "-".into()]),
            ParsedSection::new("  Projects ", vec!["A compiler".into()]),
        ];
        let prepared = prepare_for_bank(aliases(), sections, "## Projects");
        assert_eq!(prepared, vec![ParsedSection::new("Projects", vec!["A compiler".into()])]);
    }
}
