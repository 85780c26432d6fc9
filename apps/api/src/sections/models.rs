use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Nesting bound applied when flattening user-supplied section trees.
pub const MAX_SECTION_DEPTH: usize = 8;

/// One discrete, user-editable text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub content: String,
}

impl Snippet {
    /// A snippet owned by the snippet bank.
    pub fn for_bank(content: impl Into<String>) -> Self {
        Self {
            id: mint_id("bank"),
            content: content.into(),
        }
    }

    /// A snippet owned by a résumé section.
    pub fn for_resume(content: impl Into<String>) -> Self {
        Self {
            id: mint_id("snippet"),
            content: content.into(),
        }
    }
}

/// A résumé section. Sections may nest; the tree is flattened before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Section>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: mint_id("section"),
            title: title.into(),
            snippets: Vec::new(),
            subsections: Vec::new(),
        }
    }
}

/// A section of the snippet bank. Titles are unique under `TitleAliases::key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSection {
    pub title: String,
    pub snippets: Vec<Snippet>,
}

/// Parser output: raw title and raw snippet bodies, not yet sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    pub title: String,
    pub snippets: Vec<String>,
}

impl ParsedSection {
    pub fn new(title: impl Into<String>, snippets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            snippets,
        }
    }
}

pub fn mint_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Flattens a section tree in pre-order: each subsection follows its parent as a sibling.
///
/// Iterative, so malformed deep nesting cannot overflow the stack. Subtrees nested
/// deeper than [`MAX_SECTION_DEPTH`] are dropped. Blank ids are replaced with fresh ones.
pub fn flatten_sections(sections: Vec<Section>) -> Vec<Section> {
    let mut out = Vec::new();
    let mut stack: Vec<(Section, usize)> = sections.into_iter().rev().map(|s| (s, 0)).collect();

    while let Some((mut section, depth)) = stack.pop() {
        let children = std::mem::take(&mut section.subsections);
        if depth + 1 >= MAX_SECTION_DEPTH && !children.is_empty() {
            warn!(
                "Dropping {} subsection(s) of '{}' nested deeper than {MAX_SECTION_DEPTH}",
                children.len(),
                section.title
            );
        } else {
            stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
        }

        if section.id.trim().is_empty() {
            section.id = mint_id("section");
        }
        out.push(section);
    }

    out
}
