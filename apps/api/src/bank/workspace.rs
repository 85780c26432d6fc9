//! In-memory session: the snippet bank plus the résumé being assembled.
//!
//! Snippets moving between the two containers are copied under a fresh id, never
//! shared, so editing a résumé snippet cannot touch the bank original.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::bank::merge::{merge, pin_header_first};
use crate::sections::models::{flatten_sections, mint_id};
use crate::sections::title::header_key;
use crate::sections::{sanitize, BankSection, ParsedSection, Section, Snippet, TitleAliases};

const NEW_SECTION_TITLE: &str = "New Section";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    #[error("Snippet content is empty after cleanup")]
    EmptyContent,
}

/// Outcome of one import, returned to the caller for user messaging.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub added_sections: usize,
    pub added_snippets: usize,
    pub bank: Vec<BankSection>,
    pub imported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    aliases: TitleAliases,
    bank: Vec<BankSection>,
    resume: Vec<Section>,
}

impl Workspace {
    pub fn new(aliases: TitleAliases) -> Self {
        Self {
            aliases,
            bank: Vec::new(),
            resume: Vec::new(),
        }
    }

    pub fn aliases(&self) -> &TitleAliases {
        &self.aliases
    }

    pub fn bank(&self) -> &[BankSection] {
        &self.bank
    }

    pub fn resume(&self) -> &[Section] {
        &self.resume
    }

    /// Merges prepared sections into the bank.
    pub fn apply_import(&mut self, incoming: &[ParsedSection]) -> ImportReport {
        let result = merge(&self.aliases, &self.bank, incoming);
        self.bank = result.bank;
        ImportReport {
            added_sections: result.added_sections,
            added_snippets: result.added_snippets,
            bank: self.bank.clone(),
            imported_at: Utc::now(),
        }
    }

    /// Moves a bank snippet into the résumé section with the same title key,
    /// creating that section when needed. Empty bank sections are dropped.
    pub fn place_snippet(
        &mut self,
        bank_section_title: &str,
        snippet_id: &str,
    ) -> Result<Snippet, WorkspaceError> {
        let key = self.aliases.key(bank_section_title);
        let bank_at = self
            .bank
            .iter()
            .position(|s| self.aliases.key(&s.title) == key)
            .ok_or_else(|| WorkspaceError::SectionNotFound(bank_section_title.to_string()))?;
        let snippet_at = self.bank[bank_at]
            .snippets
            .iter()
            .position(|s| s.id == snippet_id)
            .ok_or_else(|| WorkspaceError::SnippetNotFound(snippet_id.to_string()))?;

        let title = self.bank[bank_at].title.clone();
        let banked = self.bank[bank_at].snippets.remove(snippet_at);
        if self.bank[bank_at].snippets.is_empty() {
            self.bank.remove(bank_at);
        }

        let placed = Snippet::for_resume(banked.content);
        let aliases = &self.aliases;
        match self.resume.iter().position(|s| aliases.key(&s.title) == key) {
            Some(at) => self.resume[at].snippets.push(placed.clone()),
            None => {
                let mut section = Section::new(title);
                section.snippets.push(placed.clone());
                self.resume.push(section);
                self.pin_resume_header();
            }
        }
        Ok(placed)
    }

    /// Removes a snippet from the résumé and re-banks its content under the owning
    /// section's title. Returns whether the bank gained a snippet (false on duplicate).
    pub fn return_snippet(&mut self, snippet_id: &str) -> Result<bool, WorkspaceError> {
        let (section_at, snippet_at) = self.locate_snippet(snippet_id)?;
        let section = &mut self.resume[section_at];
        let removed = section.snippets.remove(snippet_at);
        let incoming = ParsedSection::new(section.title.clone(), vec![removed.content]);

        let result = merge(&self.aliases, &self.bank, &[incoming]);
        self.bank = result.bank;
        Ok(result.added_snippets > 0)
    }

    pub fn add_section(&mut self, title: Option<&str>) -> Section {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => self.aliases.canonicalize(t),
            _ => NEW_SECTION_TITLE.to_string(),
        };
        let section = Section::new(title);
        self.resume.push(section.clone());
        self.pin_resume_header();
        section
    }

    pub fn remove_section(&mut self, section_id: &str) -> Result<Section, WorkspaceError> {
        let at = self.section_index(section_id)?;
        Ok(self.resume.remove(at))
    }

    pub fn rename_section(
        &mut self,
        section_id: &str,
        title: &str,
    ) -> Result<Section, WorkspaceError> {
        let at = self.section_index(section_id)?;
        self.resume[at].title = self.aliases.canonicalize(title);
        let renamed = self.resume[at].clone();
        self.pin_resume_header();
        Ok(renamed)
    }

    /// Reorders a résumé section. The index is clamped; a Header section stays first.
    pub fn move_section(&mut self, section_id: &str, to_index: usize) -> Result<(), WorkspaceError> {
        let from = self.section_index(section_id)?;
        let section = self.resume.remove(from);
        let to = to_index.min(self.resume.len());
        self.resume.insert(to, section);
        self.pin_resume_header();
        Ok(())
    }

    /// Replaces a snippet's content with its sanitized form.
    pub fn update_snippet(
        &mut self,
        snippet_id: &str,
        content: &str,
    ) -> Result<Snippet, WorkspaceError> {
        let cleaned = sanitize(content);
        if cleaned.is_empty() {
            return Err(WorkspaceError::EmptyContent);
        }
        let (section_at, snippet_at) = self.locate_snippet(snippet_id)?;
        let snippet = &mut self.resume[section_at].snippets[snippet_at];
        snippet.content = cleaned;
        Ok(snippet.clone())
    }

    /// Moves a résumé snippet within or across sections. The index is clamped.
    pub fn move_snippet(
        &mut self,
        snippet_id: &str,
        to_section_id: &str,
        to_index: usize,
    ) -> Result<(), WorkspaceError> {
        let to_section = self.section_index(to_section_id)?;
        let (section_at, snippet_at) = self.locate_snippet(snippet_id)?;
        let snippet = self.resume[section_at].snippets.remove(snippet_at);
        let target = &mut self.resume[to_section].snippets;
        let to = to_index.min(target.len());
        target.insert(to, snippet);
        Ok(())
    }

    /// Replaces the whole résumé; nested sections are flattened with a depth bound.
    pub fn replace_resume(&mut self, sections: Vec<Section>) -> &[Section] {
        self.resume = flatten_sections(sections);
        for snippet in self.resume.iter_mut().flat_map(|s| s.snippets.iter_mut()) {
            if snippet.id.trim().is_empty() {
                snippet.id = mint_id("snippet");
            }
        }
        self.pin_resume_header();
        &self.resume
    }

    pub fn snippet_content(&self, snippet_id: &str) -> Result<&str, WorkspaceError> {
        let (section_at, snippet_at) = self.locate_snippet(snippet_id)?;
        Ok(&self.resume[section_at].snippets[snippet_at].content)
    }

    fn section_index(&self, section_id: &str) -> Result<usize, WorkspaceError> {
        self.resume
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| WorkspaceError::SectionNotFound(section_id.to_string()))
    }

    fn locate_snippet(&self, snippet_id: &str) -> Result<(usize, usize), WorkspaceError> {
        self.resume
            .iter()
            .enumerate()
            .find_map(|(i, section)| {
                section
                    .snippets
                    .iter()
                    .position(|s| s.id == snippet_id)
                    .map(|j| (i, j))
            })
            .ok_or_else(|| WorkspaceError::SnippetNotFound(snippet_id.to_string()))
    }

    fn pin_resume_header(&mut self) {
        let header = header_key();
        if let Some(at) = self
            .resume
            .iter()
            .position(|s| self.aliases.key(&s.title) == header)
        {
            if at > 0 {
                let section = self.resume.remove(at);
                self.resume.insert(0, section);
            }
        }
        pin_header_first(&self.aliases, &mut self.bank);
    }
}
