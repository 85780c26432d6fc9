//! Snippet Bank Merge Engine.
//!
//! Pure function of (existing bank, incoming parsed sections). Sections are matched by
//! title key, snippets by fingerprint. Already-banked snippets keep their ids; only
//! novel content mints new ones, so re-importing the same document adds nothing.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::sections::title::header_key;
use crate::sections::{fingerprint, sanitize, BankSection, ParsedSection, Snippet, TitleAliases};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeResult {
    pub bank: Vec<BankSection>,
    pub added_sections: usize,
    pub added_snippets: usize,
}

pub fn merge(
    aliases: &TitleAliases,
    existing: &[BankSection],
    incoming: &[ParsedSection],
) -> MergeResult {
    let mut bank: Vec<BankSection> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut touched: HashSet<usize> = HashSet::new();

    for section in existing {
        let cloned = clone_section(aliases, section);
        let key = aliases.key(&cloned.title);
        match index.get(&key) {
            // Two bank sections under one key: fold the later into the earlier.
            Some(&at) => {
                bank[at].snippets.extend(cloned.snippets);
                touched.insert(at);
            }
            None => {
                index.insert(key, bank.len());
                bank.push(cloned);
            }
        }
    }

    let mut added_sections = 0;
    let mut added_snippets = 0;

    for section in incoming {
        let contents = unique_contents(&section.snippets);
        if contents.is_empty() {
            continue;
        }

        let key = aliases.key(&section.title);
        match index.get(&key) {
            Some(&at) => {
                let target = &mut bank[at];
                let mut seen: HashSet<String> =
                    target.snippets.iter().map(|s| fingerprint(&s.content)).collect();
                for content in contents {
                    if seen.insert(fingerprint(&content)) {
                        target.snippets.push(Snippet::for_bank(content));
                        added_snippets += 1;
                    }
                }
                touched.insert(at);
            }
            None => {
                added_sections += 1;
                added_snippets += contents.len();
                index.insert(key, bank.len());
                touched.insert(bank.len());
                bank.push(BankSection {
                    title: aliases.canonicalize(&section.title),
                    snippets: contents.into_iter().map(Snippet::for_bank).collect(),
                });
            }
        }
    }

    for at in touched {
        let snippets = std::mem::take(&mut bank[at].snippets);
        bank[at].snippets = ensure_unique(snippets);
    }

    pin_header_first(aliases, &mut bank);

    MergeResult {
        bank,
        added_sections,
        added_snippets,
    }
}

/// Moves the section keyed `header` to index 0, keeping everything else in order.
pub fn pin_header_first(aliases: &TitleAliases, bank: &mut Vec<BankSection>) {
    let header = header_key();
    if let Some(at) = bank.iter().position(|s| aliases.key(&s.title) == header) {
        if at > 0 {
            let section = bank.remove(at);
            bank.insert(0, section);
        }
    }
}

fn clone_section(aliases: &TitleAliases, section: &BankSection) -> BankSection {
    BankSection {
        title: aliases.canonicalize(&section.title),
        snippets: section
            .snippets
            .iter()
            .map(|snippet| Snippet {
                id: snippet.id.clone(),
                content: sanitize(&snippet.content),
            })
            .filter(|snippet| !snippet.content.is_empty())
            .collect(),
    }
}

/// Sanitized, non-empty bodies with in-batch duplicates removed (first wins).
fn unique_contents(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|s| sanitize(s))
        .filter(|content| !content.is_empty() && seen.insert(fingerprint(content)))
        .collect()
}

fn ensure_unique(snippets: Vec<Snippet>) -> Vec<Snippet> {
    let mut seen = HashSet::new();
    snippets
        .into_iter()
        .filter(|snippet| !snippet.content.is_empty() && seen.insert(fingerprint(&snippet.content)))
        .collect()
}
