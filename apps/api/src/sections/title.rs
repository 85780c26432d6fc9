//! Section title normalizer: canonical titles and lookup keys.
//!
//! Two titles name "the same section" iff their keys match. Header-like phrases
//! ("Contact Info", "Personal Details", ...) collapse to the single label `Header`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Canonical label of the identity block at the top of a résumé.
pub const HEADER_TITLE: &str = "Header";
/// Placeholder used for blank titles.
pub const UNTITLED_SECTION: &str = "Untitled Section";

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("header", HEADER_TITLE),
    ("contact information", HEADER_TITLE),
    ("contact info", HEADER_TITLE),
    ("contact details", HEADER_TITLE),
    ("personal information", HEADER_TITLE),
    ("personal info", HEADER_TITLE),
    ("personal details", HEADER_TITLE),
];

static BUILTIN: Lazy<TitleAliases> = Lazy::new(|| TitleAliases::with_extra(std::iter::empty()));

/// Immutable alias table mapping lowercased, whitespace-collapsed titles to a canonical label.
///
/// Built once at startup (built-in pairs plus any configured extras) and shared read-only.
#[derive(Debug, Clone)]
pub struct TitleAliases {
    map: HashMap<String, String>,
}

impl Default for TitleAliases {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl TitleAliases {
    /// The built-in table, shared.
    #[cfg(test)]
    pub fn builtin() -> &'static TitleAliases {
        &BUILTIN
    }

    /// Built-in pairs followed by `extra`. Later pairs win on conflicting aliases.
    pub fn with_extra<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map: HashMap<String, String> = BUILTIN_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();

        for (alias, canonical) in extra {
            let alias = collapse_whitespace(alias.trim()).to_lowercase();
            let canonical = collapse_whitespace(canonical.trim());
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }
            map.insert(alias, canonical);
        }

        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Trims, collapses whitespace, and resolves aliases case-insensitively.
    /// Non-aliased titles keep their original casing.
    pub fn canonicalize(&self, title: &str) -> String {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return UNTITLED_SECTION.to_string();
        }

        let collapsed = collapse_whitespace(trimmed);
        match self.map.get(&collapsed.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => collapsed,
        }
    }

    /// Lookup key used for equality between section titles.
    pub fn key(&self, title: &str) -> String {
        self.canonicalize(title).to_lowercase()
    }

    pub fn is_header(&self, title: &str) -> bool {
        self.key(title) == header_key()
    }
}

/// Key of the Header section.
pub fn header_key() -> String {
    HEADER_TITLE.to_lowercase()
}

/// Parses `alias=Canonical` pairs separated by commas, skipping malformed entries.
pub fn parse_alias_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (alias, canonical) = pair.split_once('=')?;
            let alias = alias.trim();
            let canonical = canonical.trim();
            if alias.is_empty() || canonical.is_empty() {
                None
            } else {
                Some((alias.to_string(), canonical.to_string()))
            }
        })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> &'static TitleAliases {
        TitleAliases::builtin()
    }

    #[test]
    fn test_blank_title_becomes_placeholder() {
        assert_eq!(table().canonicalize(""), UNTITLED_SECTION);
        assert_eq!(table().canonicalize("   \t "), UNTITLED_SECTION);
    }

    #[test]
    fn test_whitespace_collapsed_and_casing_preserved() {
        assert_eq!(table().canonicalize("  Work   Experience "), "Work Experience");
        assert_eq!(table().canonicalize("tEchnical\tSkills"), "tEchnical Skills");
    }

    #[test]
    fn test_header_aliases_resolve_case_insensitively() {
        for title in [
            "Header",
            "CONTACT INFO",
            "Contact   Information",
            "contact details",
            "Personal Information",
            "personal info",
            "Personal  Details",
        ] {
            assert_eq!(table().canonicalize(title), HEADER_TITLE, "alias {title:?}");
            assert!(table().is_header(title), "{title:?} should be a header title");
        }
    }

    #[test]
    fn test_key_is_lowercased_canonical() {
        assert_eq!(table().key(" Work  Experience"), "work experience");
        assert_eq!(table().key("WORK EXPERIENCE"), table().key("work experience"));
        assert_eq!(table().key("Contact Info"), header_key());
    }

    #[test]
    fn test_non_header_title_is_not_header() {
        assert!(!table().is_header("Skills"));
        assert!(!table().is_header("Headers and Footers"));
    }

    #[test]
    fn test_extra_aliases_extend_table() {
        let aliases = TitleAliases::with_extra(vec![
            ("Kontakt".to_string(), "Header".to_string()),
            ("Berufserfahrung".to_string(), "Experience".to_string()),
        ]);
        assert!(aliases.is_header("kontakt"));
        assert_eq!(aliases.canonicalize("BERUFSERFAHRUNG"), "Experience");
        // Built-in pairs survive.
        assert!(aliases.is_header("contact info"));
        assert_eq!(aliases.len(), BUILTIN_ALIASES.len() + 2);
    }

    #[test]
    fn test_parse_alias_pairs_skips_malformed() {
        let pairs = parse_alias_pairs("kontakt=Header, bogus, =Empty, profil = Summary,");
        assert_eq!(
            pairs,
            vec![
                ("kontakt".to_string(), "Header".to_string()),
                ("profil".to_string(), "Summary".to_string()),
            ]
        );
    }
}
