// Structured data: `{"sections": [{"title", "snippets"}]}` in section order, no styling.
// Header sections are emitted as-is so the document round-trips.

use serde::{Deserialize, Serialize};

use crate::export::{ExportError, ExportSection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub sections: Vec<ExportedSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSection {
    pub title: String,
    pub snippets: Vec<String>,
}

pub fn render(sections: &[ExportSection]) -> Result<String, ExportError> {
    let document = ExportDocument {
        sections: sections
            .iter()
            .map(|s| ExportedSection {
                title: s.title.clone(),
                snippets: s.items.clone(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document).map_err(|e| ExportError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{export, section};
    use crate::export::ExportFormat;

    #[test]
    fn test_round_trip_preserves_titles_and_order() {
        let input = vec![
            section("Header", &["Jane Doe\njane@example.com"]),
            section("Skills", &["Python", "SQL"]),
            section("Education", &[]),
        ];
        let bytes = export(&input, ExportFormat::Json).unwrap();
        let parsed: ExportDocument = serde_json::from_slice(&bytes).unwrap();

        let titles: Vec<_> = parsed.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Header", "Skills", "Education"]);
        assert_eq!(parsed.sections[0].snippets, vec!["Jane Doe\njane@example.com"]);
        assert_eq!(parsed.sections[1].snippets, vec!["Python", "SQL"]);
        assert!(parsed.sections[2].snippets.is_empty());
    }

    #[test]
    fn test_shape() {
        let bytes = export(&[section("Skills", &["Rust"])], ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"sections": [{"title": "Skills", "snippets": ["Rust"]}]})
        );
    }
}
