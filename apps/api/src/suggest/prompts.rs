// Prompts for snippet rewrite suggestions.

/// `{snippet}` is replaced with the snippet text, `{count}` with the number wanted.
pub const SNIPPET_IMPROVE_PROMPT: &str = r#"Rewrite the résumé bullet point below into {count} alternative, more impactful versions.

Focus on strong action verbs and quantified outcomes where the original supports them.
Each version must stand alone as a single bullet point, without a leading bullet glyph.

Return a JSON array of {count} strings.

Original bullet point:
"{snippet}""#;
