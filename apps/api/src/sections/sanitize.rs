//! Snippet sanitizer: canonical snippet bodies and duplicate fingerprints.

/// ASCII glyphs are only treated as bullets when followed by whitespace, so
/// `-5%` or `**bold**` survive. The Unicode glyphs are always bullets.
const ASCII_BULLETS: &[char] = &['-', '*', '+'];
const UNICODE_BULLETS: &[char] = &['•', '●'];

/// Cleans raw extracted text into a canonical snippet body.
///
/// Line endings are normalized, every line is trimmed, leading bullet glyphs are
/// removed, interior whitespace runs collapse to one space and empty lines are dropped.
/// `sanitize(sanitize(x)) == sanitize(x)` for every input.
pub fn sanitize(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split('\n')
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Case- and whitespace-insensitive form of a snippet, used only for equality.
pub fn fingerprint(content: &str) -> String {
    sanitize(content)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn clean_line(line: &str) -> String {
    let mut rest = line.trim();
    while let Some(stripped) = strip_bullet(rest) {
        rest = stripped;
    }
    collapse_runs(rest)
}

fn strip_bullet(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let after = chars.as_str();

    if UNICODE_BULLETS.contains(&first) {
        return Some(after.trim_start());
    }
    if ASCII_BULLETS.contains(&first) && (after.is_empty() || after.starts_with(char::is_whitespace))
    {
        return Some(after.trim_start());
    }
    None
}

/// Collapses runs of two or more whitespace characters into a single space.
fn collapse_runs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut run: Option<char> = None;
    let mut run_len = 0usize;

    for c in line.chars() {
        if c.is_whitespace() {
            run_len += 1;
            if run_len == 1 {
                run = Some(c);
            }
            continue;
        }
        match (run_len, run) {
            (0, _) => {}
            (1, Some(single)) => out.push(single),
            _ => out.push(' '),
        }
        run_len = 0;
        run = None;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   \n\t\n",
        "- Python",
        "  •   Led a team of  five engineers  ",
        "● Shipped v2\r\n\r\n* Cut costs by 30%\r\n+ Mentored interns",
        "- - nested dash",
        "-",
        "•",
        "-5% churn",
        "**Bold** claim",
        "line one\rline two",
        "tab\tseparated\t\tvalues",
        "Jane Doe\njane@example.com  |  555-0100",
    ];

    #[test]
    fn test_strips_single_bullet() {
        assert_eq!(sanitize("- Python"), "Python");
        assert_eq!(sanitize("* SQL"), "SQL");
        assert_eq!(sanitize("+ Rust"), "Rust");
        assert_eq!(sanitize("• Go"), "Go");
        assert_eq!(sanitize("●Kotlin"), "Kotlin");
    }

    #[test]
    fn test_keeps_dash_without_space() {
        assert_eq!(sanitize("-5% churn"), "-5% churn");
        assert_eq!(sanitize("**Bold** claim"), "**Bold** claim");
    }

    #[test]
    fn test_normalizes_lines_and_whitespace() {
        let raw = "  •   Led a team of  five engineers  \r\n\r\n   - Shipped   on time ";
        assert_eq!(sanitize(raw), "Led a team of five engineers\nShipped on time");
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \n \r\n\t"), "");
        assert_eq!(sanitize("-\n•\n*"), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for sample in SAMPLES {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_fingerprint_ignores_case_and_whitespace() {
        assert_eq!(fingerprint("Python"), fingerprint("  python "));
        assert_eq!(fingerprint("- Built  APIs\nin Rust"), fingerprint("built apis in rust"));
        assert_ne!(fingerprint("Python"), fingerprint("Python 3"));
    }

    #[test]
    fn test_fingerprint_of_blank_is_empty() {
        assert_eq!(fingerprint("   "), "");
    }
}
