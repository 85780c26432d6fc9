// Markdown: `# name` plus soft-broken detail lines for the Header, `## Title` and
// `- item` lists for everything else. Blocks are separated by one blank line.

use crate::export::ExportSection;

/// Two trailing spaces: a markdown soft line break.
const SOFT_BREAK: &str = "  \n";

pub fn render(sections: &[ExportSection]) -> String {
    let blocks: Vec<String> = sections
        .iter()
        .filter_map(|section| {
            if section.is_header {
                render_header(section)
            } else {
                Some(render_section(section))
            }
        })
        .collect();

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn render_header(section: &ExportSection) -> Option<String> {
    let (name, details) = section.header_lines()?;
    let mut block = format!("# {name}");
    if !details.is_empty() {
        block.push_str("\n\n");
        block.push_str(&details.join(SOFT_BREAK));
    }
    Some(block)
}

fn render_section(section: &ExportSection) -> String {
    let mut parts = Vec::new();
    if !section.title.is_empty() {
        parts.push(format!("## {}", section.title));
    }
    if !section.items.is_empty() {
        let list: Vec<String> = section.items.iter().map(|item| list_item(item)).collect();
        parts.push(list.join("\n"));
    }
    parts.join("\n\n")
}

/// `- first line`, continuation lines indented to stay inside the list item.
fn list_item(item: &str) -> String {
    let mut lines = item.lines();
    let mut out = format!("- {}", lines.next().unwrap_or_default());
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::export::tests::{export, section};
    use crate::export::ExportFormat;

    fn markdown(sections: &[crate::sections::Section]) -> String {
        let bytes = export(sections, ExportFormat::Markdown).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_header_and_empty_section() {
        let out = markdown(&[
            section("Header", &["Jane Doe\n123 Main St"]),
            section("Education", &[]),
        ]);
        assert_eq!(out, "# Jane Doe\n\n123 Main St\n\n## Education\n");
        assert!(!out.contains("## Header"));
        assert!(!out.contains("- "));
    }

    #[test]
    fn test_bullets_and_detail_soft_breaks() {
        let out = markdown(&[
            section("Contact Info", &["# Jane Doe\njane@example.com", "555-0100"]),
            section("Skills", &["Python", "SQL"]),
        ]);
        assert_eq!(
            out,
            "# Jane Doe\n\njane@example.com  \n555-0100\n\n## Skills\n\n- Python\n- SQL\n"
        );
    }

    #[test]
    fn test_multiline_item_stays_in_list() {
        let out = markdown(&[section("Experience", &["Acme Corp\nShipped the thing"])]);
        assert_eq!(out, "## Experience\n\n- Acme Corp\n  Shipped the thing\n");
    }

    #[test]
    fn test_untitled_section_renders_items_only() {
        let out = markdown(&[section("", &["Loose note"])]);
        assert_eq!(out, "- Loose note\n");
    }
}
