// Plain text: uppercase titles underlined with dashes, `•` bullets. The Header
// block prints the name and detail lines as they are.

use crate::export::ExportSection;

const BULLET: &str = "• ";

pub fn render(sections: &[ExportSection]) -> String {
    let blocks: Vec<String> = sections
        .iter()
        .filter_map(|section| {
            if section.is_header {
                let (name, details) = section.header_lines()?;
                let mut lines = vec![name];
                lines.extend(details);
                Some(lines.join("\n"))
            } else {
                Some(render_section(section))
            }
        })
        .collect();

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn render_section(section: &ExportSection) -> String {
    let mut parts = Vec::new();
    if !section.title.is_empty() {
        let title = section.title.to_uppercase();
        let underline = "-".repeat(title.chars().count());
        parts.push(format!("{title}\n{underline}"));
    }
    if !section.items.is_empty() {
        let items: Vec<String> = section
            .items
            .iter()
            .map(|item| {
                let mut lines = item.lines();
                let mut out = format!("{BULLET}{}", lines.next().unwrap_or_default());
                for line in lines {
                    out.push_str("\n  ");
                    out.push_str(line);
                }
                out
            })
            .collect();
        parts.push(items.join("\n"));
    }
    parts.join("\n\n")
}
