//! Styled document: A4 pages laid out line by line, then written with lopdf.
//!
//! Layout is a pure pass over [`ExportSection`]s producing positioned lines per page,
//! so page-break bookkeeping is testable without parsing PDF output. Coordinates are
//! whole points with the origin at the bottom-left, as PDF expects.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::export::font_metrics::{get_metrics, FontStyle};
use crate::export::{ExportError, ExportSection};

pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;
pub const MARGIN: i64 = 48;
pub const LINE_ADVANCE: i64 = 18;

const TITLE_SIZE: i64 = 24;
const HEADING_SIZE: i64 = 18;
const BODY_SIZE: i64 = 12;
const SECTION_GAP: i64 = 6;
const BULLET: &str = "• ";

const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i64,
    /// Baseline.
    pub y: i64,
    pub size: i64,
    pub style: FontStyle,
}

/// Body lines advance by [`LINE_ADVANCE`]; larger type gets one and a half times its size.
fn advance(size: i64) -> i64 {
    LINE_ADVANCE.max(size + size / 2)
}

struct Cursor {
    pages: Vec<Vec<PlacedLine>>,
    y: i64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn at_page_top(&self) -> bool {
        self.y == PAGE_HEIGHT - MARGIN
    }

    fn gap(&mut self, points: i64) {
        if !self.at_page_top() {
            self.y -= points;
        }
    }

    fn emit(&mut self, text: String, x: i64, size: i64, style: FontStyle) {
        let line_height = advance(size);
        if self.y - line_height < MARGIN {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= line_height;
        let page = self.pages.len();
        self.pages[page - 1].push(PlacedLine {
            text,
            x,
            y: self.y,
            size,
            style,
        });
    }

    /// Wraps `text` to the width left after `indent` and emits each piece.
    fn emit_wrapped(&mut self, text: &str, indent: i64, size: i64, style: FontStyle) {
        let width_em = (CONTENT_WIDTH - indent) as f32 / size as f32;
        for line in get_metrics(style).wrap(text, width_em) {
            self.emit(line, MARGIN + indent, size, style);
        }
    }

    fn emit_bullet(&mut self, item: &str) {
        let metrics = get_metrics(FontStyle::Regular);
        let indent = (metrics.measure_str(BULLET) * BODY_SIZE as f32).ceil() as i64;
        let width_em = (CONTENT_WIDTH - indent) as f32 / BODY_SIZE as f32;

        let mut first = true;
        for source_line in item.lines() {
            for line in metrics.wrap(source_line, width_em) {
                if first {
                    self.emit(format!("{BULLET}{line}"), MARGIN, BODY_SIZE, FontStyle::Regular);
                    first = false;
                } else {
                    self.emit(line, MARGIN + indent, BODY_SIZE, FontStyle::Regular);
                }
            }
        }
    }
}

/// Positions every line of the document. Always returns at least one page.
pub fn layout(sections: &[ExportSection]) -> Vec<Vec<PlacedLine>> {
    let mut cursor = Cursor::new();

    for section in sections {
        if section.is_header {
            if let Some((name, details)) = section.header_lines() {
                cursor.emit_wrapped(&name, 0, TITLE_SIZE, FontStyle::Bold);
                for detail in &details {
                    cursor.emit_wrapped(detail, 0, BODY_SIZE, FontStyle::Regular);
                }
            }
            continue;
        }

        cursor.gap(SECTION_GAP);
        if !section.title.is_empty() {
            cursor.emit_wrapped(&section.title, 0, HEADING_SIZE, FontStyle::Bold);
        }
        for item in &section.items {
            cursor.emit_bullet(item);
        }
    }

    cursor.pages
}

/// Encodes text for a WinAnsiEncoding font. Latin-1 passes through, a few
/// typographic characters map to their cp1252 slots, anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\t' => b' ',
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

pub fn render(sections: &[ExportSection]) -> Result<Vec<u8>, ExportError> {
    let pages = layout(sections);
    debug!("PDF layout: {} page(s)", pages.len());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for style in [FontStyle::Regular, FontStyle::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => style.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(style.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in &pages {
        let mut operations = Vec::with_capacity(lines.len() * 4 + 2);
        operations.push(Operation::new("BT", vec![]));
        for line in lines {
            operations.push(Operation::new(
                "Tf",
                vec![line.style.resource_name().into(), line.size.into()],
            ));
            // Tm sets an absolute position; Td would be relative to the previous line.
            operations.push(Operation::new(
                "Tm",
                vec![
                    1_i64.into(),
                    0_i64.into(),
                    0_i64.into(),
                    1_i64.into(),
                    line.x.into(),
                    line.y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(&line.text))],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buffer)
}
