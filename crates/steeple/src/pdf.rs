//! PDF output for sacrament programs.
//!
//! `PdfSink` implements the core renderer's `DocumentSink` over `lopdf`,
//! laying the element stream out on US-Letter pages with a simple
//! y-cursor: when a line would cross the bottom margin, a new page starts.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId};

use steeple_core::program::{DocElement, DocumentSink};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 50.0;

const TITLE_SIZE: f32 = 18.0;
const HEADER_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const FOOTER_SIZE: f32 = 9.0;

/// Regular and bold face names in the page resources.
const BODY_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Encodes text as WinAnsi bytes. The hymn and placeholder lines use en/em
/// dashes, which sit outside ASCII; anything unmappable becomes '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            c if (c as u32) < 0x80 => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Rough text width for centering, from Helvetica's average glyph width.
fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Collects the rendered element stream into a paginated PDF document.
pub struct PdfSink {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    operations: Vec<Operation>,
    y: f32,
}

impl Default for PdfSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSink {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            operations: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Closes the current page and starts a fresh one.
    fn flush_page(&mut self) {
        let operations = std::mem::take(&mut self.operations);
        let content = Content { operations };
        let encoded = content.encode().unwrap_or_default();

        let content_id = self
            .doc
            .add_object(lopdf::Stream::new(dictionary! {}, encoded));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page when the next line would cross the bottom margin.
    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.operations.is_empty() {
            self.flush_page();
        }
    }

    fn write_line(&mut self, text: &str, size: f32, font: &[u8], x: f32) {
        let height = size * 1.4;
        self.ensure_room(height);
        self.y -= height;

        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.to_vec()), size.into()],
        ));
        self.operations
            .push(Operation::new("Td", vec![x.into(), self.y.into()]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                win_ansi(text),
                lopdf::StringFormat::Literal,
            )],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    fn write_centered(&mut self, text: &str, size: f32, font: &[u8]) {
        let x = ((PAGE_WIDTH - estimate_width(text, size)) / 2.0).max(MARGIN);
        self.write_line(text, size, font, x);
    }

    /// Finishes the document and returns its bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, anyhow::Error> {
        self.flush_page();

        let body_font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = self.doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => body_font_id,
                "F2" => bold_font_id,
            },
        });

        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = self.page_ids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

impl DocumentSink for PdfSink {
    fn element(&mut self, element: DocElement) {
        match element {
            DocElement::Title(text) => {
                self.write_centered(&text, TITLE_SIZE, BOLD_FONT);
                self.y -= TITLE_SIZE * 0.4;
            }
            DocElement::Centered(text) => {
                self.write_centered(&text, BODY_SIZE, BODY_FONT);
            }
            DocElement::SectionHeader(text) => {
                self.write_line(&text, HEADER_SIZE, BOLD_FONT, MARGIN);
            }
            DocElement::Line(text) => {
                self.write_line(&text, BODY_SIZE, BODY_FONT, MARGIN);
            }
            DocElement::Footer(text) => {
                self.write_line(&text, FOOTER_SIZE, BODY_FONT, MARGIN);
            }
            DocElement::Spacer => {
                self.y -= BODY_SIZE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use steeple_core::program::{render_program, Program, RenderOptions, ResolvedProgram};

    use super::*;

    fn sample_program() -> ResolvedProgram {
        let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        ResolvedProgram::unresolved(Program::new(date))
    }

    #[test]
    fn test_renders_a_loadable_single_page_pdf() {
        let mut sink = PdfSink::new();
        render_program(&sample_program(), &RenderOptions::default(), &mut sink);

        let bytes = sink.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_streams_paginate() {
        let mut sink = PdfSink::new();
        for i in 0..120 {
            sink.element(DocElement::Line(format!("Line {i}")));
        }

        let bytes = sink.finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_win_ansi_maps_dashes() {
        let encoded = win_ansi("Opening Hymn: — and –");
        assert!(encoded.contains(&0x97));
        assert!(encoded.contains(&0x96));
        assert!(!encoded.is_empty());
    }
}
