use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use shiftdesk_core::Shift;

use super::{Line, report_lines, report_title};
use crate::db::ReportBundle;
use crate::error::DeskError;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const WRAP_AT: usize = 95;

/// Cursor over an A4 document that starts a new page when the current one is full.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, DeskError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DeskError::RenderError(format!("{e:?}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DeskError::RenderError(format!("{e:?}")))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_H - MARGIN,
        })
    }

    fn advance(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_H - MARGIN;
        }
        self.y -= height;
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        let line_height = size * 0.5;
        for chunk in wrap(text, WRAP_AT) {
            self.advance(line_height);
            let font = if bold { &self.bold } else { &self.regular };
            self.layer
                .use_text(chunk, size, Mm(MARGIN), Mm(self.y), font);
        }
    }

    fn finish(self) -> Result<Vec<u8>, DeskError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| DeskError::RenderError(format!("{e:?}")))
    }
}

/// The built-in PDF fonts only cover Latin-1; anything else is replaced.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 && !c.is_control() { c } else { '?' })
        .collect()
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let text = sanitize(text);
    let indent: String = text.chars().take_while(|c| *c == ' ').collect();
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if current.is_empty() {
            current.push_str(&indent);
        } else {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn render_pdf(bundle: &ReportBundle, only: Option<Shift>) -> Result<Vec<u8>, DeskError> {
    let mut w = PageWriter::new(&report_title(bundle))?;
    for line in report_lines(bundle, only) {
        match line {
            Line::Title(t) => w.text(&t, 16.0, true),
            Line::Heading(h) => w.text(&h, 12.0, true),
            Line::Text(t) => w.text(&t, 10.0, false),
            Line::Blank => w.advance(4.0),
        }
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_pdf(&fixtures::bundle(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_lines_are_wrapped_on_words() {
        let text = "word ".repeat(40);
        let lines = wrap(&text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn wrapped_lines_keep_their_indent() {
        let lines = wrap("  [x] a b c d e f", 9);
        assert!(lines.iter().all(|l| l.starts_with("  ")));
    }
}
