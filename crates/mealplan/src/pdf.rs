use mealdeck_shared::{Error, Result};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::{ExportOptions, WeekDocument};

const PT_TO_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.35;
// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.55;

const TITLE_PT: f32 = 18.0;
const RANGE_PT: f32 = 11.0;
const DAY_PT: f32 = 14.0;
const SLOT_PT: f32 = 12.0;
const BODY_PT: f32 = 10.0;

fn pdf_error(err: impl std::fmt::Debug) -> Error {
    Error::Server(format!("pdf: {err:?}"))
}

/// Renders the document as PDF bytes. Images are not embedded.
#[tracing::instrument(skip_all, fields(week = %document.week))]
pub fn render(document: &WeekDocument, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut writer = Writer::new(&document.title, options)?;

    writer.centered(&document.title, TITLE_PT, true);
    writer.centered(&document.range, RANGE_PT, false);
    writer.gap(6.0);

    for day in &document.days {
        writer.line(&day.heading, DAY_PT, true, 0.0);

        for slot in &day.slots {
            writer.line(slot.slot.title(), SLOT_PT, true, 2.0);

            for meal in &slot.meals {
                writer.line(&meal.name, BODY_PT + 1.0, true, 6.0);

                if !meal.ingredients.is_empty() {
                    writer.line("Ingredients:", BODY_PT, false, 6.0);

                    for ingredient in &meal.ingredients {
                        writer.paragraph(&format!("- {ingredient}"), BODY_PT, 10.0);
                    }
                }

                if let Some(instructions) = meal.instructions.as_deref() {
                    writer.line("Instructions:", BODY_PT, false, 6.0);

                    for paragraph in instructions.lines().filter(|l| !l.trim().is_empty()) {
                        writer.paragraph(paragraph.trim(), BODY_PT, 10.0);
                    }
                }

                writer.gap(2.0);
            }
        }

        writer.gap(4.0);
    }

    writer.doc.save_to_bytes().map_err(pdf_error)
}

struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f32,
    height: f32,
    margin: f32,
    y: f32,
}

impl Writer {
    fn new(title: &str, options: &ExportOptions) -> Result<Self> {
        let (width, height) = options.page_mm();
        let margin = options.margin_mm();
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            width,
            height,
            margin,
            y: height - margin,
        })
    }

    fn line_height(size: f32) -> f32 {
        size * PT_TO_MM * LINE_SPACING
    }

    fn ensure(&mut self, needed: f32) {
        if self.y - needed >= self.margin {
            return;
        }

        let (page, layer) = self
            .doc
            .add_page(Mm(self.width), Mm(self.height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.height - self.margin;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn write(&mut self, text: &str, size: f32, bold: bool, x: f32) {
        let height = Self::line_height(size);
        self.ensure(height);
        self.y -= height;

        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(encodable(text), size, Mm(x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, bold: bool, indent: f32) {
        self.write(text, size, bold, self.margin + indent);
    }

    fn centered(&mut self, text: &str, size: f32, bold: bool) {
        let text_width = text.chars().count() as f32 * size * PT_TO_MM * GLYPH_WIDTH;
        let x = ((self.width - text_width) / 2.0).max(self.margin);

        self.write(text, size, bold, x);
    }

    fn paragraph(&mut self, text: &str, size: f32, indent: f32) {
        let usable = self.width - 2.0 * self.margin - indent;
        let columns = (usable / (size * PT_TO_MM * GLYPH_WIDTH)).floor().max(10.0) as usize;

        for line in wrap(text, columns) {
            self.line(&line, size, false, indent);
        }
    }
}

/// Greedy word wrap to at most `columns` characters per line. Words longer
/// than a line are split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            let rest = word.split_off(columns);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word.len() > columns {
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }

        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Built-in PDF fonts only cover Latin-1; dashes and quotes are folded and
/// anything else outside it is dropped.
fn encodable(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '–' | '—' => Some('-'),
            '‘' | '’' => Some('\''),
            '“' | '”' => Some('"'),
            c if (c as u32) < 0x100 => Some(c),
            _ => None,
        })
        .collect::<String>()
        .trim()
        .to_owned()
}
