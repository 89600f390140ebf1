//! Cursor-based layout over a `printpdf` document.
//!
//! Coordinates are millimetres with the origin at the bottom-left corner, as in
//! PDF. The cursor marks the top of the next line; writing below the bottom
//! margin opens a new page and continues there.

use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use printpdf::image_crate::GenericImageView;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect,
};

use crate::render::theme::Rgb;
use crate::render::RenderError;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;

const PT_TO_MM: f32 = 0.352_778;
const LINE_SPACING: f32 = 1.45;
const IMAGE_DPI: f32 = 300.0;

/// Builtin font triple plus the average glyph width used for wrapping.
#[derive(Debug, Clone, Copy)]
pub struct FontFamily {
    regular: BuiltinFont,
    bold: BuiltinFont,
    italic: BuiltinFont,
    avg_glyph_em: f32,
}

impl FontFamily {
    pub const HELVETICA: FontFamily = FontFamily {
        regular: BuiltinFont::Helvetica,
        bold: BuiltinFont::HelveticaBold,
        italic: BuiltinFont::HelveticaOblique,
        avg_glyph_em: 0.52,
    };

    /// Monospaced, so wrapping is exact.
    pub const COURIER: FontFamily = FontFamily {
        regular: BuiltinFont::Courier,
        bold: BuiltinFont::CourierBold,
        italic: BuiltinFont::CourierOblique,
        avg_glyph_em: 0.6,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// How a line of text is drawn.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub weight: Weight,
    pub align: Align,
    pub color: Rgb,
    pub indent: f32,
    /// Background band behind the whole line width.
    pub fill: Option<Rgb>,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            weight: Weight::Regular,
            align: Align::Left,
            color: Rgb(0, 0, 0),
            indent: 0.0,
            fill: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = Weight::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.weight = Weight::Italic;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn fill(mut self, fill: Rgb) -> Self {
        self.fill = Some(fill);
        self
    }
}

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    avg_glyph_em: f32,
    background: Option<Rgb>,
    cursor: f32,
    pages: usize,
    fresh_page: bool,
}

impl PdfCanvas {
    /// Open an A4 document with one blank page.
    ///
    /// `background` is painted over every page before anything else.
    pub fn new(title: &str, family: FontFamily, background: Option<Rgb>) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

        let load = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| RenderError::Pdf(format!("failed to load font {:?}: {:?}", font, e)))
        };
        let regular = load(family.regular)?;
        let bold = load(family.bold)?;
        let italic = load(family.italic)?;

        let layer = doc.get_page(page).get_layer(layer);
        let canvas = Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            avg_glyph_em: family.avg_glyph_em,
            background,
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
            fresh_page: true,
        };
        canvas.paint_background();
        Ok(canvas)
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    pub fn line_height(size: f32) -> f32 {
        size * PT_TO_MM * LINE_SPACING
    }

    /// Estimated printed width of `text` in millimetres.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * PT_TO_MM * self.avg_glyph_em
    }

    /// How many characters fit into `width` millimetres at `size` points.
    pub fn chars_per_line(&self, width: f32, size: f32) -> usize {
        let glyph = size * PT_TO_MM * self.avg_glyph_em;
        ((width / glyph).floor() as usize).max(1)
    }

    /// Unconditionally start a new page.
    pub fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {} Layer 1", self.pages + 1),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.fresh_page = true;
        self.paint_background();
    }

    /// Start a new page unless nothing has been drawn on the current one.
    pub fn ensure_fresh_page(&mut self) {
        if !self.fresh_page {
            self.new_page();
        }
    }

    /// Break to a new page if `height` does not fit above the bottom margin.
    pub fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            self.new_page();
        }
    }

    pub fn space(&mut self, height: f32) {
        self.cursor = (self.cursor - height).max(MARGIN);
    }

    /// Put the cursor `height` above the bottom margin, breaking first if the
    /// current content already reaches that low.
    pub fn pin_to_bottom(&mut self, height: f32) {
        self.ensure_space(height);
        self.cursor = MARGIN + height;
    }

    /// One unwrapped line at the cursor.
    pub fn line(&mut self, text: &str, style: TextStyle) {
        let height = Self::line_height(style.size);
        self.ensure_space(height);

        let left = MARGIN + style.indent;
        if let Some(fill) = style.fill {
            self.fill_rect(left, self.cursor - height, PAGE_WIDTH - MARGIN - left, height, fill);
        }

        if !text.is_empty() {
            let width = self.text_width(text, style.size);
            let x = match style.align {
                Align::Left => left + if style.fill.is_some() { 1.5 } else { 0.0 },
                Align::Center => ((PAGE_WIDTH - width) / 2.0).max(MARGIN),
                Align::Right => (PAGE_WIDTH - MARGIN - width).max(MARGIN),
            };
            let baseline = self.cursor - height + (height - style.size * PT_TO_MM) / 2.0 + 0.6;
            self.draw_text(text, x, baseline, style);
        }

        self.cursor -= height;
        self.fresh_page = false;
    }

    /// Word-wrapped text; embedded newlines start new lines.
    pub fn paragraph(&mut self, text: &str, style: TextStyle) {
        let width = Self::content_width() - style.indent - if style.fill.is_some() { 3.0 } else { 0.0 };
        let max_chars = self.chars_per_line(width, style.size);
        for line in wrap_text(text, max_chars) {
            self.line(&line, style);
        }
    }

    /// A row of equally wide filled cells; text that does not fit is cut.
    pub fn grid_row(&mut self, cells: &[String], style: TextStyle, gap: f32) {
        if cells.is_empty() {
            return;
        }
        let height = Self::line_height(style.size) + 1.5;
        self.ensure_space(height + gap);

        let left = MARGIN + style.indent;
        let total = PAGE_WIDTH - MARGIN - left;
        let cell_width = (total - gap * (cells.len() - 1) as f32) / cells.len() as f32;
        let max_chars = self.chars_per_line(cell_width - 3.0, style.size);
        let bottom = self.cursor - height;

        for (index, text) in cells.iter().enumerate() {
            let x = left + index as f32 * (cell_width + gap);
            if let Some(fill) = style.fill {
                self.fill_rect(x, bottom, cell_width, height, fill);
            }
            let clipped: String = text.chars().take(max_chars).collect();
            let baseline = bottom + (height - style.size * PT_TO_MM) / 2.0 + 0.6;
            self.draw_text(&clipped, x + 1.5, baseline, style);
        }

        self.cursor -= height + gap;
        self.fresh_page = false;
    }

    /// Horizontal rule across the content width.
    pub fn rule(&mut self, color: Rgb) {
        self.ensure_space(4.0);
        let y = self.cursor - 1.0;
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(0.4);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
            ],
            is_closed: false,
        });
        self.cursor -= 4.0;
        self.fresh_page = false;
    }

    /// Bordered, filled box with centred text at an absolute position.
    /// Does not move the cursor.
    pub fn stamp(&mut self, x: f32, top: f32, width: f32, height: f32, text: &str, style: TextStyle, border: Rgb) {
        let bottom = top - height;
        if let Some(fill) = style.fill {
            self.fill_rect(x, bottom, width, height, fill);
        }
        self.layer.set_outline_color(pdf_color(border));
        self.layer.set_outline_thickness(0.8);
        self.layer.add_rect(
            Rect::new(Mm(x), Mm(bottom), Mm(x + width), Mm(top)).with_mode(PaintMode::Stroke),
        );

        let text_width = self.text_width(text, style.size);
        let baseline = bottom + (height - style.size * PT_TO_MM) / 2.0 + 0.6;
        self.draw_text(text, x + (width - text_width) / 2.0, baseline, style);
        self.fresh_page = false;
    }

    /// Place an image file scaled to `height` with its top-left corner at
    /// (`x`, `top`). Does not move the cursor.
    pub fn image(&mut self, path: &Path, x: f32, top: f32, height: f32) -> Result<(), String> {
        let decoded = printpdf::image_crate::open(path).map_err(|e| e.to_string())?;
        let (_, pixel_height) = decoded.dimensions();
        if pixel_height == 0 {
            return Err("image has no pixels".to_string());
        }

        let natural_height = pixel_height as f32 / IMAGE_DPI * 25.4;
        let scale = height / natural_height;
        Image::from_dynamic_image(&decoded).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(top - height)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        self.fresh_page = false;
        Ok(())
    }

    /// Serialize the finished document into `sink`.
    pub fn finish(self, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        let mut writer = BufWriter::new(sink);
        self.doc
            .save(&mut writer)
            .map_err(|e| RenderError::Pdf(format!("failed to serialize PDF: {:?}", e)))?;
        writer.flush()?;
        Ok(())
    }

    fn paint_background(&self) {
        if let Some(color) = self.background {
            self.fill_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, color);
        }
    }

    fn fill_rect(&self, x: f32, bottom: f32, width: f32, height: f32, color: Rgb) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_rect(
            Rect::new(Mm(x), Mm(bottom), Mm(x + width), Mm(bottom + height))
                .with_mode(PaintMode::Fill),
        );
    }

    fn draw_text(&self, text: &str, x: f32, baseline: f32, style: TextStyle) {
        let font = match style.weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
            Weight::Italic => &self.italic,
        };
        self.layer.set_fill_color(pdf_color(style.color));
        self.layer.use_text(text, style.size, Mm(x), Mm(baseline), font);
    }
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

/// Greedy word wrap to `max_chars` per line.
///
/// Newlines are kept as line breaks (an empty input line stays an empty output
/// line) and words longer than a full line are split hard.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in raw_line.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(max_chars);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            if current_len > 0 && current_len + 1 + chars.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += chars.len();
            current.extend(chars);
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn test_wrap_keeps_newlines_and_splits_long_words() {
        assert_eq!(wrap_text("a\n\nb", 5), vec!["a", "", "b"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("", 4), vec![""]);
    }

    #[test]
    fn test_overflow_opens_new_page() {
        let mut canvas = PdfCanvas::new("test", FontFamily::HELVETICA, None).unwrap();
        let text = vec!["line"; 200].join("\n");
        canvas.paragraph(&text, TextStyle::new(10.0));
        assert!(canvas.pages() > 1);
        assert!(canvas.cursor() >= MARGIN);
    }

    #[test]
    fn test_fresh_page_is_reused() {
        let mut canvas = PdfCanvas::new("test", FontFamily::COURIER, Some(Rgb(247, 243, 233))).unwrap();
        canvas.ensure_fresh_page();
        assert_eq!(canvas.pages(), 1);
        canvas.line("content", TextStyle::new(10.0));
        canvas.ensure_fresh_page();
        assert_eq!(canvas.pages(), 2);
    }

    #[test]
    fn test_finish_writes_pdf_bytes() {
        let mut canvas = PdfCanvas::new("test", FontFamily::HELVETICA, None).unwrap();
        canvas.line("hello", TextStyle::new(12.0).bold());
        let mut sink = Cursor::new(Vec::new());
        canvas.finish(&mut sink).unwrap();
        assert!(sink.get_ref().starts_with(b"%PDF"));
    }
}
