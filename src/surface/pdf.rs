//! Single-page PDF output through `pdf-writer`.
//!
//! Callers address the page with a top-left origin in points, the same way
//! SVG coordinates read; y is flipped when operators are emitted. Text uses
//! the base-14 fonts, so no font files are embedded.

use base64::Engine as _;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use serde::{Deserialize, Serialize};

use super::{DrawingSurface, FontFamily, FontStyle, PaintMode, DEFAULT_FONT_SIZE};
use crate::color::Rgb;

/// 4/3 * (sqrt(2) - 1): control point distance for a quarter-ellipse Bézier.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Page setup for [`PdfSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Optional document title written to the info dictionary
    pub title: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        // A4
        Self {
            page_width: 595.0,
            page_height: 842.0,
            title: None,
        }
    }
}

/// Draws onto one PDF page. Call [`PdfSurface::finish`] to get the bytes.
pub struct PdfSurface {
    config: PdfConfig,
    content: Content,
    family: FontFamily,
    style: FontStyle,
    font_size: f32,
    text_color: Rgb,
    /// Base font names in first-use order; resource `F{n}` is index `n - 1`.
    fonts: Vec<&'static str>,
    skipped: usize,
}

impl PdfSurface {
    pub fn new(config: PdfConfig) -> Self {
        Self {
            config,
            content: Content::new(),
            family: FontFamily::default(),
            style: FontStyle::NORMAL,
            font_size: DEFAULT_FONT_SIZE as f32,
            text_color: Rgb::BLACK,
            fonts: Vec::new(),
            skipped: 0,
        }
    }

    /// Number of draw calls dropped because a coordinate was not finite.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Assemble the document and return the file bytes.
    pub fn finish(self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let info_id = Ref::new(5);
        let font_base = 6;

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id).kids([page_id]).count(1);

        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(
                0.0,
                0.0,
                self.config.page_width,
                self.config.page_height,
            ));
            page.parent(tree_id);
            page.contents(content_id);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for i in 0..self.fonts.len() {
                let name = resource_name(i);
                fonts.pair(Name(name.as_bytes()), Ref::new(font_base + i as i32));
            }
        }

        for (i, base) in self.fonts.iter().enumerate() {
            pdf.type1_font(Ref::new(font_base + i as i32))
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        if let Some(title) = &self.config.title {
            pdf.document_info(info_id).title(TextStr(title));
        }

        pdf.stream(content_id, &self.content.finish());
        log::debug!(
            "finished PDF page {}x{} with {} font(s)",
            self.config.page_width,
            self.config.page_height,
            self.fonts.len()
        );
        pdf.finish()
    }

    /// `data:application/pdf;base64,...`
    pub fn to_data_uri(self) -> String {
        let bytes = self.finish();
        format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    fn flip(&self, y: f64) -> f32 {
        self.config.page_height - y as f32
    }

    fn finite(&mut self, what: &str, values: &[f64]) -> bool {
        if values.iter().all(|v| v.is_finite()) {
            return true;
        }
        self.skipped += 1;
        log::warn!("skipping {} with non-finite coordinates {:?}", what, values);
        false
    }

    fn paint(&mut self, mode: PaintMode) {
        match mode {
            PaintMode::Unset => self.content.stroke(),
            PaintMode::Fill => self.content.fill_nonzero(),
            PaintMode::FillStroke => self.content.fill_nonzero_and_stroke(),
        };
    }

    fn font_resource(&mut self) -> String {
        let base = base_font(self.family, self.style);
        let idx = match self.fonts.iter().position(|f| *f == base) {
            Some(idx) => idx,
            None => {
                self.fonts.push(base);
                self.fonts.len() - 1
            }
        };
        resource_name(idx)
    }
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new(PdfConfig::default())
    }
}

fn resource_name(idx: usize) -> String {
    format!("F{}", idx + 1)
}

fn base_font(family: FontFamily, style: FontStyle) -> &'static str {
    match (family, style.bold, style.italic) {
        (FontFamily::Helvetica, false, false) => "Helvetica",
        (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
        (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
        (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
        (FontFamily::Times, false, false) => "Times-Roman",
        (FontFamily::Times, true, false) => "Times-Bold",
        (FontFamily::Times, false, true) => "Times-Italic",
        (FontFamily::Times, true, true) => "Times-BoldItalic",
        (FontFamily::Courier, false, false) => "Courier",
        (FontFamily::Courier, true, false) => "Courier-Bold",
        (FontFamily::Courier, false, true) => "Courier-Oblique",
        (FontFamily::Courier, true, true) => "Courier-BoldOblique",
    }
}

/// Base-14 fonts are declared WinAnsi, which agrees with Latin-1 on every
/// printable byte; anything outside Latin-1 becomes `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

impl DrawingSurface for PdfSurface {
    fn set_fill_color(&mut self, color: Rgb) {
        let (r, g, b) = color.to_unit();
        self.content.set_fill_rgb(r, g, b);
    }

    fn set_draw_color(&mut self, color: Rgb) {
        let (r, g, b) = color.to_unit();
        self.content.set_stroke_rgb(r, g, b);
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        if self.finite("line width", &[width]) {
            self.content.set_line_width(width as f32);
        }
    }

    fn set_font(&mut self, family: FontFamily) {
        self.family = family;
    }

    fn set_font_type(&mut self, style: FontStyle) {
        self.style = style;
    }

    fn set_font_size(&mut self, size: f64) {
        if self.finite("font size", &[size]) {
            self.font_size = size as f32;
        }
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        if !self.finite("line", &[x1, y1, x2, y2]) {
            return;
        }
        let (fy1, fy2) = (self.flip(y1), self.flip(y2));
        self.content.move_to(x1 as f32, fy1);
        self.content.line_to(x2 as f32, fy2);
        self.content.stroke();
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, mode: PaintMode) {
        if !self.finite("rect", &[x, y, width, height]) {
            return;
        }
        let top = self.flip(y);
        self.content.rect(x as f32, top, width as f32, -(height as f32));
        self.paint(mode);
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, mode: PaintMode) {
        if !self.finite("ellipse", &[cx, cy, rx, ry]) {
            return;
        }
        let lx = KAPPA * rx;
        let ly = KAPPA * ry;
        // Four quarter arcs, counter-clockwise from the rightmost point.
        let pt = |s: &Self, x: f64, y: f64| (x as f32, s.flip(y));

        let (sx, sy) = pt(self, cx + rx, cy);
        self.content.move_to(sx, sy);
        let arcs = [
            [(cx + rx, cy - ly), (cx + lx, cy - ry), (cx, cy - ry)],
            [(cx - lx, cy - ry), (cx - rx, cy - ly), (cx - rx, cy)],
            [(cx - rx, cy + ly), (cx - lx, cy + ry), (cx, cy + ry)],
            [(cx + lx, cy + ry), (cx + rx, cy + ly), (cx + rx, cy)],
        ];
        for [c1, c2, end] in arcs {
            let (x1, y1) = pt(self, c1.0, c1.1);
            let (x2, y2) = pt(self, c2.0, c2.1);
            let (x3, y3) = pt(self, end.0, end.1);
            self.content.cubic_to(x1, y1, x2, y2, x3, y3);
        }
        self.content.close_path();
        self.paint(mode);
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, mode: PaintMode) {
        self.ellipse(cx, cy, r, r, mode);
    }

    fn text(&mut self, x: f64, y: f64, text: &str) {
        if !self.finite("text", &[x, y]) {
            return;
        }
        let font = self.font_resource();
        let (r, g, b) = self.text_color.to_unit();
        let baseline = self.flip(y);
        let bytes = latin1(text);

        // Text color is the fill color inside BT; keep it from leaking to shapes.
        self.content.save_state();
        self.content.set_fill_rgb(r, g, b);
        self.content.begin_text();
        self.content.set_font(Name(font.as_bytes()), self.font_size);
        self.content.next_line(x as f32, baseline);
        self.content.show(Str(&bytes));
        self.content.end_text();
        self.content.restore_state();
    }
}
