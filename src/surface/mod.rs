//! Drawing surfaces
//!
//! The converter only ever talks to a [`DrawingSurface`]. State set through
//! the `set_*` methods is global to the surface and persists until it is
//! overwritten; shapes and text are drawn with whatever state is current.
//!
//! Two implementations ship with the crate:
//! - [`RecordingSurface`]: keeps every call as a [`DrawCommand`], for tests,
//!   golden digests and JSON dumps.
//! - [`PdfSurface`] (feature `pdf`): writes a single-page PDF.

pub mod recording;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use recording::{DrawCommand, RecordingSurface};

#[cfg(feature = "pdf")]
pub use pdf::{PdfConfig, PdfSurface};

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Line width of a fresh surface, in points.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Font size of a fresh surface, and of text without `font-size`.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaintMode {
    /// No explicit mode; the surface's default rendering (an outline).
    #[default]
    Unset,
    /// Fill only.
    Fill,
    /// Fill, then stroke the outline.
    FillStroke,
}

/// The three font families text can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

/// Combination of bold and italic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
}

/// Target of a conversion. Coordinates are already scaled; malformed input
/// arrives as NaN and it is up to the surface what to do with it.
///
/// A fresh surface draws with black fill, stroke and text colors,
/// [`DEFAULT_LINE_WIDTH`], plain Helvetica and [`DEFAULT_FONT_SIZE`].
pub trait DrawingSurface {
    fn set_fill_color(&mut self, color: Rgb);
    fn set_draw_color(&mut self, color: Rgb);
    fn set_text_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, family: FontFamily);
    fn set_font_type(&mut self, style: FontStyle);
    fn set_font_size(&mut self, size: f64);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, mode: PaintMode);
    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, mode: PaintMode);
    fn circle(&mut self, cx: f64, cy: f64, r: f64, mode: PaintMode);
    fn text(&mut self, x: f64, y: f64, text: &str);
}
