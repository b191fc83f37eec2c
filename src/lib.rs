//! svgpdf
//!
//! Translate a small, fixed subset of SVG (`g`, `a`, `line`, `rect`,
//! `ellipse`, `circle`, `text`) into drawing calls on a PDF-style canvas.
//!
//! # Features
//!
//! - **Recursive converter**: walks the element tree, maps shapes and text to
//!   drawing primitives and applies `fill`, `stroke`, `stroke-width` and font
//!   attributes
//! - **In-place pruning**: translated nodes keep only the attributes that were
//!   honored; untranslatable nodes can be removed
//! - **Pluggable surfaces**: a recording surface for tests and a single-page
//!   PDF writer (feature `pdf`, enabled by default)
//!
//! # Example
//!
//! ```
//! use svgpdf::{ConvertOptions, Document, RecordingSurface};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::parse(
//!     r##"<svg><rect x="10" y="20" width="30" height="40" fill="#ff0000" class="x"/></svg>"##,
//! )?;
//! let mut surface = RecordingSurface::new();
//! svgpdf::convert_document(&mut doc, &mut surface, &ConvertOptions::default());
//!
//! assert_eq!(surface.draw_commands().count(), 1);
//! assert!(!doc.to_svg_string()?.contains("class"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod color;
pub mod convert;
pub mod document;
pub mod metrics;
pub mod number;
pub mod style;
pub mod surface;

pub use color::Rgb;
pub use convert::{convert, convert_document, convert_with, AddSvg};
pub use document::{Document, Node, Tag};
pub use metrics::{ApproximateMetrics, BBox, TextMeasure};
pub use surface::{DrawCommand, DrawingSurface, FontFamily, FontStyle, PaintMode, RecordingSurface};

#[cfg(feature = "pdf")]
pub use surface::{PdfConfig, PdfSurface};

/// How surface state set inside a group relates to what comes after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateScoping {
    /// Colors, line width, font and paint mode stay in effect until
    /// overwritten, across sibling and group boundaries.
    #[default]
    LeakForward,
    /// State set by a group and its descendants is reverted when the group
    /// ends, and every node starts with the paint mode unset.
    Isolated,
}

/// Options for a conversion
///
/// Deserializes from the same keys the JavaScript plugin accepted
/// (`removeInvalid`, `scale`, `x_offset`, `y_offset`); missing keys take the
/// defaults below.
///
/// # Examples
///
/// ```
/// let opts = svgpdf::ConvertOptions::from_json(r#"{"removeInvalid": true, "scale": 2}"#).unwrap();
/// assert!(opts.remove_invalid);
/// assert_eq!(opts.scale, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Delete nodes that can't be translated instead of leaving them alone
    #[serde(rename = "removeInvalid")]
    pub remove_invalid: bool,
    /// Uniform multiplier applied to every coordinate and stroke width
    pub scale: f64,
    /// Horizontal placement recorded by [`AddSvg::add_svg`]; not applied
    pub x_offset: Option<f64>,
    /// Vertical placement recorded by [`AddSvg::add_svg`]; not applied
    pub y_offset: Option<f64>,
    /// Whether group-level state leaks forward (the default) or is restored
    pub scoping: StateScoping,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            remove_invalid: false,
            scale: 1.0,
            x_offset: None,
            y_offset: None,
            scoping: StateScoping::LeakForward,
        }
    }
}

impl ConvertOptions {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let opts: ConvertOptions = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject a scale that would make every coordinate meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() {
            return Err(Error::ConfigError(format!("scale must be finite, got {}", self.scale)));
        }
        Ok(())
    }
}

/// Parse `svg`, convert it onto a fresh PDF page and return the file bytes
/// together with the pruned document.
#[cfg(feature = "pdf")]
pub fn svg_to_pdf(svg: &str, options: &ConvertOptions, page: PdfConfig) -> Result<(Vec<u8>, Document)> {
    options.validate()?;
    let mut doc = Document::parse(svg)?;
    let mut surface = PdfSurface::new(page);
    convert_document(&mut doc, &mut surface, options);
    if surface.skipped() > 0 {
        log::warn!("{} draw call(s) had non-finite coordinates and were dropped", surface.skipped());
    }
    Ok((surface.finish(), doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert!(!opts.remove_invalid);
        assert_eq!(opts.scale, 1.0);
        assert_eq!(opts.x_offset, None);
        assert_eq!(opts.scoping, StateScoping::LeakForward);
    }

    #[test]
    fn test_options_from_json() {
        let opts = ConvertOptions::from_json(r#"{"x_offset": 5, "scoping": "isolated"}"#).unwrap();
        assert_eq!(opts.x_offset, Some(5.0));
        assert_eq!(opts.scale, 1.0);
        assert_eq!(opts.scoping, StateScoping::Isolated);

        assert!(ConvertOptions::from_json(r#"{"scale": "big"}"#).is_err());
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_svg_to_pdf() {
        let (bytes, doc) = svg_to_pdf(
            r#"<svg><circle cx="50" cy="50" r="10" fill="green" data-x="1"/></svg>"#,
            &ConvertOptions::default(),
            PdfConfig::default(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let circle = doc.root().children().next().unwrap();
        assert!(!circle.has_attr("data-x"));
    }
}
