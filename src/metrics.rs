//! Text measurement
//!
//! Anchoring `end`/`middle` text needs the rendered width of the text run,
//! which only the host knows. [`TextMeasure`] is that collaborator;
//! [`ApproximateMetrics`] is a fixed-advance estimate for the PDF base-14
//! families, good enough when no real layout engine is available.

use crate::document::Node;
use crate::number::parse_int;
use crate::surface::DEFAULT_FONT_SIZE;

/// Layout bounding box of a text node, in unscaled document units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Host text-measurement service.
pub trait TextMeasure {
    /// Bounding box of `node` as it would be laid out.
    ///
    /// Called after the converter has normalized the node's font attributes.
    fn text_bbox(&self, node: &Node) -> BBox;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_bbox(&self, node: &Node) -> BBox {
        (**self).text_bbox(node)
    }
}

/// Average advance widths, as a fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMetrics {
    pub sans: f64,
    pub serif: f64,
    pub monospace: f64,
    /// Extra width factor applied when `font-weight="bold"`.
    pub bold_factor: f64,
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            sans: 0.52,
            serif: 0.48,
            monospace: 0.6,
            bold_factor: 1.08,
        }
    }
}

impl ApproximateMetrics {
    fn advance(&self, node: &Node) -> f64 {
        let base = match node.attr("font-family").map(str::to_ascii_lowercase).as_deref() {
            Some("serif") => self.serif,
            Some("monospace") => self.monospace,
            _ => self.sans,
        };
        if node.attr("font-weight") == Some("bold") {
            base * self.bold_factor
        } else {
            base
        }
    }
}

impl TextMeasure for ApproximateMetrics {
    fn text_bbox(&self, node: &Node) -> BBox {
        let size = match node.attr("font-size").map(parse_int) {
            Some(s) if s.is_finite() => s,
            _ => DEFAULT_FONT_SIZE,
        };
        let chars = node.text_content().chars().count() as f64;
        let x = node.attr("x").map(parse_int).unwrap_or(0.0);
        let y = node.attr("y").map(parse_int).unwrap_or(0.0);
        BBox {
            x,
            y: y - size,
            width: chars * size * self.advance(node),
            height: size,
        }
    }
}

/// Measures every text run as the same fixed width. Useful in tests and for
/// hosts that only ever emit start-anchored text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedWidth(pub f64);

impl TextMeasure for FixedWidth {
    fn text_bbox(&self, _node: &Node) -> BBox {
        BBox {
            width: self.0,
            ..BBox::default()
        }
    }
}
