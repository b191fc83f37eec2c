//! Attribute whitelists, sanitizing and style resolution

use crate::color::{parse_color, Rgb};
use crate::document::{Node, Tag};
use crate::number::parse_int;
use crate::surface::PaintMode;

/// Attributes kept on `g` (and on `svg` / `a`, which convert like groups).
pub const GROUP_ATTRS: &[&str] = &["stroke", "fill", "stroke-width"];
pub const LINE_ATTRS: &[&str] = &["x1", "y1", "x2", "y2", "stroke", "stroke-width"];
pub const RECT_ATTRS: &[&str] = &["x", "y", "width", "height", "stroke", "fill", "stroke-width"];
pub const ELLIPSE_ATTRS: &[&str] = &["cx", "cy", "rx", "ry", "stroke", "fill", "stroke-width"];
pub const CIRCLE_ATTRS: &[&str] = &["cx", "cy", "r", "stroke", "fill", "stroke-width"];
pub const TEXT_ATTRS: &[&str] = &[
    "x",
    "y",
    "font-size",
    "font-family",
    "text-anchor",
    "font-weight",
    "font-style",
    "fill",
];

/// The whitelist for a tag, or `None` for tags the converter doesn't translate.
pub fn allowed_attributes(tag: &Tag) -> Option<&'static [&'static str]> {
    match tag {
        Tag::Svg | Tag::Anchor | Tag::Group => Some(GROUP_ATTRS),
        Tag::Line => Some(LINE_ATTRS),
        Tag::Rect => Some(RECT_ATTRS),
        Tag::Ellipse => Some(ELLIPSE_ATTRS),
        Tag::Circle => Some(CIRCLE_ATTRS),
        Tag::Text => Some(TEXT_ATTRS),
        Tag::Other(_) => None,
    }
}

/// Drop every attribute whose lower-cased name is not in `allowed`.
pub fn sanitize(node: &mut Node, allowed: &[&str]) {
    let before = node.attrs().len();
    node.retain_attrs(|a| {
        let name = a.name.to_ascii_lowercase();
        allowed.contains(&name.as_str())
    });
    let removed = before - node.attrs().len();
    if removed > 0 {
        log::trace!("stripped {} attribute(s) from <{}>", removed, node.name());
    }
}

/// A color attribute as read off a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSlot {
    #[default]
    Absent,
    Invalid,
    Valid(Rgb),
}

impl ColorSlot {
    pub fn read(node: &Node, name: &str) -> Self {
        match node.attr(name) {
            None => ColorSlot::Absent,
            Some(value) => match parse_color(value) {
                Some(rgb) => ColorSlot::Valid(rgb),
                None => ColorSlot::Invalid,
            },
        }
    }

    pub fn color(&self) -> Option<Rgb> {
        match self {
            ColorSlot::Valid(rgb) => Some(*rgb),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, ColorSlot::Absent)
    }
}

/// Style attributes resolved for one node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub fill: ColorSlot,
    pub stroke: ColorSlot,
    /// Scaled `stroke-width`, when the attribute is present (may be NaN).
    pub stroke_width: Option<f64>,
}

impl Style {
    /// Resolve the style of `node`.
    ///
    /// Only `g`, `line`, `rect`, `ellipse`, `circle` and `text` carry style;
    /// `text` reads `fill` alone. Everything else yields `None`.
    pub fn extract(node: &Node, scale: f64) -> Option<Style> {
        match node.tag() {
            Tag::Text => Some(Style {
                fill: ColorSlot::read(node, "fill"),
                ..Style::default()
            }),
            Tag::Group | Tag::Line | Tag::Rect | Tag::Ellipse | Tag::Circle => Some(Style {
                fill: ColorSlot::read(node, "fill"),
                stroke: ColorSlot::read(node, "stroke"),
                stroke_width: node.attr("stroke-width").map(|w| scale * parse_int(w)),
            }),
            _ => None,
        }
    }

    /// Fold this style into the running paint mode of a sibling list.
    ///
    /// A valid fill selects fill; a valid stroke upgrades fill to
    /// fill-and-stroke. Any unparsable color drops back to unset, as does a
    /// valid stroke with no fill in effect. Absent attributes leave the mode
    /// as it was.
    pub fn paint_mode(&self, current: PaintMode) -> PaintMode {
        let mut mode = current;
        match self.fill {
            ColorSlot::Valid(_) => mode = PaintMode::Fill,
            ColorSlot::Invalid => mode = PaintMode::Unset,
            ColorSlot::Absent => {}
        }
        match self.stroke {
            ColorSlot::Valid(_) if mode == PaintMode::Fill => mode = PaintMode::FillStroke,
            ColorSlot::Valid(_) | ColorSlot::Invalid => mode = PaintMode::Unset,
            ColorSlot::Absent => {}
        }
        mode
    }
}
