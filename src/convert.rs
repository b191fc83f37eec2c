//! The recursive SVG -> drawing-surface converter
//!
//! Children are visited in document order. Each one first has its style
//! resolved and pushed to the surface, then is dispatched on its tag:
//! containers recurse, shapes and text draw, anything else is skipped or
//! removed. Translated nodes are pruned to their attribute whitelist on the
//! way out.
//!
//! Surface state (colors, line width, font) is never pushed or popped by
//! default: whatever a node sets stays in effect for everything drawn after
//! it, including later siblings of an enclosing group. The paint mode of a
//! sibling list behaves the same way within that list. Set
//! [`StateScoping::Isolated`] to restore state at group boundaries instead.

use crate::color::Rgb;
use crate::document::{Child, Document, Node, Tag};
use crate::metrics::{ApproximateMetrics, TextMeasure};
use crate::number::parse_int_attr;
use crate::style::{self, Style};
use crate::surface::{DrawingSurface, FontFamily, FontStyle, PaintMode, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH};
use crate::{ConvertOptions, StateScoping};

/// Convert the children of `root` onto `surface`, measuring text with
/// [`ApproximateMetrics`]. Returns the surface for chaining.
pub fn convert<'s, S>(root: &mut Node, surface: &'s mut S, options: &ConvertOptions) -> &'s mut S
where
    S: DrawingSurface + ?Sized,
{
    convert_with(root, surface, options, &ApproximateMetrics::default())
}

/// Like [`convert`], with a caller-supplied text measurer.
pub fn convert_with<'s, S, M>(
    root: &mut Node,
    surface: &'s mut S,
    options: &ConvertOptions,
    measure: &M,
) -> &'s mut S
where
    S: DrawingSurface + ?Sized,
    M: TextMeasure + ?Sized,
{
    log::debug!(
        "converting <{}> (scale={}, remove_invalid={}, scoping={:?})",
        root.name(),
        options.scale,
        options.remove_invalid,
        options.scoping
    );
    let mut converter = Converter {
        options,
        measure,
        state: SurfaceState::default(),
    };
    converter.convert_children(root, surface);
    surface
}

/// Convert a whole parsed document; the root `<svg>` itself is not pruned.
pub fn convert_document<'s, S>(doc: &mut Document, surface: &'s mut S, options: &ConvertOptions) -> &'s mut S
where
    S: DrawingSurface + ?Sized,
{
    convert(doc.root_mut(), surface, options)
}

/// `addSVG`-style entry point on any surface.
///
/// `x` and `y` are recorded in the options as `x_offset` / `y_offset` and
/// handed to the converter; placement is left to the caller.
pub trait AddSvg: DrawingSurface {
    fn add_svg(&mut self, root: &mut Node, x: f64, y: f64, options: Option<ConvertOptions>) -> &mut Self {
        let mut options = options.unwrap_or_default();
        options.x_offset = Some(x);
        options.y_offset = Some(y);
        convert(root, self, &options)
    }
}

impl<S: DrawingSurface + ?Sized> AddSvg for S {}

/// What the converter has pushed to the surface so far, starting from the
/// values a fresh surface uses.
#[derive(Debug, Clone, PartialEq)]
struct SurfaceState {
    fill: Rgb,
    draw: Rgb,
    text: Rgb,
    line_width: f64,
    font: FontFamily,
    font_type: FontStyle,
    font_size: f64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            fill: Rgb::BLACK,
            draw: Rgb::BLACK,
            text: Rgb::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            font: FontFamily::default(),
            font_type: FontStyle::NORMAL,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

struct Converter<'a, M: ?Sized> {
    options: &'a ConvertOptions,
    measure: &'a M,
    state: SurfaceState,
}

impl<'a, M: TextMeasure + ?Sized> Converter<'a, M> {
    fn isolated(&self) -> bool {
        self.options.scoping == StateScoping::Isolated
    }

    fn convert_children<S: DrawingSurface + ?Sized>(&mut self, parent: &mut Node, surface: &mut S) {
        let mut mode = PaintMode::Unset;
        let content = parent.content_mut();
        let mut i = 0;
        while i < content.len() {
            let node = match &mut content[i] {
                Child::Element(node) => node,
                Child::Text(_) => {
                    i += 1;
                    continue;
                }
            };
            if self.isolated() {
                mode = PaintMode::Unset;
            }
            if self.convert_node(node, surface, &mut mode) {
                i += 1;
            } else {
                content.remove(i);
            }
        }
    }

    /// Returns `false` when the node should be removed from its parent.
    fn convert_node<S: DrawingSurface + ?Sized>(
        &mut self,
        node: &mut Node,
        surface: &mut S,
        mode: &mut PaintMode,
    ) -> bool {
        let k = self.options.scale;
        let saved = self.state.clone();

        let style = Style::extract(node, k);
        if let Some(style) = &style {
            *mode = style.paint_mode(*mode);
            log::trace!("<{}> style {:?} -> {:?}", node.name(), style, mode);
            if *node.tag() != Tag::Text {
                self.apply_shape_style(style, surface);
            }
        }

        let tag = node.tag().clone();
        log::debug!("dispatching <{}>", node.name());
        match tag {
            Tag::Svg | Tag::Anchor | Tag::Group => {
                self.convert_children(node, surface);
                if self.isolated() {
                    self.restore(&saved, surface);
                }
                style::sanitize(node, style::GROUP_ATTRS);
            }
            Tag::Line => {
                surface.line(
                    k * int_attr(node, "x1"),
                    k * int_attr(node, "y1"),
                    k * int_attr(node, "x2"),
                    k * int_attr(node, "y2"),
                );
                style::sanitize(node, style::LINE_ATTRS);
            }
            Tag::Rect => {
                surface.rect(
                    k * int_attr(node, "x"),
                    k * int_attr(node, "y"),
                    k * int_attr(node, "width"),
                    k * int_attr(node, "height"),
                    *mode,
                );
                style::sanitize(node, style::RECT_ATTRS);
            }
            Tag::Ellipse => {
                surface.ellipse(
                    k * int_attr(node, "cx"),
                    k * int_attr(node, "cy"),
                    k * int_attr(node, "rx"),
                    k * int_attr(node, "ry"),
                    *mode,
                );
                style::sanitize(node, style::ELLIPSE_ATTRS);
            }
            Tag::Circle => {
                surface.circle(
                    k * int_attr(node, "cx"),
                    k * int_attr(node, "cy"),
                    k * int_attr(node, "r"),
                    *mode,
                );
                style::sanitize(node, style::CIRCLE_ATTRS);
            }
            Tag::Text => {
                let fill = style.and_then(|s| s.fill.color());
                self.convert_text(node, fill, surface);
            }
            Tag::Other(name) => {
                if self.options.remove_invalid {
                    log::warn!("can't translate <{}> to pdf; removing it", name);
                    return false;
                }
                log::debug!("leaving untranslatable <{}> in place", name);
            }
        }
        true
    }

    fn convert_text<S: DrawingSurface + ?Sized>(&mut self, node: &mut Node, fill: Option<Rgb>, surface: &mut S) {
        let k = self.options.scale;

        let family = node.attr("font-family").map(str::to_ascii_lowercase);
        if let Some(family) = family {
            let family = match family.as_str() {
                "serif" => FontFamily::Times,
                "monospace" => FontFamily::Courier,
                _ => {
                    node.set_attr("font-family", "sans-serif");
                    FontFamily::Helvetica
                }
            };
            self.set_font(surface, family);
        }

        if let Some(color) = fill {
            self.set_text_color(surface, color);
        }

        let mut font_type = FontStyle::NORMAL;
        match node.attr("font-weight").map(|w| w == "bold") {
            Some(true) => font_type.bold = true,
            Some(false) => {
                node.remove_attr("font-weight");
            }
            None => {}
        }
        match node.attr("font-style").map(|s| s == "italic") {
            Some(true) => font_type.italic = true,
            Some(false) => {
                node.remove_attr("font-style");
            }
            None => {}
        }
        self.set_font_type(surface, font_type);

        let font_size = if node.has_attr("font-size") {
            int_attr(node, "font-size")
        } else {
            DEFAULT_FONT_SIZE
        };

        // Measured unscaled, after the font attributes above were normalized.
        let bbox = self.measure.text_bbox(node);
        let anchor = node.attr("text-anchor").map(str::to_string);
        let offset = match anchor.as_deref() {
            Some("end") => bbox.width,
            Some("middle") => bbox.width / 2.0,
            Some("default") => {
                node.set_attr("text-anchor", "start");
                0.0
            }
            _ => 0.0,
        };
        let x = int_attr(node, "x") - offset;
        let y = int_attr(node, "y");

        self.set_font_size(surface, font_size);
        let text = node.text_content();
        surface.text(k * x, k * y, &text);
        style::sanitize(node, style::TEXT_ATTRS);
    }

    fn apply_shape_style<S: DrawingSurface + ?Sized>(&mut self, style: &Style, surface: &mut S) {
        if let Some(color) = style.fill.color() {
            self.set_fill(surface, color);
        }
        if let Some(width) = style.stroke_width {
            self.set_line_width(surface, width);
        }
        if let Some(color) = style.stroke.color() {
            self.set_draw(surface, color);
        }
    }

    /// Re-issue whatever differs from `saved`, including values the group set
    /// for the first time.
    fn restore<S: DrawingSurface + ?Sized>(&mut self, saved: &SurfaceState, surface: &mut S) {
        if self.state == *saved {
            return;
        }
        log::trace!("restoring surface state at group boundary");
        if self.state.fill != saved.fill {
            self.set_fill(surface, saved.fill);
        }
        if self.state.draw != saved.draw {
            self.set_draw(surface, saved.draw);
        }
        if self.state.text != saved.text {
            self.set_text_color(surface, saved.text);
        }
        if !same_number(self.state.line_width, saved.line_width) {
            self.set_line_width(surface, saved.line_width);
        }
        if self.state.font != saved.font {
            self.set_font(surface, saved.font);
        }
        if self.state.font_type != saved.font_type {
            self.set_font_type(surface, saved.font_type);
        }
        if !same_number(self.state.font_size, saved.font_size) {
            self.set_font_size(surface, saved.font_size);
        }
    }

    fn set_fill<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, color: Rgb) {
        self.state.fill = color;
        surface.set_fill_color(color);
    }

    fn set_draw<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, color: Rgb) {
        self.state.draw = color;
        surface.set_draw_color(color);
    }

    fn set_text_color<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, color: Rgb) {
        self.state.text = color;
        surface.set_text_color(color);
    }

    fn set_line_width<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, width: f64) {
        self.state.line_width = width;
        surface.set_line_width(width);
    }

    fn set_font<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, family: FontFamily) {
        self.state.font = family;
        surface.set_font(family);
    }

    fn set_font_type<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, style: FontStyle) {
        self.state.font_type = style;
        surface.set_font_type(style);
    }

    fn set_font_size<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, size: f64) {
        self.state.font_size = size;
        surface.set_font_size(size);
    }
}

fn int_attr(node: &Node, name: &str) -> f64 {
    parse_int_attr(node.attr(name))
}

/// Equality that treats two NaNs as the same value.
fn same_number(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedWidth;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn run(root: &mut Node, options: &ConvertOptions) -> Vec<DrawCommand> {
        let mut surface = RecordingSurface::new();
        convert_with(root, &mut surface, options, &FixedWidth(40.0));
        surface.into_commands()
    }

    #[test]
    fn rect_with_fill_draws_in_fill_mode() {
        let mut root = Node::new("svg").with_child(
            Node::new("rect")
                .with_attr("x", "10")
                .with_attr("y", "20")
                .with_attr("width", "30")
                .with_attr("height", "40")
                .with_attr("fill", "#ff0000")
                .with_attr("id", "r1"),
        );
        let cmds = run(&mut root, &ConvertOptions::default());
        assert_eq!(
            cmds,
            vec![
                DrawCommand::SetFillColor(Rgb::new(255, 0, 0)),
                DrawCommand::Rect {
                    x: 10.0,
                    y: 20.0,
                    width: 30.0,
                    height: 40.0,
                    mode: PaintMode::Fill
                },
            ]
        );
        let rect = root.children().next().unwrap();
        assert_eq!(rect.attr_names(), vec!["x", "y", "width", "height", "fill"]);
    }

    #[test]
    fn middle_anchor_shifts_by_half_width() {
        let mut root = Node::new("svg").with_child(
            Node::new("text")
                .with_attr("x", "100")
                .with_attr("y", "50")
                .with_attr("text-anchor", "middle")
                .with_text("Hello"),
        );
        let cmds = run(&mut root, &ConvertOptions { scale: 2.0, ..Default::default() });
        let text = cmds.iter().find(|c| matches!(c, DrawCommand::Text { .. })).unwrap();
        assert_eq!(
            text,
            &DrawCommand::Text {
                x: 160.0,
                y: 100.0,
                text: "Hello".into()
            }
        );
    }

    #[test]
    fn text_font_attributes_are_normalized() {
        let mut root = Node::new("svg").with_child(
            Node::new("text")
                .with_attr("x", "0")
                .with_attr("y", "0")
                .with_attr("font-family", "Comic Sans")
                .with_attr("font-weight", "normal")
                .with_attr("font-style", "italic")
                .with_attr("font-size", "12")
                .with_attr("text-anchor", "default")
                .with_attr("fill", "blue")
                .with_text("x"),
        );
        let cmds = run(&mut root, &ConvertOptions::default());
        assert_eq!(
            cmds,
            vec![
                DrawCommand::SetFont {
                    family: FontFamily::Helvetica
                },
                DrawCommand::SetTextColor(Rgb::new(0, 0, 255)),
                DrawCommand::SetFontType {
                    style: FontStyle {
                        bold: false,
                        italic: true
                    }
                },
                DrawCommand::SetFontSize { size: 12.0 },
                DrawCommand::Text {
                    x: 0.0,
                    y: 0.0,
                    text: "x".into()
                },
            ]
        );
        let text = root.children().next().unwrap();
        assert_eq!(text.attr("font-family"), Some("sans-serif"));
        assert_eq!(text.attr("text-anchor"), Some("start"));
        assert!(!text.has_attr("font-weight"));
        assert_eq!(text.attr("font-style"), Some("italic"));
    }

    #[test]
    fn group_recurses_before_pruning() {
        let mut root = Node::new("svg").with_child(
            Node::new("g")
                .with_attr("fill", "red")
                .with_attr("opacity", "0.5")
                .with_child(Node::new("circle").with_attr("cx", "5").with_attr("cy", "6").with_attr("r", "7")),
        );
        let cmds = run(&mut root, &ConvertOptions::default());
        assert_eq!(cmds[0], DrawCommand::SetFillColor(Rgb::new(255, 0, 0)));
        // The circle starts a fresh sibling list, so its mode is unset.
        assert_eq!(
            cmds[1],
            DrawCommand::Circle {
                cx: 5.0,
                cy: 6.0,
                r: 7.0,
                mode: PaintMode::Unset
            }
        );
        let g = root.children().next().unwrap();
        assert_eq!(g.attr_names(), vec!["fill"]);
    }

    #[test]
    fn unknown_tags_removed_only_on_request() {
        let tree = Node::new("svg")
            .with_child(Node::new("path").with_attr("d", "M0 0"))
            .with_child(Node::new("rect").with_attr("x", "1"));

        let mut kept = tree.clone();
        run(&mut kept, &ConvertOptions::default());
        assert_eq!(kept.children().next(), tree.children().next());

        let mut pruned = tree.clone();
        run(&mut pruned, &ConvertOptions { remove_invalid: true, ..Default::default() });
        let names: Vec<_> = pruned.children().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["rect"]);
    }

    #[test]
    fn paint_mode_leaks_to_later_siblings() {
        let mut root = Node::new("svg")
            .with_child(Node::new("rect").with_attr("fill", "red"))
            .with_child(Node::new("rect"));
        let cmds = run(&mut root, &ConvertOptions::default());
        let modes: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { mode, .. } => Some(*mode),
                _ => None,
            })
            .collect();
        assert_eq!(modes, vec![PaintMode::Fill, PaintMode::Fill]);

        let mut root = Node::new("svg")
            .with_child(Node::new("rect").with_attr("fill", "red"))
            .with_child(Node::new("rect"));
        let cmds = run(
            &mut root,
            &ConvertOptions {
                scoping: StateScoping::Isolated,
                ..Default::default()
            },
        );
        let last = cmds.last().unwrap();
        assert!(matches!(last, DrawCommand::Rect { mode: PaintMode::Unset, .. }));
    }

    #[test]
    fn isolated_scoping_restores_after_group() {
        let tree = Node::new("svg")
            .with_child(Node::new("line").with_attr("stroke-width", "1"))
            .with_child(Node::new("g").with_attr("stroke-width", "9"))
            .with_child(Node::new("line"));

        let mut leaky = tree.clone();
        let cmds = run(&mut leaky, &ConvertOptions::default());
        let widths: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetLineWidth { width } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![1.0, 9.0]);

        let mut isolated = tree.clone();
        let cmds = run(
            &mut isolated,
            &ConvertOptions {
                scoping: StateScoping::Isolated,
                ..Default::default()
            },
        );
        let widths: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetLineWidth { width } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![1.0, 9.0, 1.0]);
    }

    #[test]
    fn isolated_scoping_restores_defaults_first_set_in_group() {
        let mut root = Node::new("svg")
            .with_child(
                Node::new("g").with_child(
                    Node::new("text")
                        .with_attr("x", "0")
                        .with_attr("y", "0")
                        .with_attr("fill", "blue")
                        .with_attr("font-family", "serif")
                        .with_text("a"),
                ),
            )
            .with_child(Node::new("text").with_attr("x", "0").with_attr("y", "20").with_text("b"));
        let cmds = run(
            &mut root,
            &ConvertOptions {
                scoping: StateScoping::Isolated,
                ..Default::default()
            },
        );

        let after_a = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { text, .. } if text == "a"))
            .unwrap();
        let between = &cmds[after_a + 1..];
        assert_eq!(between[0], DrawCommand::SetTextColor(Rgb::BLACK));
        assert_eq!(
            between[1],
            DrawCommand::SetFont {
                family: FontFamily::Helvetica
            }
        );
        assert!(matches!(between.last(), Some(DrawCommand::Text { text, .. }) if text == "b"));
    }

    #[test]
    fn transparent_fill_leaves_mode_unset() {
        let mut root = Node::new("svg").with_child(
            Node::new("rect")
                .with_attr("x", "0")
                .with_attr("y", "0")
                .with_attr("width", "5")
                .with_attr("height", "5")
                .with_attr("fill", "transparent"),
        );
        let cmds = run(&mut root, &ConvertOptions::default());
        assert_eq!(
            cmds,
            vec![DrawCommand::Rect {
                x: 0.0,
                y: 0.0,
                width: 5.0,
                height: 5.0,
                mode: PaintMode::Unset
            }]
        );
    }

    #[test]
    fn malformed_numbers_pass_through_as_nan() {
        let mut root = Node::new("svg").with_child(Node::new("line").with_attr("x1", "abc"));
        let cmds = run(&mut root, &ConvertOptions::default());
        match &cmds[0] {
            DrawCommand::Line { x1, y1, .. } => {
                assert!(x1.is_nan());
                assert!(y1.is_nan());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn add_svg_records_offsets_and_chains() {
        let mut root = Node::new("svg").with_child(Node::new("circle").with_attr("cx", "1").with_attr("cy", "1").with_attr("r", "1"));
        let mut surface = RecordingSurface::new();
        let count = surface.add_svg(&mut root, 15.0, 25.0, None).commands().len();
        assert_eq!(count, 1);
    }
}
