//! A surface that records every call, in order

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{DrawingSurface, FontFamily, FontStyle, PaintMode};
use crate::color::Rgb;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    SetFillColor(Rgb),
    SetDrawColor(Rgb),
    SetTextColor(Rgb),
    SetLineWidth {
        width: f64,
    },
    SetFont {
        family: FontFamily,
    },
    SetFontType {
        style: FontStyle,
    },
    SetFontSize {
        size: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: PaintMode,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        mode: PaintMode,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        mode: PaintMode,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
    },
}

impl DrawCommand {
    /// True for commands that put marks on the page.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DrawCommand::Line { .. }
                | DrawCommand::Rect { .. }
                | DrawCommand::Ellipse { .. }
                | DrawCommand::Circle { .. }
                | DrawCommand::Text { .. }
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Only the commands that draw something.
    pub fn draw_commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_draw())
    }

    /// Pretty JSON of the command log. NaN coordinates serialize as `null`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.commands).map_err(|e| Error::SerializeError(e.to_string()))
    }

    /// Hex SHA-256 of the compact JSON command log.
    pub fn digest(&self) -> Result<String> {
        let json = serde_json::to_vec(&self.commands).map_err(|e| Error::SerializeError(e.to_string()))?;
        Ok(hex::encode(Sha256::digest(&json)))
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_fill_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::SetFillColor(color));
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::SetDrawColor(color));
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::SetTextColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth { width });
    }

    fn set_font(&mut self, family: FontFamily) {
        self.commands.push(DrawCommand::SetFont { family });
    }

    fn set_font_type(&mut self, style: FontStyle) {
        self.commands.push(DrawCommand::SetFontType { style });
    }

    fn set_font_size(&mut self, size: f64) {
        self.commands.push(DrawCommand::SetFontSize { size });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2 });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, mode: PaintMode) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            mode,
        });
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, mode: PaintMode) {
        self.commands.push(DrawCommand::Ellipse { cx, cy, rx, ry, mode });
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, mode: PaintMode) {
        self.commands.push(DrawCommand::Circle { cx, cy, r, mode });
    }

    fn text(&mut self, x: f64, y: f64, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut s = RecordingSurface::new();
        s.set_fill_color(Rgb::new(1, 2, 3));
        s.rect(0.0, 0.0, 10.0, 10.0, PaintMode::Fill);
        assert_eq!(s.commands().len(), 2);
        assert_eq!(s.commands()[0], DrawCommand::SetFillColor(Rgb::new(1, 2, 3)));
        assert_eq!(s.draw_commands().count(), 1);
    }

    #[test]
    fn json_uses_op_tags() {
        let mut s = RecordingSurface::new();
        s.circle(1.0, 2.0, 3.0, PaintMode::FillStroke);
        let json = s.to_json().unwrap();
        assert!(json.contains("\"op\": \"circle\""));
        assert!(json.contains("\"fill-stroke\""));
    }

    #[test]
    fn digest_is_stable_and_content_addressed() {
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        a.line(0.0, 0.0, 1.0, 1.0);
        b.line(0.0, 0.0, 1.0, 1.0);
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.digest().unwrap().len(), 64);
        b.line(0.0, 0.0, 2.0, 2.0);
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn nan_coordinates_serialize_as_null() {
        let mut s = RecordingSurface::new();
        s.line(f64::NAN, 0.0, 1.0, 1.0);
        let json = s.to_json().unwrap();
        assert!(json.contains("\"x1\": null"));
    }
}
