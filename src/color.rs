//! Permissive color parsing for `fill` and `stroke` values.
//!
//! Accepts CSS named colors, `#rgb` / `#rrggbb`, `rgb()` / `rgba()` and the
//! other functional forms `svgtypes` understands, plus bare hex digits without
//! the leading `#`. Anything else (including `none`) is an invalid color, and
//! so is anything fully transparent (`transparent`, `#0000`, `rgba(.., 0)`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple. Alpha is dropped; PDF output is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a color string. Returns `None` when the value is not a color.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }

    if let Ok(c) = svgtypes::Color::from_str(&value) {
        if c.alpha == 0 {
            return None;
        }
        return Some(Rgb::new(c.red, c.green, c.blue));
    }

    parse_bare_hex(&value)
}

/// `ff0000` / `f00` without the leading `#`.
fn parse_bare_hex(value: &str) -> Option<Rgb> {
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match value.len() {
        3 => {
            let expand = |i: usize| channel(value[i..i + 1].repeat(2).as_str());
            Some(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Rgb::new(
            channel(&value[0..2])?,
            channel(&value[2..4])?,
            channel(&value[4..6])?,
        )),
        _ => None,
    }
}
