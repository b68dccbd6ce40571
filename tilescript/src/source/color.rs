//! Color strings for `backgroundColor`.
//!
//! Accepted forms are `#RRGGBB`, `#RRGGBBAA` (alpha last) and a handful of
//! color names. Anything else is a [`ColorParseError`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned for an unparseable color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{input}': {reason}")]
pub struct ColorParseError {
    pub input: String,
    pub reason: &'static str,
}

const NAMED_COLORS: [(&str, Color); 8] = [
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("gray", Color::rgb(128, 128, 128)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("transparent", Color::rgba(0, 0, 0, 0)),
];

impl Color {
    /// Opaque black, the default placeholder background.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Parses a color string.
pub fn parse_color(input: &str) -> Result<Color, ColorParseError> {
    let trimmed = input.trim();
    let error = |reason| ColorParseError {
        input: input.to_string(),
        reason,
    };

    let Some(hex) = trimmed.strip_prefix('#') else {
        return NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, color)| *color)
            .ok_or_else(|| error("expected '#RRGGBB', '#RRGGBBAA' or a color name"));
    };

    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(error("contains non-hexadecimal digits"));
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match hex.len() {
        6 => Ok(Color::rgb(
            channel(0).map_err(|_| error("bad red channel"))?,
            channel(2).map_err(|_| error("bad green channel"))?,
            channel(4).map_err(|_| error("bad blue channel"))?,
        )),
        8 => Ok(Color::rgba(
            channel(0).map_err(|_| error("bad red channel"))?,
            channel(2).map_err(|_| error("bad green channel"))?,
            channel(4).map_err(|_| error("bad blue channel"))?,
            channel(6).map_err(|_| error("bad alpha channel"))?,
        )),
        _ => Err(error("expected 6 or 8 hexadecimal digits")),
    }
}
