//! Declarative slide records.
//!
//! Deck builders describe *what* goes on each slide with these types; the
//! `pptx` module decides how it is written out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// English Metric Units per inch, the OOXML length unit
pub const EMU_PER_INCH: i64 = 914_400;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color '{0}', expected #RRGGBB")]
    InvalidHex(String),
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase hex digits without the leading `#`, as OOXML expects
    pub fn hex_digits(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_digits())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidHex(s.to_string()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// A length in inches.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Inches(pub f64);

impl Inches {
    pub fn to_emu(self) -> i64 {
        (self.0 * EMU_PER_INCH as f64).round() as i64
    }
}

/// Position and size of a shape on the slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: Inches,
    pub y: Inches,
    pub width: Inches,
    pub height: Inches,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Inches(x),
            y: Inches(y),
            width: Inches(width),
            height: Inches(height),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    /// Size in points
    pub size: u32,
    pub bold: bool,
    pub color: Rgb,
}

impl Font {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            bold: false,
            color: Rgb::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A text box. Each line of `text` becomes its own paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub frame: Frame,
    pub text: String,
    pub font: Font,
    pub align: Align,
}

impl TextBox {
    pub fn new(frame: Frame, text: impl Into<String>, font: Font) -> Self {
        Self {
            frame,
            text: text.into(),
            font,
            align: Align::Left,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Title,
    Divider,
    Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub kind: SlideKind,
    /// Solid background fill; `None` keeps the master's background
    pub background: Option<Rgb>,
    pub shapes: Vec<TextBox>,
    /// Running number shown on content slides
    pub number: Option<u32>,
}

impl Slide {
    pub fn new(kind: SlideKind) -> Self {
        Self {
            kind,
            background: None,
            shapes: Vec::new(),
            number: None,
        }
    }

    pub fn with_background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn text_box(mut self, text_box: TextBox) -> Self {
        self.shapes.push(text_box);
        self
    }

    /// All text on the slide, in shape order
    pub fn texts(&self) -> Vec<&str> {
        self.shapes.iter().map(|s| s.text.as_str()).collect()
    }
}

/// An ordered list of slides plus page geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub title: String,
    pub width: Inches,
    pub height: Inches,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(title: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            title: title.into(),
            width: Inches(width),
            height: Inches(height),
            slides: Vec::new(),
        }
    }

    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Numbers carried by content slides, in deck order
    pub fn content_numbers(&self) -> Vec<u32> {
        self.slides
            .iter()
            .filter(|s| s.kind == SlideKind::Content)
            .filter_map(|s| s.number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#1F4E79".parse::<Rgb>(), Ok(Rgb::new(0x1F, 0x4E, 0x79)));
        assert_eq!("c0504d".parse::<Rgb>(), Ok(Rgb::new(0xC0, 0x50, 0x4D)));
        assert_eq!(" #ffffff ".parse::<Rgb>(), Ok(Rgb::WHITE));
    }

    #[test]
    fn test_parse_hex_invalid() {
        for bad in ["", "#", "#12345", "#1234567", "#GG0000", "red", "#+1+1+1"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_display_round_trips_through_serde() {
        let color = Rgb::new(50, 50, 50);
        assert_eq!(color.to_string(), "#323232");
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#323232\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }

    #[test]
    fn test_inches_to_emu() {
        assert_eq!(Inches(1.0).to_emu(), 914_400);
        assert_eq!(Inches(0.5).to_emu(), 457_200);
        assert_eq!(Inches(8.5).to_emu(), 7_772_400);
    }

    #[test]
    fn test_content_numbers_skip_other_slides() {
        let mut deck = Deck::new("d", 10.0, 7.5);
        deck.push(Slide::new(SlideKind::Title));
        deck.push(Slide::new(SlideKind::Divider));
        deck.push(Slide::new(SlideKind::Content).with_number(2));
        deck.push(Slide::new(SlideKind::Content).with_number(3));
        assert_eq!(deck.content_numbers(), vec![2, 3]);
        assert_eq!(deck.len(), 4);
    }
}
