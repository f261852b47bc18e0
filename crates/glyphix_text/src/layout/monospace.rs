//! Font-independent fixed-pitch layout
//!
//! Every character is one glyph cell of the same advance. Useful for tests
//! and headless hosts that have no font files to shape with.

use super::{typeset, GlyphLayoutProvider, GlyphShaper, LayoutRequest, LogicalGlyph, TextLayout};
use crate::font::Font;
use glyphix_core::{Point, Rect};

const DIGIT_NAMES: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Fixed-pitch layout with synthetic glyph metrics, in multiples of the font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceLayout {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl MonospaceLayout {
    pub fn new() -> Self {
        Self {
            advance: 0.6,
            ascent: 0.8,
            descent: 0.2,
        }
    }

    /// PostScript-style name for a character
    fn glyph_name(c: char) -> Option<String> {
        let name = match c {
            'a'..='z' | 'A'..='Z' => return Some(c.to_string()),
            '0'..='9' => DIGIT_NAMES[(c as u32 - '0' as u32) as usize],
            ' ' => "space",
            '.' => "period",
            ',' => "comma",
            ':' => "colon",
            '-' => "hyphen",
            '+' => "plus",
            '%' => "percent",
            '/' => "slash",
            '$' => "dollar",
            '\u{2026}' => "ellipsis",
            c if c.is_control() => return None,
            c => return Some(format!("uni{:04X}", c as u32)),
        };
        Some(name.to_string())
    }

    fn glyph_bounds(&self, c: char, size: f32) -> Rect {
        if c.is_whitespace() || c.is_control() {
            return Rect::ZERO;
        }
        let bottom = if matches!(c, 'g' | 'j' | 'p' | 'q' | 'y' | ',') {
            -self.descent * size
        } else {
            0.0
        };
        let side_bearing = 0.05 * size;
        Rect::new(
            side_bearing,
            bottom,
            self.advance * size - 2.0 * side_bearing,
            0.7 * size - bottom,
        )
    }
}

impl Default for MonospaceLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphShaper for MonospaceLayout {
    fn shape_glyphs(&self, text: &str, font: &Font) -> Vec<LogicalGlyph> {
        let size = font.size;
        text.char_indices()
            .map(|(cluster, c)| LogicalGlyph {
                cluster,
                glyph_id: u16::try_from(u32::from(c)).unwrap_or(0),
                glyph_name: Self::glyph_name(c),
                font: font.clone(),
                advance: if c == '\n' { 0.0 } else { self.advance * size },
                offset: Point::ZERO,
                bounds: self.glyph_bounds(c, size),
                ascent: self.ascent * size,
                descent: self.descent * size,
            })
            .collect()
    }

    fn line_metrics(&self, font: &Font) -> (f32, f32) {
        (self.ascent * font.size, self.descent * font.size)
    }
}

impl GlyphLayoutProvider for MonospaceLayout {
    fn layout(&self, request: &LayoutRequest) -> TextLayout {
        typeset(self, request)
    }
}
