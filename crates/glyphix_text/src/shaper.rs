//! Text shaping using rustybuzz (HarfBuzz)
//!
//! Converts a run of text in a single face into glyphs with advances and
//! cluster indices, applying kerning and ligatures.

use crate::font::FontFace;
use rustybuzz::{Face, UnicodeBuffer};

/// A shaped glyph, in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    /// Byte offset of the source cluster within the shaped text
    pub cluster: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
}

/// Result of shaping a text run
#[derive(Debug, Clone)]
pub struct ShapedText {
    pub glyphs: Vec<ShapedGlyph>,
    pub font_size: f32,
    pub units_per_em: u16,
}

impl ShapedText {
    /// Scale a font-unit value to pixels
    pub fn scale(&self, value: i32) -> f32 {
        value as f32 * self.font_size / self.units_per_em as f32
    }

    /// Total advance width in pixels
    pub fn width_px(&self) -> f32 {
        self.scale(self.glyphs.iter().map(|g| g.x_advance).sum())
    }
}

/// Text shaper using HarfBuzz via rustybuzz
#[derive(Debug, Default, Clone, Copy)]
pub struct TextShaper;

impl TextShaper {
    pub fn new() -> Self {
        Self
    }

    /// Shape a text run using the given face
    pub fn shape(&self, text: &str, font_face: &FontFace, font_size: f32) -> ShapedText {
        let Some(face) = Face::from_slice(font_face.data(), font_face.face_index()) else {
            tracing::warn!(
                "TextShaper: rustybuzz rejected '{}', using nominal advances",
                font_face.family_name()
            );
            return self.fallback_shape(text, font_face, font_size);
        };

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&face, &[], buffer);

        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                cluster: info.cluster,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                x_advance: pos.x_advance,
            })
            .collect();

        ShapedText {
            glyphs,
            font_size,
            units_per_em: font_face.metrics().units_per_em,
        }
    }

    /// One glyph per character with nominal advances, no kerning
    fn fallback_shape(&self, text: &str, font_face: &FontFace, font_size: f32) -> ShapedText {
        let glyphs = text
            .char_indices()
            .map(|(cluster, c)| {
                let glyph_id = font_face.glyph_id(c).unwrap_or(0);
                let advance = font_face.glyph_advance(glyph_id).unwrap_or(0) as i32;
                ShapedGlyph {
                    glyph_id,
                    cluster: cluster as u32,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: advance,
                }
            })
            .collect();

        ShapedText {
            glyphs,
            font_size,
            units_per_em: font_face.metrics().units_per_em,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shaped_text_scaling() {
        let shaped = ShapedText {
            glyphs: vec![
                ShapedGlyph {
                    glyph_id: 1,
                    cluster: 0,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: 500,
                },
                ShapedGlyph {
                    glyph_id: 2,
                    cluster: 1,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: 250,
                },
            ],
            font_size: 20.0,
            units_per_em: 1000,
        };
        assert_eq!(shaped.scale(500), 10.0);
        assert_eq!(shaped.width_px(), 15.0);
    }
}
