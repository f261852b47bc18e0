//! Fonts
//!
//! [`Font`] is the lightweight descriptor labels and placed glyphs carry
//! around. [`FontFace`] is a parsed OpenType face that can answer glyph
//! questions (names, bounds, advances) for the shaped layout.

use crate::{Result, TextError};
use glyphix_core::Rect;
use std::sync::Arc;

/// Font weight variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum FontWeight {
    Thin = 100,
    Light = 300,
    #[default]
    Regular = 400,
    Medium = 500,
    SemiBold = 600,
    Bold = 700,
    Black = 900,
}

impl FontWeight {
    /// Convert from numeric weight (100-900)
    pub fn from_number(weight: u16) -> Self {
        match weight {
            0..=199 => FontWeight::Thin,
            200..=349 => FontWeight::Light,
            350..=449 => FontWeight::Regular,
            450..=549 => FontWeight::Medium,
            550..=649 => FontWeight::SemiBold,
            650..=799 => FontWeight::Bold,
            _ => FontWeight::Black,
        }
    }

    pub fn to_number(self) -> u16 {
        self as u16
    }
}

/// A font as requested by a label: family, point size and weight
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub weight: FontWeight,
}

impl Font {
    /// Family name that stands for the platform UI font
    pub const SYSTEM_FAMILY: &'static str = "system-ui";

    /// Default point size for labels
    pub const LABEL_SIZE: f32 = 17.0;

    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::Regular,
        }
    }

    pub fn system(size: f32) -> Self {
        Self::new(Self::SYSTEM_FAMILY, size)
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn is_system(&self) -> bool {
        self.family == Self::SYSTEM_FAMILY
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(Self::LABEL_SIZE)
    }
}

/// Font metrics in font units
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub units_per_em: u16,
    /// Distance from baseline to top of tallest glyph
    pub ascender: i16,
    /// Distance from baseline to bottom (typically negative)
    pub descender: i16,
    pub line_gap: i16,
}

impl FontMetrics {
    /// Scale a value from font units to pixels
    pub fn scale(&self, value: f32, font_size: f32) -> f32 {
        value * font_size / self.units_per_em as f32
    }

    pub fn ascent_px(&self, font_size: f32) -> f32 {
        self.scale(self.ascender as f32, font_size)
    }

    /// Descent below the baseline as a positive distance
    pub fn descent_px(&self, font_size: f32) -> f32 {
        -self.scale(self.descender as f32, font_size)
    }
}

/// A parsed font face
pub struct FontFace {
    data: Arc<Vec<u8>>,
    /// Face index within the font file (for TTC files)
    face_index: u32,
    metrics: FontMetrics,
    family_name: String,
    weight: FontWeight,
}

impl FontFace {
    /// Load a font from raw TTF/OTF data (uses face index 0)
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Load a font from raw TTF/OTF data with a specific face index
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data = Arc::new(data);

        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParseError(format!("{:?}", e)))?;

        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        };

        let family_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let weight = face
            .tables()
            .os2
            .map(|os2| FontWeight::from_number(os2.weight().to_number()))
            .unwrap_or_default();

        Ok(Self {
            data,
            face_index,
            metrics,
            family_name,
            weight,
        })
    }

    /// Load a font from a file path
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| TextError::FontLoadError(format!("Failed to read file: {}", e)))?;
        Self::from_data(data)
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// Raw font data for shaping
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    /// Descriptor for this face at `size`
    pub fn font(&self, size: f32) -> Font {
        Font::new(self.family_name.clone(), size).with_weight(self.weight)
    }

    fn as_ttf_face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }

    /// Glyph ID for a character, if the face covers it
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.as_ttf_face()
            .and_then(|face| face.glyph_index(c))
            .map(|id| id.0)
    }

    /// Horizontal advance of a glyph in font units
    pub fn glyph_advance(&self, glyph_id: u16) -> Option<u16> {
        self.as_ttf_face()
            .and_then(|face| face.glyph_hor_advance(ttf_parser::GlyphId(glyph_id)))
    }

    /// PostScript glyph name from the `post` or `CFF` table
    pub fn glyph_name(&self, glyph_id: u16) -> Option<String> {
        self.as_ttf_face()?
            .glyph_name(ttf_parser::GlyphId(glyph_id))
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    }

    /// Glyph bounding box in pixels at `font_size`, y pointing up from the baseline
    pub fn glyph_bounds(&self, glyph_id: u16, font_size: f32) -> Option<Rect> {
        let bbox = self
            .as_ttf_face()?
            .glyph_bounding_box(ttf_parser::GlyphId(glyph_id))?;
        let scale = |v: i16| self.metrics.scale(v as f32, font_size);
        Some(Rect::new(
            scale(bbox.x_min),
            scale(bbox.y_min),
            scale(bbox.x_max) - scale(bbox.x_min),
            scale(bbox.y_max) - scale(bbox.y_min),
        ))
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family_name", &self.family_name)
            .field("weight", &self.weight)
            .field("face_index", &self.face_index)
            .finish_non_exhaustive()
    }
}
