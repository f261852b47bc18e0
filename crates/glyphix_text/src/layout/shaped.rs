//! Layout backed by real font faces
//!
//! Text is split into runs by the first face that covers each character,
//! each run is shaped with rustybuzz, and glyph names come from the face's
//! `post`/`CFF` tables.

use super::{typeset, GlyphLayoutProvider, GlyphShaper, LayoutRequest, LogicalGlyph, TextLayout};
use crate::font::{Font, FontFace};
use crate::registry::FontRegistry;
use crate::shaper::TextShaper;
use crate::{Result, TextError};
use glyphix_core::{Point, Rect};
use std::ops::Range;
use std::sync::Arc;

/// Shaped layout over a primary face and ordered fallbacks
#[derive(Debug, Clone)]
pub struct ShapedLayout {
    faces: Vec<Arc<FontFace>>,
    shaper: TextShaper,
}

impl ShapedLayout {
    pub fn new(primary: Arc<FontFace>) -> Self {
        Self {
            faces: vec![primary],
            shaper: TextShaper::new(),
        }
    }

    /// Append a face tried for characters earlier faces don't cover
    pub fn with_fallback(mut self, face: Arc<FontFace>) -> Self {
        self.faces.push(face);
        self
    }

    /// Resolve `fonts` through the registry, skipping ones that fail to load
    pub fn from_registry(registry: &mut FontRegistry, fonts: &[Font]) -> Result<Self> {
        let mut faces = Vec::new();
        for font in fonts {
            match registry.load_font(font) {
                Ok(face) => faces.push(face),
                Err(e) => tracing::warn!("ShapedLayout: skipping '{}': {}", font.family, e),
            }
        }
        if faces.is_empty() {
            return Err(TextError::NoFonts);
        }
        Ok(Self {
            faces,
            shaper: TextShaper::new(),
        })
    }

    pub fn faces(&self) -> &[Arc<FontFace>] {
        &self.faces
    }

    /// Index of the face matching the requested family, or the primary
    fn preferred_face(&self, font: &Font) -> usize {
        self.faces
            .iter()
            .position(|face| face.family_name().eq_ignore_ascii_case(&font.family))
            .unwrap_or(0)
    }

    /// Face order for a request: preferred face first, then the rest
    fn face_order(&self, font: &Font) -> impl Iterator<Item = usize> + '_ {
        let preferred = self.preferred_face(font);
        std::iter::once(preferred).chain((0..self.faces.len()).filter(move |&i| i != preferred))
    }

    /// Split text into (face, byte range) runs
    fn itemize(&self, text: &str, font: &Font) -> Vec<(usize, Range<usize>)> {
        let preferred = self.preferred_face(font);
        let mut runs: Vec<(usize, Range<usize>)> = Vec::new();

        for (offset, c) in text.char_indices() {
            let end = offset + c.len_utf8();
            let face = if c.is_whitespace() || c.is_control() {
                runs.last().map_or(preferred, |(face, _)| *face)
            } else {
                self.face_order(font)
                    .find(|&i| self.faces[i].glyph_id(c).is_some_and(|id| id != 0))
                    .unwrap_or(preferred)
            };

            match runs.last_mut() {
                Some((run_face, range)) if *run_face == face => range.end = end,
                _ => runs.push((face, offset..end)),
            }
        }
        runs
    }
}

/// Identity key for a shaped glyph.
///
/// `.notdef` (glyph 0) stands in for every uncovered character, so it gets
/// no identity. Faces without glyph names fall back to `family#id`.
fn glyph_identity(face: &FontFace, glyph_id: u16) -> Option<String> {
    if glyph_id == 0 {
        return None;
    }
    face.glyph_name(glyph_id)
        .or_else(|| Some(format!("{}#{}", face.family_name(), glyph_id)))
}

impl GlyphShaper for ShapedLayout {
    fn shape_glyphs(&self, text: &str, font: &Font) -> Vec<LogicalGlyph> {
        let size = font.size;
        let mut glyphs = Vec::new();

        for (face_index, range) in self.itemize(text, font) {
            let face = &self.faces[face_index];
            let shaped = self.shaper.shape(&text[range.clone()], face, size);
            let metrics = face.metrics();
            let run_font = face.font(size);

            for glyph in &shaped.glyphs {
                glyphs.push(LogicalGlyph {
                    cluster: range.start + glyph.cluster as usize,
                    glyph_id: glyph.glyph_id,
                    glyph_name: glyph_identity(face, glyph.glyph_id),
                    font: run_font.clone(),
                    advance: shaped.scale(glyph.x_advance),
                    offset: Point::new(shaped.scale(glyph.x_offset), shaped.scale(glyph.y_offset)),
                    bounds: face.glyph_bounds(glyph.glyph_id, size).unwrap_or(Rect::ZERO),
                    ascent: metrics.ascent_px(size),
                    descent: metrics.descent_px(size),
                });
            }
        }
        glyphs
    }

    fn line_metrics(&self, font: &Font) -> (f32, f32) {
        let metrics = self.faces[self.preferred_face(font)].metrics();
        (metrics.ascent_px(font.size), metrics.descent_px(font.size))
    }
}

impl GlyphLayoutProvider for ShapedLayout {
    fn layout(&self, request: &LayoutRequest) -> TextLayout {
        typeset(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphix_core::Size;

    fn system_layout() -> Option<ShapedLayout> {
        let mut registry = FontRegistry::new();
        ShapedLayout::from_registry(&mut registry, &[Font::default()]).ok()
    }

    #[test]
    fn test_from_registry_without_fonts() {
        let mut registry = FontRegistry::empty();
        let result = ShapedLayout::from_registry(&mut registry, &[Font::new("Nope", 12.0)]);
        assert!(matches!(result, Err(TextError::NoFonts)));
    }

    #[test]
    fn test_shaped_glyphs_are_named_and_ordered() {
        let Some(provider) = system_layout() else {
            println!("No system fonts available - skipping test (CI environment)");
            return;
        };

        let request = LayoutRequest::new("AB", Font::default(), Size::new(500.0, 100.0));
        let layout = provider.layout(&request);
        assert_eq!(layout.glyphs.len(), 2);
        assert!(layout.glyphs.iter().all(|g| !g.identity_key().is_empty()));
        assert!(layout.glyphs[0].layout_rect.x() < layout.glyphs[1].layout_rect.x());
        assert!(layout.size.width > 0.0);
    }

    #[test]
    fn test_repeated_glyphs_share_names() {
        let Some(provider) = system_layout() else {
            println!("No system fonts available - skipping test (CI environment)");
            return;
        };

        let request = LayoutRequest::new("1212", Font::default(), Size::new(500.0, 100.0));
        let layout = provider.layout(&request);
        assert_eq!(layout.glyphs.len(), 4);
        assert_eq!(layout.glyphs[0].glyph_name, layout.glyphs[2].glyph_name);
        assert_ne!(layout.glyphs[0].glyph_name, layout.glyphs[1].glyph_name);
    }

    #[test]
    fn test_uncovered_glyphs_have_no_identity() {
        let Some(provider) = system_layout() else {
            println!("No system fonts available - skipping test (CI environment)");
            return;
        };

        let request = LayoutRequest::new(
            "1\u{E000}\u{E001}",
            Font::default(),
            Size::new(500.0, 100.0),
        );
        let layout = provider.layout(&request);
        assert!(!layout.glyphs.is_empty());
        assert!(layout.glyphs[0].glyph_name.is_some());
        for glyph in layout.glyphs.iter().filter(|g| g.glyph_id == 0) {
            assert_eq!(glyph.glyph_name, None);
            assert_eq!(glyph.identity_key(), "");
        }
    }
}
