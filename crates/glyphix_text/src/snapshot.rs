//! Render hand-off
//!
//! The label never draws. Each frame the host reads one [`GlyphSnapshot`]
//! per live cell and applies the [`SurfaceEvent`]s that describe which
//! surfaces to create, destroy or repaint.

use crate::cell::{CellId, GlyphCell, GlyphPayload};
use glyphix_core::{Affine2D, Color, Point, Rect};

/// Change to the set of surfaces the host keeps for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceEvent {
    /// A cell was created; give it a surface
    Attached(CellId),
    /// A cell was removed; drop its surface
    Detached(CellId),
    /// A cell's content changed; repaint its surface
    NeedsDisplay(CellId),
}

impl SurfaceEvent {
    pub fn cell(&self) -> CellId {
        match *self {
            SurfaceEvent::Attached(id)
            | SurfaceEvent::Detached(id)
            | SurfaceEvent::NeedsDisplay(id) => id,
        }
    }
}

/// Everything needed to present one cell for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSnapshot {
    pub id: CellId,
    pub key: String,
    pub presentation_frame: Rect,
    /// Applied about the center of `presentation_frame`
    pub transform: Affine2D,
    pub opacity: f32,
    /// Gaussian blur radius in whole pixels
    pub blur_radius: f32,
    pub fill_color: Color,
    pub glyph: GlyphPayload,
    /// Scale from the glyph's final cell size to `presentation_frame`'s size
    pub content_scale: [f32; 2],
    /// Glyph origin inside the cell at its final size, y down
    pub baseline_origin: Point,
    /// Draw with font smoothing in addition to antialiasing
    pub smooth_rendering: bool,
}

impl GlyphSnapshot {
    pub fn from_cell(id: CellId, cell: &GlyphCell, smooth_rendering: bool) -> Self {
        Self {
            id,
            key: cell.key().to_string(),
            presentation_frame: cell.presentation_frame(),
            transform: cell.transform(),
            opacity: cell.opacity(),
            blur_radius: cell.blur_radius().round(),
            fill_color: cell.fill_color(),
            glyph: cell.payload().clone(),
            content_scale: cell.content_scale(),
            baseline_origin: cell.payload().baseline_origin(cell.frame().size),
            smooth_rendering,
        }
    }

    /// `transform` expressed in the container's coordinate space
    pub fn container_transform(&self) -> Affine2D {
        let center = self.presentation_frame.center();
        Affine2D::translation(center.x, center.y)
            .then(&self.transform)
            .then(&Affine2D::translation(-center.x, -center.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransitionConfig;
    use crate::font::Font;
    use crate::layout::PlacedGlyph;
    use slotmap::SlotMap;

    fn cell() -> GlyphCell {
        GlyphCell::new(
            &PlacedGlyph {
                font: Font::system(20.0),
                glyph_id: 36,
                glyph_name: Some("A".to_string()),
                bounding_rect: Rect::new(1.0, 0.0, 10.0, 14.0),
                layout_rect: Rect::new(10.0, 0.0, 12.0, 30.0),
                ascent: 16.0,
                descent: 4.0,
            },
            Color::RED,
        )
    }

    #[test]
    fn test_snapshot_rounds_blur() {
        let mut cells: SlotMap<CellId, GlyphCell> = SlotMap::with_key();
        let mut cell = cell();
        // ln(30) / ln(3) is just over 3.
        cell.configure_appear(&TransitionConfig::standard(), false, true);
        let id = cells.insert(cell);

        let snapshot = GlyphSnapshot::from_cell(id, &cells[id], false);
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.key, "A");
        assert_eq!(snapshot.blur_radius, 3.0);
        assert_eq!(snapshot.opacity, 0.0);
        assert_eq!(snapshot.fill_color, Color::RED);
        assert_eq!(snapshot.baseline_origin, Point::new(0.0, 26.0));
        assert!(!snapshot.smooth_rendering);
    }

    #[test]
    fn test_container_transform_keeps_center_fixed() {
        let mut cells: SlotMap<CellId, GlyphCell> = SlotMap::with_key();
        let mut cell = cell();
        cell.configure_appear(&TransitionConfig::standard(), false, false);
        let id = cells.insert(cell);

        let snapshot = GlyphSnapshot::from_cell(id, &cells[id], false);
        let transform = snapshot.container_transform();
        let center = snapshot.presentation_frame.center();
        let moved = transform.transform_point(center);
        // Only the vertical travel (a third of 30) moves the center.
        assert!((moved.x - center.x).abs() < 1e-4);
        assert!((moved.y - (center.y + 10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_event_cell() {
        let mut cells: SlotMap<CellId, GlyphCell> = SlotMap::with_key();
        let id = cells.insert(cell());
        assert_eq!(SurfaceEvent::Detached(id).cell(), id);
    }
}
