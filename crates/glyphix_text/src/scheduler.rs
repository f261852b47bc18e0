//! Per-frame stepping of glyph cells

use crate::config::TransitionConfig;
use crate::diff::CellStore;
use glyphix_core::Color;

/// What one tick changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Animating cells whose delay had run out
    pub stepped: usize,
    /// Cells removed after fading out
    pub removed: usize,
    /// Whether the host should present a new frame
    pub needs_redraw: bool,
}

/// Step every cell by `dt`, then remove the ones that finished leaving.
///
/// A new `color` is pushed into each cell before it is stepped.
pub fn step_cells(
    store: &mut CellStore,
    dt: f32,
    config: &TransitionConfig,
    blur_enabled: bool,
    color: Option<Color>,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    for (_, cell) in store.iter_mut() {
        if let Some(color) = color {
            cell.set_fill_color(color);
        }
        if cell.is_animating() && cell.advance(dt, config, blur_enabled) {
            outcome.stepped += 1;
        }
    }

    let removed = store.reap();
    outcome.removed = removed.len();
    outcome.needs_redraw = color.is_some() || outcome.stepped > 0 || outcome.removed > 0;

    tracing::trace!(
        "step_cells: dt={:.4} stepped={} removed={} live={}",
        dt,
        outcome.stepped,
        outcome.removed,
        store.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font;
    use crate::layout::PlacedGlyph;
    use glyphix_core::Rect;

    fn glyph(name: &str) -> PlacedGlyph {
        PlacedGlyph {
            font: Font::system(20.0),
            glyph_id: 1,
            glyph_name: Some(name.to_string()),
            bounding_rect: Rect::new(1.0, 0.0, 10.0, 14.0),
            layout_rect: Rect::new(0.0, 0.0, 12.0, 20.0),
            ascent: 16.0,
            descent: 4.0,
        }
    }

    #[test]
    fn test_idle_store_does_not_redraw() {
        let config = TransitionConfig::standard();
        let mut store = CellStore::new();
        store.reconcile(&[glyph("A")], Color::BLACK);
        store.settle_all();

        let outcome = step_cells(&mut store, 1.0 / 60.0, &config, true, None);
        assert_eq!(outcome, TickOutcome::default());
        assert!(!store.is_animating());
    }

    #[test]
    fn test_color_pushed_to_cells() {
        let config = TransitionConfig::standard();
        let mut store = CellStore::new();
        let summary = store.reconcile(&[glyph("A")], Color::BLACK);

        let outcome = step_cells(&mut store, 1.0 / 60.0, &config, true, Some(Color::RED));
        assert!(outcome.needs_redraw);
        assert_eq!(store.get(summary.appeared[0]).unwrap().fill_color(), Color::RED);
    }

    #[test]
    fn test_removed_in_the_tick_opacity_drops() {
        let config = TransitionConfig::standard();
        let mut store = CellStore::new();
        store.reconcile(&[glyph("A")], Color::BLACK);
        let summary = store.reconcile(&[], Color::BLACK);
        store.apply_stagger(&summary, &config, false, true);

        let mut ticks = 0;
        loop {
            let outcome = step_cells(&mut store, 1.0 / 60.0, &config, true, None);
            ticks += 1;
            assert!(store
                .iter()
                .all(|(_, cell)| !(cell.is_invalid() && !cell.is_visible())));
            if outcome.removed == 1 {
                break;
            }
            assert!(ticks < 600);
        }
        assert!(store.is_empty());
        assert_eq!(store.bucket_count(), 0);
    }
}
