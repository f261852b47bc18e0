//! Glyph identity diffing
//!
//! Live cells are kept in an arena and indexed by glyph name. Reconciling a
//! new layout claims, for each placed glyph in order, the first cell under
//! the same name that hasn't been claimed yet and isn't on its way out.
//! Unclaimed glyphs get new cells; unclaimed cells are left to disappear.

use crate::cell::{CellId, GlyphCell, Transition};
use crate::config::TransitionConfig;
use crate::layout::PlacedGlyph;
use crate::snapshot::SurfaceEvent;
use glyphix_core::Color;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

/// What one reconcile pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffSummary {
    /// Cells claimed by the new layout
    pub reused: usize,
    /// New cells, in layout order
    pub appeared: Vec<CellId>,
    /// Unclaimed cells, left to right
    pub disappeared: Vec<CellId>,
}

/// Arena of live cells plus the name index used to match them
#[derive(Debug, Default)]
pub struct CellStore {
    cells: SlotMap<CellId, GlyphCell>,
    buckets: FxHashMap<String, SmallVec<[CellId; 2]>>,
    events: Vec<SurfaceEvent>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, id: CellId) -> Option<&GlyphCell> {
        self.cells.get(id)
    }

    /// Cells in arena order
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &GlyphCell)> {
        self.cells.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (CellId, &mut GlyphCell)> {
        self.cells.iter_mut()
    }

    /// Cells registered under `key`, in insertion order
    pub fn bucket(&self, key: &str) -> &[CellId] {
        match self.buckets.get(key) {
            Some(bucket) => bucket.as_slice(),
            None => &[],
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_animating(&self) -> bool {
        self.cells.values().any(GlyphCell::is_animating)
    }

    pub fn insert(&mut self, cell: GlyphCell) -> CellId {
        let key = cell.key().to_string();
        let id = self.cells.insert(cell);
        self.buckets.entry(key).or_default().push(id);
        self.events.push(SurfaceEvent::Attached(id));
        id
    }

    pub fn remove(&mut self, id: CellId) -> Option<GlyphCell> {
        let cell = self.cells.remove(id)?;
        if let Some(bucket) = self.buckets.get_mut(cell.key()) {
            bucket.retain(|candidate| *candidate != id);
            if bucket.is_empty() {
                self.buckets.remove(cell.key());
            }
        }
        self.events.push(SurfaceEvent::Detached(id));
        Some(cell)
    }

    /// Match `glyphs` against live cells, creating cells for new glyphs
    pub fn reconcile(&mut self, glyphs: &[PlacedGlyph], fill_color: Color) -> DiffSummary {
        for cell in self.cells.values_mut() {
            cell.mark_invalid();
        }

        let mut summary = DiffSummary::default();
        for glyph in glyphs {
            if let Some(id) = self.claim(glyph.identity_key()) {
                if let Some(cell) = self.cells.get_mut(id) {
                    cell.reuse(glyph);
                    summary.reused += 1;
                    continue;
                }
            }
            let id = self.insert(GlyphCell::new(glyph, fill_color));
            summary.appeared.push(id);
        }

        let mut leaving: Vec<(CellId, f32)> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_invalid())
            .map(|(id, cell)| (id, cell.frame().min_x()))
            .collect();
        leaving.sort_by(|a, b| a.1.total_cmp(&b.1));
        summary.disappeared = leaving.into_iter().map(|(id, _)| id).collect();

        summary
    }

    /// First cell under `key` still unclaimed in this pass and not leaving
    fn claim(&self, key: &str) -> Option<CellId> {
        if key.is_empty() {
            return None;
        }
        for &id in self.buckets.get(key)? {
            let Some(cell) = self.cells.get(id) else {
                debug_assert!(false, "bucket '{}' holds a removed cell", key);
                tracing::warn!("CellStore: bucket '{}' holds a removed cell, skipping", key);
                continue;
            };
            if cell.is_invalid() && cell.is_appearing_or_idle() {
                return Some(id);
            }
        }
        None
    }

    /// Start appear and disappear transitions for a reconcile result
    pub fn apply_stagger(
        &mut self,
        summary: &DiffSummary,
        config: &TransitionConfig,
        counts_down: bool,
        blur_enabled: bool,
    ) {
        let unit = config.stagger_unit(summary.appeared.len(), summary.disappeared.len());

        for (index, &id) in summary.appeared.iter().enumerate() {
            if let Some(cell) = self.cells.get_mut(id) {
                cell.set_delay(index as f32 * unit);
                cell.configure(Transition::Appear, config, counts_down, blur_enabled);
            }
        }

        for (index, &id) in summary.disappeared.iter().enumerate() {
            if let Some(cell) = self.cells.get_mut(id) {
                // Already moving cells turn around without waiting.
                if !cell.is_animating() {
                    cell.set_delay(index as f32 * unit);
                }
                cell.configure(Transition::Disappear, config, counts_down, blur_enabled);
            }
        }
    }

    /// Remove cells that left the layout and have faded out
    pub fn reap(&mut self) -> Vec<CellId> {
        let gone: Vec<CellId> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_invalid() && !cell.is_visible())
            .map(|(id, _)| id)
            .collect();
        for &id in &gone {
            self.remove(id);
        }
        gone
    }

    /// Remove every cell that left the layout, visible or not
    pub fn remove_invalid(&mut self) -> usize {
        let invalid: Vec<CellId> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_invalid())
            .map(|(id, _)| id)
            .collect();
        for &id in &invalid {
            self.remove(id);
        }
        invalid.len()
    }

    pub fn settle_all(&mut self) {
        for cell in self.cells.values_mut() {
            cell.settle();
        }
    }

    pub fn clear_blur(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear_blur();
        }
    }

    pub fn set_fill_color(&mut self, color: Color) {
        for cell in self.cells.values_mut() {
            cell.set_fill_color(color);
        }
    }

    /// Ask for every cell to be repainted
    pub fn invalidate_display(&mut self) {
        for cell in self.cells.values_mut() {
            cell.set_needs_display();
        }
    }

    /// Pending surface events, with repaints for every cell that changed content
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        let mut events = std::mem::take(&mut self.events);
        for (id, cell) in self.cells.iter_mut() {
            if cell.take_needs_display() {
                events.push(SurfaceEvent::NeedsDisplay(id));
            }
        }
        events
    }
}
