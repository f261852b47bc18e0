//! Animated text label
//!
//! [`GlyphLabel`] owns the text configuration, lays it out whenever a
//! property that affects layout changes, and diffs the result against the
//! cells already on screen. The host forwards display ticks to
//! [`GlyphLabel::tick`] while the label is subscribed to its frame source
//! and presents [`GlyphLabel::snapshots`] afterwards.

use crate::cell::{CellId, GlyphCell};
use crate::color::ColorTransition;
use crate::config::TransitionConfig;
use crate::diff::CellStore;
use crate::font::Font;
use crate::layout::{GlyphLayoutProvider, LayoutRequest, LineBreakMode, TextAlignment};
use crate::scheduler::{self, TickOutcome};
use crate::snapshot::{GlyphSnapshot, SurfaceEvent};
use glyphix_animation::{FrameContext, FrameLink, FrameSource};
use glyphix_core::{Appearance, Color, Size, TextColor};

/// A text label whose glyphs animate between layouts
pub struct GlyphLabel<P: GlyphLayoutProvider> {
    provider: P,
    link: FrameLink,
    config: TransitionConfig,
    store: CellStore,
    color: ColorTransition,
    request: LayoutRequest,
    counts_down: bool,
    animations_disabled: bool,
    blur_enabled: bool,
    smooth_rendering_enabled: bool,
    content_size: Size,
}

impl<P: GlyphLayoutProvider> GlyphLabel<P> {
    pub fn new(provider: P, frames: impl FrameSource + 'static) -> Self {
        Self::with_config(provider, frames, TransitionConfig::standard())
    }

    pub fn with_config(
        provider: P,
        frames: impl FrameSource + 'static,
        config: TransitionConfig,
    ) -> Self {
        Self {
            provider,
            link: FrameLink::new(frames),
            config,
            store: CellStore::new(),
            color: ColorTransition::default(),
            request: LayoutRequest::new(String::new(), Font::default(), Size::ZERO),
            counts_down: false,
            animations_disabled: false,
            blur_enabled: true,
            smooth_rendering_enabled: false,
            content_size: Size::ZERO,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn text(&self) -> &str {
        &self.request.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.request.text == text {
            return;
        }
        self.request.text = text;
        self.relayout();
    }

    pub fn font(&self) -> &Font {
        &self.request.font
    }

    pub fn set_font(&mut self, font: Font) {
        if self.request.font == font {
            return;
        }
        self.request.font = font;
        self.relayout();
    }

    pub fn alignment(&self) -> TextAlignment {
        self.request.alignment
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        if self.request.alignment == alignment {
            return;
        }
        self.request.alignment = alignment;
        self.relayout();
    }

    pub fn line_break_mode(&self) -> LineBreakMode {
        self.request.line_break_mode
    }

    pub fn set_line_break_mode(&mut self, mode: LineBreakMode) {
        if self.request.line_break_mode == mode {
            return;
        }
        self.request.line_break_mode = mode;
        self.relayout();
    }

    /// 0 means no limit
    pub fn max_lines(&self) -> usize {
        self.request.max_lines
    }

    pub fn set_max_lines(&mut self, max_lines: usize) {
        if self.request.max_lines == max_lines {
            return;
        }
        self.request.max_lines = max_lines;
        self.relayout();
    }

    pub fn container_size(&self) -> Size {
        self.request.container
    }

    pub fn set_container_size(&mut self, size: Size) {
        if self.request.container == size {
            return;
        }
        self.request.container = size;
        self.relayout();
    }

    pub fn text_color(&self) -> TextColor {
        self.color.color()
    }

    pub fn set_text_color(&mut self, color: impl Into<TextColor>) {
        if self.color.set_color(color.into()) {
            self.color_changed();
        }
    }

    pub fn appearance(&self) -> Appearance {
        self.color.appearance()
    }

    pub fn set_appearance(&mut self, appearance: Appearance) {
        if self.color.set_appearance(appearance) {
            self.color_changed();
        }
    }

    /// Color glyphs are currently filled with
    pub fn current_color(&self) -> Color {
        self.color.value()
    }

    pub fn counts_down(&self) -> bool {
        self.counts_down
    }

    /// Flip the travel direction of later transitions, for decreasing numbers
    pub fn set_counts_down(&mut self, counts_down: bool) {
        self.counts_down = counts_down;
    }

    pub fn animations_disabled(&self) -> bool {
        self.animations_disabled
    }

    /// Disabling jumps every cell and the color to their final state
    pub fn set_animations_disabled(&mut self, disabled: bool) {
        if self.animations_disabled == disabled {
            return;
        }
        self.animations_disabled = disabled;
        if disabled {
            self.settle_to_target();
        }
        self.update_subscription();
    }

    pub fn blur_enabled(&self) -> bool {
        self.blur_enabled
    }

    pub fn set_blur_enabled(&mut self, enabled: bool) {
        if self.blur_enabled == enabled {
            return;
        }
        self.blur_enabled = enabled;
        if !enabled {
            self.store.clear_blur();
            self.update_subscription();
        }
    }

    pub fn smooth_rendering_enabled(&self) -> bool {
        self.smooth_rendering_enabled
    }

    /// Font smoothing for every glyph; changing it repaints all cells
    pub fn set_smooth_rendering_enabled(&mut self, enabled: bool) {
        if self.smooth_rendering_enabled == enabled {
            return;
        }
        self.smooth_rendering_enabled = enabled;
        self.store.invalidate_display();
    }

    pub fn animation_speed(&self) -> f32 {
        self.link.speed()
    }

    /// Scale elapsed frame time; 0 freezes animations in place
    pub fn set_animation_speed(&mut self, speed: f32) {
        self.link.set_speed(speed);
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Size of the current text box from the last layout
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Size the current text would need within `constrained`
    pub fn size_fitting(&self, constrained: Size) -> Size {
        self.provider.size_fitting(&self.request, constrained)
    }

    fn relayout(&mut self) {
        let layout = self.provider.layout(&self.request);
        self.content_size = layout.size;

        let summary = self.store.reconcile(&layout.glyphs, self.color.value());
        if self.animations_disabled {
            self.store.remove_invalid();
            self.store.settle_all();
        } else {
            self.store
                .apply_stagger(&summary, &self.config, self.counts_down, self.blur_enabled);
        }

        tracing::debug!(
            "GlyphLabel: relayout {:?}: {} reused, {} appeared, {} disappeared",
            self.request.text,
            summary.reused,
            summary.appeared.len(),
            summary.disappeared.len()
        );
        self.update_subscription();
    }

    fn color_changed(&mut self) {
        if self.animations_disabled {
            self.color.snap();
            self.store.set_fill_color(self.color.value());
        }
        self.update_subscription();
    }

    fn settle_to_target(&mut self) {
        self.color.snap();
        self.store.set_fill_color(self.color.value());
        self.store.remove_invalid();
        self.store.settle_all();
    }

    fn is_idle(&self) -> bool {
        !self.store.is_animating() && self.color.is_completed()
    }

    fn update_subscription(&mut self) {
        if self.animations_disabled || self.is_idle() {
            self.link.release();
        } else {
            self.link.request();
        }
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    pub fn is_subscribed(&self) -> bool {
        self.link.is_subscribed()
    }

    pub fn is_animating(&self) -> bool {
        !self.is_idle()
    }

    /// Advance every animation to the frame's target time
    pub fn tick(&mut self, frame: &FrameContext) -> TickOutcome {
        if self.animations_disabled {
            return TickOutcome::default();
        }
        let dt = self.link.delta(frame);
        if dt <= 0.0 {
            return TickOutcome::default();
        }

        let color = self.color.step(&self.config.springs.color, dt);
        let outcome =
            scheduler::step_cells(&mut self.store, dt, &self.config, self.blur_enabled, color);

        if self.is_idle() && self.link.is_subscribed() {
            tracing::debug!("GlyphLabel: idle, releasing frame source");
            self.link.release();
        }
        outcome
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn cells(&self) -> &CellStore {
        &self.store
    }

    pub fn cell(&self, id: CellId) -> Option<&GlyphCell> {
        self.store.get(id)
    }

    pub fn cell_count(&self) -> usize {
        self.store.len()
    }

    /// One snapshot per live cell, in arena order
    pub fn snapshots(&self) -> Vec<GlyphSnapshot> {
        self.store
            .iter()
            .map(|(id, cell)| GlyphSnapshot::from_cell(id, cell, self.smooth_rendering_enabled))
            .collect()
    }

    pub fn drain_surface_events(&mut self) -> Vec<SurfaceEvent> {
        self.store.drain_events()
    }
}

impl<P: GlyphLayoutProvider + std::fmt::Debug> std::fmt::Debug for GlyphLabel<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphLabel")
            .field("provider", &self.provider)
            .field("text", &self.request.text)
            .field("cells", &self.store.len())
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}
