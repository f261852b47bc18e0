//! Glyph cells
//!
//! A cell is the on-screen life of one glyph: where it is, where it's
//! heading, and the spring animations carrying it in or out. Cells outlive
//! the layout that created them so a glyph can be matched and moved by the
//! next layout, or animate out after the text no longer contains it.

use crate::config::TransitionConfig;
use crate::font::Font;
use crate::layout::PlacedGlyph;
use glyphix_animation::{AnimationState, SpringConfig};
use glyphix_core::{Affine2D, Color, Point, Rect, Size};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a glyph cell
    pub struct CellId;
}

/// Opacity below which a cell counts as gone
pub const VISIBILITY_THRESHOLD: f32 = 0.01;

/// Which way a cell is transitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Appear,
    Disappear,
}

/// What to draw inside a cell
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPayload {
    pub font: Font,
    pub glyph_id: u16,
    /// Ink bounds relative to the glyph origin (y up)
    pub bounding_rect: Rect,
    pub descent: f32,
}

impl GlyphPayload {
    pub fn from_placed(glyph: &PlacedGlyph) -> Self {
        Self {
            font: glyph.font.clone(),
            glyph_id: glyph.glyph_id,
            bounding_rect: glyph.bounding_rect,
            descent: glyph.descent,
        }
    }

    /// Glyph origin within a cell of `cell_size`, y down from the top-left.
    ///
    /// Ink hanging left of the pen or below the descent is shifted back
    /// inside the cell.
    pub fn baseline_origin(&self, cell_size: Size) -> Point {
        let bounds = self.bounding_rect;
        let above_bottom = self.descent - (bounds.min_y() + self.descent).min(0.0);
        Point::new(-bounds.min_x().min(0.0), cell_size.height - above_bottom)
    }
}

/// Animated state of one glyph on screen
#[derive(Debug, Clone)]
pub struct GlyphCell {
    key: String,
    frame: Rect,
    presentation_frame: Rect,
    frame_animation: Option<AnimationState<Rect>>,
    scale: f32,
    scale_animation: Option<AnimationState<f32>>,
    offset: f32,
    offset_animation: Option<AnimationState<f32>>,
    opacity: f32,
    opacity_animation: Option<AnimationState<f32>>,
    blur_radius: f32,
    blur_animation: Option<AnimationState<f32>>,
    delay: f32,
    invalid: bool,
    payload: GlyphPayload,
    transform: Affine2D,
    fill_color: Color,
    needs_display: bool,
}

impl GlyphCell {
    /// A settled cell showing `glyph` at its layout rect
    pub fn new(glyph: &PlacedGlyph, fill_color: Color) -> Self {
        Self {
            key: glyph.identity_key().to_string(),
            frame: glyph.layout_rect,
            presentation_frame: glyph.layout_rect,
            frame_animation: None,
            scale: 1.0,
            scale_animation: None,
            offset: 0.0,
            offset_animation: None,
            opacity: 1.0,
            opacity_animation: None,
            blur_radius: 0.0,
            blur_animation: None,
            delay: 0.0,
            invalid: false,
            payload: GlyphPayload::from_placed(glyph),
            transform: Affine2D::IDENTITY,
            fill_color,
            needs_display: true,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Where layout wants the cell
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Where the cell is drawn right now
    pub fn presentation_frame(&self) -> Rect {
        self.presentation_frame
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn blur_radius(&self) -> f32 {
        self.blur_radius
    }

    /// Seconds left before the cell starts animating
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Not part of the latest layout
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn payload(&self) -> &GlyphPayload {
        &self.payload
    }

    pub fn transform(&self) -> Affine2D {
        self.transform
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    pub fn frame_animation(&self) -> Option<&AnimationState<Rect>> {
        self.frame_animation.as_ref()
    }

    pub fn scale_animation(&self) -> Option<&AnimationState<f32>> {
        self.scale_animation.as_ref()
    }

    pub fn offset_animation(&self) -> Option<&AnimationState<f32>> {
        self.offset_animation.as_ref()
    }

    pub fn opacity_animation(&self) -> Option<&AnimationState<f32>> {
        self.opacity_animation.as_ref()
    }

    pub fn blur_animation(&self) -> Option<&AnimationState<f32>> {
        self.blur_animation.as_ref()
    }

    pub(crate) fn mark_invalid(&mut self) {
        self.invalid = true;
    }

    pub(crate) fn set_delay(&mut self, delay: f32) {
        self.delay = delay;
    }

    pub(crate) fn set_needs_display(&mut self) {
        self.needs_display = true;
    }

    pub(crate) fn take_needs_display(&mut self) -> bool {
        std::mem::take(&mut self.needs_display)
    }

    /// Move the cell; the presentation frame springs towards it
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        match &mut self.frame_animation {
            Some(animation) => animation.retarget(frame),
            None if frame != self.presentation_frame => {
                self.frame_animation = Some(AnimationState::new(self.presentation_frame, frame));
            }
            None => {}
        }
    }

    /// Claim this cell for `glyph` from a new layout
    pub fn reuse(&mut self, glyph: &PlacedGlyph) {
        let rect = glyph.layout_rect;
        if rect.size != self.frame.size {
            // Size jumps so the glyph isn't drawn stretched while it moves.
            self.presentation_frame.size = rect.size;
            if let Some(animation) = &mut self.frame_animation {
                animation.value.size = rect.size;
                animation.velocity.size = Size::ZERO;
            }
        }
        self.payload = GlyphPayload::from_placed(glyph);
        self.set_frame(rect);
        self.invalid = false;
        self.needs_display = true;
    }

    pub fn is_animating(&self) -> bool {
        self.frame_animation.is_some()
            || self.scale_animation.is_some()
            || self.offset_animation.is_some()
            || self.opacity_animation.is_some()
            || self.blur_animation.is_some()
    }

    pub fn is_visible(&self) -> bool {
        let opacity = self
            .opacity_animation
            .map_or(self.opacity, |animation| animation.value);
        opacity >= VISIBILITY_THRESHOLD
    }

    /// Idle, or at least one transition animation is heading to the settled state
    pub fn is_appearing_or_idle(&self) -> bool {
        let settling = [
            self.scale_animation.map(|a| a.target == 1.0),
            self.offset_animation.map(|a| a.target == 0.0),
            self.opacity_animation.map(|a| a.target == 1.0),
            self.blur_animation.map(|a| a.target == 0.0),
        ];
        settling.iter().all(Option::is_none) || settling.contains(&Some(true))
    }

    pub fn configure(
        &mut self,
        transition: Transition,
        config: &TransitionConfig,
        counts_down: bool,
        blur_enabled: bool,
    ) {
        match transition {
            Transition::Appear => self.configure_appear(config, counts_down, blur_enabled),
            Transition::Disappear => self.configure_disappear(config, counts_down, blur_enabled),
        }
    }

    /// Start small, displaced, transparent and blurred, springing to rest
    pub fn configure_appear(
        &mut self,
        config: &TransitionConfig,
        counts_down: bool,
        blur_enabled: bool,
    ) {
        let start_offset = if counts_down { -1.0 } else { 1.0 };

        self.scale = config.smallest_scale;
        self.scale_animation = Some(AnimationState::new(config.smallest_scale, 1.0));
        self.offset = start_offset;
        self.offset_animation = Some(AnimationState::new(start_offset, 0.0));
        self.opacity = 0.0;
        self.opacity_animation = Some(AnimationState::new(0.0, 1.0));
        if blur_enabled {
            let blur = config.appear_blur(self.frame.height());
            self.blur_radius = blur;
            self.blur_animation = Some(AnimationState::new(blur, 0.0));
        }

        self.update_transform(config);
        self.needs_display = true;
    }

    /// Spring from wherever the cell is now towards the exit state
    pub fn configure_disappear(
        &mut self,
        config: &TransitionConfig,
        counts_down: bool,
        blur_enabled: bool,
    ) {
        let end_offset = if counts_down { 1.0 } else { -1.0 };

        retarget_or_start(&mut self.scale_animation, self.scale, config.smallest_scale);
        retarget_or_start(&mut self.offset_animation, self.offset, end_offset);
        retarget_or_start(&mut self.opacity_animation, self.opacity, 0.0);
        if blur_enabled {
            let blur = config.disappear_blur(self.frame.height());
            retarget_or_start(&mut self.blur_animation, self.blur_radius, blur);
        }
    }

    /// Step every running animation by `dt`; returns false while delayed
    pub fn advance(&mut self, dt: f32, config: &TransitionConfig, blur_enabled: bool) -> bool {
        self.delay -= dt;
        if self.delay > 0.0 {
            return false;
        }

        let springs = &config.springs;
        if let Some(animation) = &mut self.frame_animation {
            let done = animation.step(&springs.frame, dt);
            self.presentation_frame = if done { self.frame } else { animation.value };
            if self.presentation_frame.size != self.frame.size || done {
                self.needs_display = true;
            }
            if done {
                self.frame_animation = None;
            }
        }

        step_property(&mut self.scale_animation, &mut self.scale, &springs.scale, dt);
        step_property(&mut self.offset_animation, &mut self.offset, &springs.offset, dt);
        self.update_transform(config);
        step_property(&mut self.opacity_animation, &mut self.opacity, &springs.opacity, dt);
        if blur_enabled {
            let before = self.blur_radius.round();
            step_property(&mut self.blur_animation, &mut self.blur_radius, &springs.blur, dt);
            if self.blur_radius.round() != before {
                self.needs_display = true;
            }
        }
        true
    }

    /// Scale, then shift by the offset's share of the frame height
    pub fn update_transform(&mut self, config: &TransitionConfig) {
        let travel = self.offset * self.frame.height() / config.offset_travel_divisor;
        self.transform =
            Affine2D::translation(0.0, travel).then(&Affine2D::scale(self.scale, self.scale));
    }

    /// Jump to the final state, dropping every animation and delay
    pub fn settle(&mut self) {
        self.frame_animation = None;
        self.presentation_frame = self.frame;
        self.scale = 1.0;
        self.scale_animation = None;
        self.offset = 0.0;
        self.offset_animation = None;
        self.opacity = 1.0;
        self.opacity_animation = None;
        self.blur_radius = 0.0;
        self.blur_animation = None;
        self.delay = 0.0;
        self.transform = Affine2D::IDENTITY;
        self.needs_display = true;
    }

    pub fn clear_blur(&mut self) {
        if self.blur_animation.take().is_some() || self.blur_radius != 0.0 {
            self.blur_radius = 0.0;
            self.needs_display = true;
        }
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.fill_color != color {
            self.fill_color = color;
            self.needs_display = true;
        }
    }

    /// Scale from the target frame's size to the drawn size
    pub fn content_scale(&self) -> [f32; 2] {
        let target = self.frame.size;
        if self.frame_animation.is_none() || target.width <= 0.0 || target.height <= 0.0 {
            return [1.0, 1.0];
        }
        let drawn = self.presentation_frame.size;
        [drawn.width / target.width, drawn.height / target.height]
    }
}

fn retarget_or_start(animation: &mut Option<AnimationState<f32>>, current: f32, target: f32) {
    match animation {
        Some(state) => state.retarget(target),
        None => *animation = Some(AnimationState::new(current, target)),
    }
}

fn step_property(
    animation: &mut Option<AnimationState<f32>>,
    value: &mut f32,
    spring: &SpringConfig,
    dt: f32,
) {
    if let Some(state) = animation {
        if state.step(spring, dt) {
            *value = state.target;
            *animation = None;
        } else {
            *value = state.value;
        }
    }
}
