//! Label text color
//!
//! One color spring shared by every cell of a label. Adaptive colors
//! resolve against the current appearance, so switching light/dark mode
//! animates like any other color change.

use glyphix_animation::{Animatable, AnimationState, SpringConfig};
use glyphix_core::{Appearance, Color, TextColor};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransition {
    animation: AnimationState<Color>,
    color: TextColor,
    appearance: Appearance,
}

impl ColorTransition {
    /// At rest on `color` resolved for `appearance`
    pub fn new(color: TextColor, appearance: Appearance) -> Self {
        let resolved = color.resolve(appearance);
        Self {
            animation: AnimationState::new(resolved, resolved),
            color,
            appearance,
        }
    }

    pub fn color(&self) -> TextColor {
        self.color
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Color cells should be filled with right now
    pub fn value(&self) -> Color {
        self.animation.value
    }

    pub fn target(&self) -> Color {
        self.animation.target
    }

    /// Returns whether the color changed
    pub fn set_color(&mut self, color: TextColor) -> bool {
        if self.color == color {
            return false;
        }
        self.color = color;
        self.retarget();
        true
    }

    /// Returns whether the appearance changed
    pub fn set_appearance(&mut self, appearance: Appearance) -> bool {
        if self.appearance == appearance {
            return false;
        }
        self.appearance = appearance;
        self.retarget();
        true
    }

    fn retarget(&mut self) {
        self.animation.retarget(self.color.resolve(self.appearance));
    }

    /// Resting exactly on the target
    pub fn is_completed(&self) -> bool {
        self.animation.value == self.animation.target && self.animation.velocity == Color::zero()
    }

    /// Advance the spring; returns the new color if it moved
    pub fn step(&mut self, spring: &SpringConfig, dt: f32) -> Option<Color> {
        if self.is_completed() {
            return None;
        }
        if self.animation.step(spring, dt) {
            self.animation.snap_to_target();
        }
        Some(self.animation.value)
    }

    /// Jump to the target; returns whether anything changed
    pub fn snap(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.animation.snap_to_target();
        true
    }
}

impl Default for ColorTransition {
    fn default() -> Self {
        Self::new(TextColor::default(), Appearance::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_gate() {
        let mut color = ColorTransition::new(Color::BLACK.into(), Appearance::Light);
        assert!(!color.set_color(Color::BLACK.into()));
        assert!(color.is_completed());
        assert!(color.set_color(Color::RED.into()));
        assert!(!color.is_completed());
        assert_eq!(color.value(), Color::BLACK);
        assert_eq!(color.target(), Color::RED);
    }

    #[test]
    fn test_step_converges_and_snaps() {
        let mut color = ColorTransition::new(Color::BLACK.into(), Appearance::Light);
        color.set_color(Color::WHITE.into());

        let first = color.step(&SpringConfig::smooth(), 1.0 / 60.0).unwrap();
        assert!(first.r > 0.0 && first.r < 1.0);

        let mut steps = 0;
        while color.step(&SpringConfig::smooth(), 1.0 / 60.0).is_some() {
            steps += 1;
            assert!(steps < 600);
        }
        assert_eq!(color.value(), Color::WHITE);
        assert!(color.is_completed());
    }

    #[test]
    fn test_appearance_resolves_adaptive_color() {
        let adaptive = TextColor::Adaptive {
            light: Color::BLACK,
            dark: Color::WHITE,
        };
        let mut color = ColorTransition::new(adaptive, Appearance::Light);
        assert_eq!(color.value(), Color::BLACK);

        assert!(color.set_appearance(Appearance::Dark));
        assert_eq!(color.target(), Color::WHITE);
        assert!(color.snap());
        assert_eq!(color.value(), Color::WHITE);
        assert!(!color.snap());
    }

    #[test]
    fn test_static_color_ignores_appearance() {
        let mut color = ColorTransition::new(Color::RED.into(), Appearance::Light);
        assert!(color.set_appearance(Appearance::Dark));
        // Appearance changed, but the resolved color is the same.
        assert!(color.is_completed());
        assert!(color.step(&SpringConfig::smooth(), 0.1).is_none());
    }
}
