//! Transition tuning
//!
//! All the constants that shape glyph transitions, loadable from TOML.
//! Missing keys fall back to the standard values.

use crate::Result;
use glyphix_animation::SpringConfig;
use serde::{Deserialize, Serialize};

/// Spring used for each animated property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSprings {
    /// Cell position and size
    pub frame: SpringConfig,
    pub scale: SpringConfig,
    /// Vertical travel of appearing and disappearing glyphs
    pub offset: SpringConfig,
    pub opacity: SpringConfig,
    pub blur: SpringConfig,
    /// Label-wide text color
    pub color: SpringConfig,
}

impl Default for TransitionSprings {
    fn default() -> Self {
        Self {
            frame: SpringConfig::smooth(),
            scale: SpringConfig::snappy(),
            offset: SpringConfig::wobbly(),
            opacity: SpringConfig::phone(),
            blur: SpringConfig::bouncy(),
            color: SpringConfig::smooth(),
        }
    }
}

/// Configuration for glyph transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub springs: TransitionSprings,
    /// Scale a glyph appears from and disappears to
    pub smallest_scale: f32,
    /// Seconds over which a whole batch of appearances is staggered
    pub stagger_budget: f32,
    /// Log base mapping glyph height to the initial blur of appearing glyphs
    pub appear_blur_base: f32,
    /// Log base mapping glyph height to the final blur of disappearing glyphs
    pub disappear_blur_base: f32,
    /// Vertical travel is the frame height divided by this
    pub offset_travel_divisor: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionConfig {
    /// Standard transition feel.
    pub fn standard() -> Self {
        Self {
            springs: TransitionSprings::default(),
            smallest_scale: 0.4,
            stagger_budget: 0.2,
            appear_blur_base: 3.0,
            disappear_blur_base: std::f32::consts::E,
            offset_travel_divisor: 3.0,
        }
    }

    /// Less movement: glyphs barely shrink and travel a shorter distance.
    pub fn subtle() -> Self {
        Self {
            springs: TransitionSprings {
                offset: SpringConfig::smooth(),
                blur: SpringConfig::phone(),
                ..TransitionSprings::default()
            },
            smallest_scale: 0.8,
            stagger_budget: 0.1,
            offset_travel_divisor: 6.0,
            ..Self::standard()
        }
    }

    /// Parse a config from TOML; absent keys keep their standard values
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_springs(mut self, springs: TransitionSprings) -> Self {
        self.springs = springs;
        self
    }

    pub fn with_smallest_scale(mut self, scale: f32) -> Self {
        self.smallest_scale = scale;
        self
    }

    pub fn with_stagger_budget(mut self, seconds: f32) -> Self {
        self.stagger_budget = seconds;
        self
    }

    pub fn with_blur_bases(mut self, appear: f32, disappear: f32) -> Self {
        self.appear_blur_base = appear;
        self.disappear_blur_base = disappear;
        self
    }

    pub fn with_offset_travel_divisor(mut self, divisor: f32) -> Self {
        self.offset_travel_divisor = divisor;
        self
    }

    /// Delay between consecutive staggered glyphs
    pub fn stagger_unit(&self, appearing: usize, disappearing: usize) -> f32 {
        match appearing.max(disappearing) {
            0 => 0.0,
            count => self.stagger_budget / count as f32,
        }
    }

    /// Starting blur radius for an appearing glyph of height `height`
    pub fn appear_blur(&self, height: f32) -> f32 {
        log_blur(height, self.appear_blur_base)
    }

    /// Final blur radius for a disappearing glyph of height `height`
    pub fn disappear_blur(&self, height: f32) -> f32 {
        log_blur(height, self.disappear_blur_base)
    }
}

/// `log_base(height)`, never negative; short or degenerate glyphs get none
fn log_blur(height: f32, base: f32) -> f32 {
    if height <= 1.0 || base <= 1.0 {
        return 0.0;
    }
    (height.ln() / base.ln()).max(0.0)
}
