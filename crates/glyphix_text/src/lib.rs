//! Animated glyph transitions for text labels
//!
//! This crate provides:
//! - Font loading and discovery (ttf-parser, fontdb)
//! - Text shaping (HarfBuzz via rustybuzz)
//! - Text layout into positioned, named glyphs (line breaking, alignment,
//!   truncation)
//! - Glyph identity diffing across layouts
//! - Per-glyph spring animation of frame, scale, offset, opacity and blur
//! - A label that ties it together and hands render snapshots to the host
//!
//! # Example
//!
//! ```ignore
//! use glyphix_animation::{FrameContext, RecordingFrameSource};
//! use glyphix_core::Size;
//! use glyphix_text::{GlyphLabel, MonospaceLayout};
//!
//! let mut label = GlyphLabel::new(MonospaceLayout::new(), RecordingFrameSource::new());
//! label.set_container_size(Size::new(200.0, 40.0));
//! label.set_text("12:30");
//!
//! // On every display refresh:
//! label.tick(&FrameContext::new(previous, target));
//! for snapshot in label.snapshots() {
//!     // paint snapshot.glyph at snapshot.presentation_frame
//! }
//! ```

pub mod cell;
pub mod color;
pub mod config;
pub mod diff;
pub mod font;
pub mod label;
pub mod layout;
pub mod registry;
pub mod scheduler;
pub mod shaper;
pub mod snapshot;

pub use cell::{CellId, GlyphCell, GlyphPayload, Transition, VISIBILITY_THRESHOLD};
pub use color::ColorTransition;
pub use config::{TransitionConfig, TransitionSprings};
pub use diff::{CellStore, DiffSummary};
pub use font::{Font, FontFace, FontMetrics, FontWeight};
pub use label::GlyphLabel;
pub use layout::{
    GlyphLayoutProvider, GlyphShaper, LayoutRequest, LineBreakMode, LogicalGlyph,
    MonospaceLayout, PlacedGlyph, ShapedLayout, TextAlignment, TextLayout,
};
pub use registry::FontRegistry;
pub use scheduler::TickOutcome;
pub use shaper::{ShapedGlyph, ShapedText, TextShaper};
pub use snapshot::{GlyphSnapshot, SurfaceEvent};

use thiserror::Error;

/// Errors from font loading and configuration
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("No usable font faces")]
    NoFonts,

    #[error("Invalid transition config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
