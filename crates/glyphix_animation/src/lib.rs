//! Glyphix Animation
//!
//! Spring physics and frame timing for glyph transitions.
//!
//! # Features
//!
//! - **Springs**: exact damped-oscillator solution parameterized by
//!   response and damping ratio
//! - **Animation state**: value, velocity and target with a completion test
//! - **Frame clock**: injected tick source with subscription bookkeeping and
//!   speed-scaled frame deltas

pub mod clock;
pub mod spring;
pub mod state;
pub mod values;

pub use clock::{
    CallbackFrameSource, FrameContext, FrameLink, FrameSource, FrameTimer, RecordingFrameSource,
};
pub use spring::SpringConfig;
pub use state::{AnimationState, COMPLETION_EPSILON};
pub use values::Animatable;
