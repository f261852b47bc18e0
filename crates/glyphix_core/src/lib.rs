//! Glyphix Core
//!
//! Plain value types shared by the animation and text crates:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] and the [`Affine2D`] transform
//! - **Color**: linear RGBA [`Color`] plus appearance-dependent [`TextColor`]

pub mod color;
pub mod geometry;

pub use color::{Appearance, Color, TextColor};
pub use geometry::{Affine2D, Point, Rect, Size};
