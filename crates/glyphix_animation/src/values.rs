//! Animatable value types
//!
//! Springs step every component of a value independently, so anything that
//! supports component-wise add, subtract and scalar scaling can be animated.

use glyphix_core::{Color, Point, Rect, Size};

/// Trait for values that can be driven by a spring
pub trait Animatable: Copy {
    /// The additive identity (used for resting velocity)
    fn zero() -> Self;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn scale(&self, factor: f32) -> Self;

    /// Check if two values are approximately equal, component by component
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Animatable for f32 {
    fn zero() -> Self {
        0.0
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn scale(&self, factor: f32) -> Self {
        self * factor
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Geometry Implementations
// ============================================================================

impl Animatable for Point {
    fn zero() -> Self {
        Point::ZERO
    }

    fn add(&self, other: &Self) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }

    fn sub(&self, other: &Self) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }

    fn scale(&self, factor: f32) -> Self {
        Point::new(self.x * factor, self.y * factor)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Animatable for Size {
    fn zero() -> Self {
        Size::ZERO
    }

    fn add(&self, other: &Self) -> Self {
        Size::new(self.width + other.width, self.height + other.height)
    }

    fn sub(&self, other: &Self) -> Self {
        Size::new(self.width - other.width, self.height - other.height)
    }

    fn scale(&self, factor: f32) -> Self {
        Size::new(self.width * factor, self.height * factor)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.width.approx_eq(&other.width, epsilon)
            && self.height.approx_eq(&other.height, epsilon)
    }
}

impl Animatable for Rect {
    fn zero() -> Self {
        Rect::ZERO
    }

    fn add(&self, other: &Self) -> Self {
        Rect::from_origin_size(self.origin.add(&other.origin), self.size.add(&other.size))
    }

    fn sub(&self, other: &Self) -> Self {
        Rect::from_origin_size(self.origin.sub(&other.origin), self.size.sub(&other.size))
    }

    fn scale(&self, factor: f32) -> Self {
        Rect::from_origin_size(self.origin.scale(factor), self.size.scale(factor))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.origin.approx_eq(&other.origin, epsilon) && self.size.approx_eq(&other.size, epsilon)
    }
}

// ============================================================================
// Color Implementation
// ============================================================================

impl Animatable for Color {
    fn zero() -> Self {
        Color::TRANSPARENT
    }

    fn add(&self, other: &Self) -> Self {
        Color::rgba(
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
            self.a + other.a,
        )
    }

    fn sub(&self, other: &Self) -> Self {
        Color::rgba(
            self.r - other.r,
            self.g - other.g,
            self.b - other.b,
            self.a - other.a,
        )
    }

    fn scale(&self, factor: f32) -> Self {
        Color::rgba(
            self.r * factor,
            self.g * factor,
            self.b * factor,
            self.a * factor,
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}
