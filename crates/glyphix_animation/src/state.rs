//! Animation state
//!
//! A value, its velocity and the target it springs towards. Retargeting only
//! moves the target, so an interrupted animation continues from where it is.

use crate::spring::SpringConfig;
use crate::values::Animatable;

/// Distance below which value and velocity count as settled
pub const COMPLETION_EPSILON: f32 = 0.01;

/// In-flight spring animation of a single property
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState<T> {
    pub value: T,
    pub velocity: T,
    pub target: T,
}

impl<T: Animatable> AnimationState<T> {
    /// Start at `value` at rest, heading for `target`
    pub fn new(value: T, target: T) -> Self {
        Self {
            value,
            velocity: T::zero(),
            target,
        }
    }

    pub fn with_velocity(mut self, velocity: T) -> Self {
        self.velocity = velocity;
        self
    }

    /// Point the animation at a new target without touching value or velocity
    pub fn retarget(&mut self, target: T) {
        self.target = target;
    }

    /// Advance by `dt` seconds; returns whether the animation is now complete
    pub fn step(&mut self, spring: &SpringConfig, dt: f32) -> bool {
        spring.step(&mut self.value, &mut self.velocity, &self.target, dt);
        self.is_completed()
    }

    pub fn is_completed(&self) -> bool {
        self.value.approx_eq(&self.target, COMPLETION_EPSILON)
            && self.velocity.approx_eq(&T::zero(), COMPLETION_EPSILON)
    }

    /// Jump to the target and come to rest
    pub fn snap_to_target(&mut self) {
        self.value = self.target;
        self.velocity = T::zero();
    }
}
