//! Spring physics animation
//!
//! Springs are described the way designers tune them: a `response` (the
//! period of the undamped oscillation, in seconds) and a `damping_ratio`
//! (1 is critically damped, below 1 overshoots). Stepping uses the exact
//! solution of the damped harmonic oscillator, so any frame delta is stable.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::values::Animatable;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub response: f32,
    pub damping_ratio: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(response: f32, damping_ratio: f32) -> Self {
        Self {
            response,
            damping_ratio,
        }
    }

    /// Create a spring from a perceptual duration and bounce.
    ///
    /// `bounce` of 0 is critically damped; positive values overshoot,
    /// negative values are overdamped.
    pub fn from_duration_bounce(duration: f32, bounce: f32) -> Self {
        let damping_ratio = if bounce >= 0.0 {
            1.0 - bounce
        } else {
            1.0 / (1.0 + bounce)
        };
        Self::new(duration, damping_ratio)
    }

    /// Critically damped, medium speed (glyph frames and text color)
    pub fn smooth() -> Self {
        Self::new(0.5, 1.0)
    }

    /// Critically damped and quick (glyph scale)
    pub fn snappy() -> Self {
        Self::new(0.3, 1.0)
    }

    /// Pronounced overshoot (vertical glyph travel)
    pub fn wobbly() -> Self {
        Self::new(0.4, 0.54)
    }

    /// Slightly slower smooth spring (glyph opacity)
    pub fn phone() -> Self {
        Self::new(0.42, 1.0)
    }

    /// Mild overshoot (glyph blur radius)
    pub fn bouncy() -> Self {
        Self::new(0.42, 0.8)
    }

    /// Spring constant for unit mass
    pub fn stiffness(&self) -> f32 {
        let omega = 2.0 * std::f32::consts::PI / self.response;
        omega * omega
    }

    /// Damping coefficient for unit mass
    pub fn damping(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.damping_ratio / self.response
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio < 1.0 && !self.is_critically_damped()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping_ratio - 1.0).abs() < CRITICAL_TOLERANCE as f32
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping_ratio > 1.0 && !self.is_critically_damped()
    }

    /// Advance `value` and `velocity` towards `target` by `dt` seconds.
    ///
    /// Non-positive `dt` leaves both untouched.
    pub fn step<T: Animatable>(&self, value: &mut T, velocity: &mut T, target: &T, dt: f32) {
        if dt <= 0.0 || self.response <= 0.0 {
            return;
        }

        let k = self.propagator(dt as f64);
        let displacement = value.sub(target);
        let next_displacement = displacement
            .scale(k.x_from_x)
            .add(&velocity.scale(k.x_from_v));
        let next_velocity = displacement
            .scale(k.v_from_x)
            .add(&velocity.scale(k.v_from_v));

        *value = target.add(&next_displacement);
        *velocity = next_velocity;
    }

    /// The oscillator solution is linear in the initial displacement and
    /// velocity, so one set of coefficients serves every component.
    fn propagator(&self, t: f64) -> Propagator {
        let omega = 2.0 * PI / self.response as f64;
        let zeta = self.damping_ratio.max(0.0) as f64;

        if (zeta - 1.0).abs() < CRITICAL_TOLERANCE {
            let decay = (-omega * t).exp();
            Propagator::from([
                decay * (1.0 + omega * t),
                decay * t,
                -decay * omega * omega * t,
                decay * (1.0 - omega * t),
            ])
        } else if zeta < 1.0 {
            let alpha = zeta * omega;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-alpha * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();
            Propagator::from([
                decay * (cos + alpha / omega_d * sin),
                decay * sin / omega_d,
                -decay * omega * omega / omega_d * sin,
                decay * (cos - alpha / omega_d * sin),
            ])
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let e1 = (r1 * t).exp();
            let e2 = (r2 * t).exp();
            let spread = r2 - r1;
            Propagator::from([
                e1 - r1 * (e2 - e1) / spread,
                (e2 - e1) / spread,
                r1 * e1 - r1 * (r2 * e2 - r1 * e1) / spread,
                (r2 * e2 - r1 * e1) / spread,
            ])
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::smooth()
    }
}

const CRITICAL_TOLERANCE: f64 = 1e-4;

/// Maps (displacement, velocity) at time 0 to their values at time `t`
#[derive(Clone, Copy, Debug)]
struct Propagator {
    x_from_x: f32,
    x_from_v: f32,
    v_from_x: f32,
    v_from_v: f32,
}

impl Propagator {
    #[cfg(test)]
    fn apply(&self, x: f32, v: f32) -> (f32, f32) {
        (
            self.x_from_x * x + self.x_from_v * v,
            self.v_from_x * x + self.v_from_v * v,
        )
    }
}

// The coefficient math runs in f64; narrowing happens once per field.
impl From<[f64; 4]> for Propagator {
    fn from(k: [f64; 4]) -> Self {
        Self {
            x_from_x: k[0] as f32,
            x_from_v: k[1] as f32,
            v_from_x: k[2] as f32,
            v_from_v: k[3] as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(config: SpringConfig, from: f32, to: f32, seconds: f32) -> (f32, f32) {
        let mut value = from;
        let mut velocity = 0.0;
        let frames = (seconds * 60.0) as usize;
        for _ in 0..frames {
            config.step(&mut value, &mut velocity, &to, 1.0 / 60.0);
        }
        (value, velocity)
    }

    #[test]
    fn test_spring_settles_to_target() {
        for config in [
            SpringConfig::smooth(),
            SpringConfig::snappy(),
            SpringConfig::wobbly(),
            SpringConfig::phone(),
            SpringConfig::bouncy(),
        ] {
            let (value, velocity) = settle(config, 0.0, 100.0, 3.0);
            assert!((value - 100.0).abs() < 0.01, "{config:?} ended at {value}");
            assert!(velocity.abs() < 0.01);
        }
    }

    #[test]
    fn test_critically_damped_never_overshoots() {
        let config = SpringConfig::smooth();
        let mut value = 0.0_f32;
        let mut velocity = 0.0_f32;
        for _ in 0..120 {
            config.step(&mut value, &mut velocity, &1.0, 1.0 / 60.0);
            assert!(value <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_underdamped_overshoots() {
        let config = SpringConfig::wobbly();
        let mut value = 0.0_f32;
        let mut velocity = 0.0_f32;
        let mut peak = 0.0_f32;
        for _ in 0..120 {
            config.step(&mut value, &mut velocity, &1.0, 1.0 / 60.0);
            peak = peak.max(value);
        }
        assert!(peak > 1.05);
        assert!(peak < 1.5);
    }

    #[test]
    fn test_overdamped_settles_without_overshoot() {
        let config = SpringConfig::from_duration_bounce(0.4, -0.5);
        assert!(config.is_overdamped());
        let mut value = 0.0_f32;
        let mut velocity = 0.0_f32;
        for _ in 0..600 {
            config.step(&mut value, &mut velocity, &1.0, 1.0 / 60.0);
            assert!(value <= 1.0 + 1e-5);
        }
        assert!((value - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_step_is_frame_rate_independent() {
        // One 1/30 s step equals two 1/60 s steps for an exact solution.
        let config = SpringConfig::bouncy();
        let mut coarse = (0.0_f32, 0.0_f32);
        config.step(&mut coarse.0, &mut coarse.1, &10.0, 1.0 / 30.0);

        let mut fine = (0.0_f32, 0.0_f32);
        config.step(&mut fine.0, &mut fine.1, &10.0, 1.0 / 60.0);
        config.step(&mut fine.0, &mut fine.1, &10.0, 1.0 / 60.0);

        assert!((coarse.0 - fine.0).abs() < 1e-3);
        assert!((coarse.1 - fine.1).abs() < 1e-2);
    }

    #[test]
    fn test_large_step_is_stable() {
        let config = SpringConfig::wobbly();
        let mut value = 0.0_f32;
        let mut velocity = 0.0_f32;
        for _ in 0..50 {
            config.step(&mut value, &mut velocity, &1000.0, 0.5);
            assert!(value.is_finite());
            assert!(value < 2000.0 && value > -500.0);
        }
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let config = SpringConfig::smooth();
        let mut value = 0.3_f32;
        let mut velocity = 2.0_f32;
        config.step(&mut value, &mut velocity, &1.0, 0.0);
        config.step(&mut value, &mut velocity, &1.0, -0.1);
        assert_eq!(value, 0.3);
        assert_eq!(velocity, 2.0);
    }

    #[test]
    fn test_propagator_identity_at_time_zero() {
        for config in [
            SpringConfig::smooth(),
            SpringConfig::wobbly(),
            SpringConfig::from_duration_bounce(0.3, -0.4),
        ] {
            let (x, v) = config.propagator(0.0).apply(2.0, -3.0);
            assert!((x - 2.0).abs() < 1e-6);
            assert!((v + 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_spring_presets() {
        assert!(SpringConfig::smooth().is_critically_damped());
        assert!(SpringConfig::snappy().is_critically_damped());
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::bouncy().is_underdamped());

        let smooth = SpringConfig::smooth();
        let omega = 2.0 * std::f32::consts::PI / 0.5;
        assert!((smooth.stiffness() - omega * omega).abs() < 1e-3);
        assert!((smooth.damping() - 2.0 * omega).abs() < 1e-3);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let config: SpringConfig = toml::from_str("response = 0.42\ndamping_ratio = 0.8").unwrap();
        assert_eq!(config, SpringConfig::bouncy());
    }

    #[test]
    fn test_duration_bounce_conversion() {
        let config = SpringConfig::from_duration_bounce(0.3, 0.0);
        assert_eq!(config, SpringConfig::snappy());

        let bouncy = SpringConfig::from_duration_bounce(0.42, 0.2);
        assert!((bouncy.damping_ratio - 0.8).abs() < 1e-6);
    }
}
