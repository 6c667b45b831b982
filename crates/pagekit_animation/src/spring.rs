//! Spring physics animation
//!
//! Damped harmonic oscillator advanced with its closed-form solution, so a
//! step is exact for any `dt`. Heavily overdamped configurations (the pager
//! settle springs run at damping 100 with masses well under 1) stay stable at
//! frame-sized steps where explicit integrators blow up.

use serde::{Deserialize, Serialize};

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Settle spring for landing on a page inside the valid range
    pub fn page_settle() -> Self {
        Self {
            stiffness: 100.0,
            damping: 100.0,
            mass: 0.15,
        }
    }

    /// Heavier settle spring for bouncing back from an out-of-range target
    pub fn overscroll_settle() -> Self {
        Self {
            stiffness: 100.0,
            damping: 100.0,
            mass: 0.5,
        }
    }

    /// A wobbly spring with overshoot
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            mass: 1.0,
        }
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
        }
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Damping ratio (1.0 = critically damped)
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }

    /// Degenerate parameters are replaced by the default spring
    fn sanitized(self) -> Self {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.stiffness) && valid(self.mass) && self.damping.is_finite() && self.damping >= 0.0
        {
            self
        } else {
            tracing::warn!(?self, "invalid spring config, using default");
            Self::default()
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
        }
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_displacement: f32,
    rest_velocity: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config: config.sanitized(),
            value: initial,
            velocity: 0.0,
            target: initial,
            // Within half a pixel and under 5px/s is imperceptible
            rest_displacement: 0.5,
            rest_velocity: 5.0,
        }
    }

    /// Override the rest thresholds (useful for unit-range values like opacity)
    pub fn with_rest_thresholds(mut self, displacement: f32, velocity: f32) -> Self {
        self.rest_displacement = displacement;
        self.rest_velocity = velocity;
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Check if the spring has settled (within epsilon of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest_displacement
            && self.velocity.abs() < self.rest_velocity
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Once settled the value snaps exactly onto the target.
    pub fn step(&mut self, dt: f32) {
        if !self.is_settled() && dt > 0.0 {
            let (displacement, velocity) = self.solve(dt as f64);
            self.value = self.target + displacement as f32;
            self.velocity = velocity as f32;
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    /// Displacement from target and velocity after `t` seconds
    fn solve(&self, t: f64) -> (f64, f64) {
        let k = self.config.stiffness as f64;
        let c = self.config.damping as f64;
        let m = self.config.mass as f64;
        let x0 = (self.value - self.target) as f64;
        let v0 = self.velocity as f64;

        let omega = (k / m).sqrt();
        let zeta = c / (2.0 * (k * m).sqrt());

        if (zeta - 1.0).abs() < 1e-6 {
            // Critically damped
            let decay = (-omega * t).exp();
            let b = v0 + omega * x0;
            let x = decay * (x0 + b * t);
            let v = decay * (v0 - omega * b * t);
            (x, v)
        } else if zeta < 1.0 {
            // Underdamped
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let a = zeta * omega;
            let decay = (-a * t).exp();
            let (sin, cos) = (damped * t).sin_cos();
            let c2 = (v0 + a * x0) / damped;
            let x = decay * (x0 * cos + c2 * sin);
            let v = decay * (v0 * cos - (a * v0 + omega * omega * x0) / damped * sin);
            (x, v)
        } else {
            // Overdamped
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_settled(spring: &mut Spring, max_steps: usize) -> usize {
        for step in 0..max_steps {
            if spring.is_settled() {
                return step;
            }
            spring.step(1.0 / 60.0);
        }
        max_steps
    }

    #[test]
    fn test_spring_settles_to_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);

        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_page_settle_spring_is_stable_and_lands_exactly() {
        let mut spring = Spring::new(SpringConfig::page_settle(), -250.0);
        spring.set_target(-300.0);

        let mut previous = spring.value();
        for _ in 0..1200 {
            spring.step(1.0 / 60.0);
            // Overdamped: monotonic approach, never past the target
            assert!(spring.value() <= previous + f32::EPSILON);
            assert!(spring.value() >= -300.0);
            previous = spring.value();
            if spring.is_settled() {
                break;
            }
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), -300.0);
    }

    #[test]
    fn test_overscroll_spring_is_heavier() {
        assert!(SpringConfig::overscroll_settle().mass > SpringConfig::page_settle().mass);
        assert_eq!(
            SpringConfig::overscroll_settle().damping,
            SpringConfig::page_settle().damping
        );
        assert!(SpringConfig::page_settle().is_overdamped());
    }

    #[test]
    fn test_spring_inherits_velocity() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.set_target(100.0);

        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_underdamped_spring_overshoots() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.set_target(100.0);

        let mut max_value: f32 = 0.0;
        for _ in 0..240 {
            spring.step(1.0 / 60.0);
            max_value = max_value.max(spring.value());
        }

        assert!(max_value > 100.0);
        assert!(spring.is_settled());
    }

    #[test]
    fn test_step_size_independence() {
        let mut coarse = Spring::new(SpringConfig::default(), 0.0);
        let mut fine = Spring::new(SpringConfig::default(), 0.0);
        coarse.set_target(100.0);
        fine.set_target(100.0);

        coarse.step(0.1);
        for _ in 0..10 {
            fine.step(0.01);
        }

        assert!((coarse.value() - fine.value()).abs() < 1e-2);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let spring = Spring::new(SpringConfig::new(0.0, 10.0, -1.0), 0.0);
        assert_eq!(spring.config(), SpringConfig::default());
    }

    #[test]
    fn test_at_target_is_already_settled() {
        let mut spring = Spring::new(SpringConfig::page_settle(), -300.0);
        spring.set_target(-300.0);
        assert_eq!(run_until_settled(&mut spring, 10), 0);
    }
}
