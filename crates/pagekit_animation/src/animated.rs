//! Animated values with completion tokens
//!
//! [`AnimatedValue<C>`] holds a scalar and at most one running
//! [`Transition`]. Each transition carries a completion token of type `C`:
//!
//! - when the transition finishes, [`AnimatedValue::tick`] hands the token
//!   back exactly once;
//! - when it is cancelled or superseded, the token is dropped and nothing
//!   runs.
//!
//! The owner decides what a token means (re-enable clipping, mark a page
//! faded in, ...). No closures are retained, so cancelling a transition
//! releases everything it captured.

use crate::spring::{Spring, SpringConfig};
use crate::timing::{Easing, Timing};

/// A running transition
#[derive(Clone, Copy, Debug)]
pub enum Transition {
    Spring(Spring),
    Timing(Timing),
}

impl Transition {
    pub fn value(&self) -> f32 {
        match self {
            Transition::Spring(spring) => spring.value(),
            Transition::Timing(timing) => timing.value(),
        }
    }

    pub fn target(&self) -> f32 {
        match self {
            Transition::Spring(spring) => spring.target(),
            Transition::Timing(timing) => timing.target(),
        }
    }

    pub fn step(&mut self, dt: f32) {
        match self {
            Transition::Spring(spring) => spring.step(dt),
            Transition::Timing(timing) => timing.step(dt),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Transition::Spring(spring) => spring.is_settled(),
            Transition::Timing(timing) => timing.is_finished(),
        }
    }
}

/// A scalar that can be set directly or driven by a cancellable transition
#[derive(Debug)]
pub struct AnimatedValue<C> {
    value: f32,
    active: Option<(Transition, C)>,
}

impl<C> AnimatedValue<C> {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            active: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Target of the running transition, if any
    pub fn target(&self) -> Option<f32> {
        self.active.as_ref().map(|(transition, _)| transition.target())
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Jump to `value`, cancelling any running transition
    pub fn set_immediate(&mut self, value: f32) {
        self.cancel();
        self.value = value;
    }

    /// Cancel the running transition, dropping its completion token
    ///
    /// Returns whether a transition was running.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some((transition, _token)) => {
                tracing::trace!(value = self.value, target = transition.target(), "transition cancelled");
                true
            }
            None => false,
        }
    }

    /// Spring from the current value to `target`
    pub fn spring_to(&mut self, target: f32, config: SpringConfig, token: C) {
        let mut spring = Spring::new(config, self.value);
        spring.set_target(target);
        self.start(Transition::Spring(spring), token);
    }

    /// Time a transition from the current value to `target`
    pub fn timing_to(&mut self, target: f32, duration_ms: f32, easing: Easing, token: C) {
        let timing = Timing::new(self.value, target, duration_ms, easing);
        self.start(Transition::Timing(timing), token);
    }

    /// Start `transition`, superseding whatever was running
    pub fn start(&mut self, transition: Transition, token: C) {
        self.cancel();
        self.value = transition.value();
        self.active = Some((transition, token));
    }

    /// Advance the running transition by `dt` seconds
    ///
    /// Returns the completion token on the tick the transition finishes.
    pub fn tick(&mut self, dt: f32) -> Option<C> {
        let (transition, _) = self.active.as_mut()?;
        transition.step(dt);
        self.value = transition.value();

        if transition.is_finished() {
            let (transition, token) = self.active.take()?;
            self.value = transition.target();
            Some(token)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_token_returned_once() {
        let mut value = AnimatedValue::new(0.0);
        value.timing_to(1.0, 100.0, Easing::Linear, "done");

        let mut completions = Vec::new();
        for _ in 0..20 {
            if let Some(token) = value.tick(1.0 / 60.0) {
                completions.push(token);
            }
        }

        assert_eq!(completions, vec!["done"]);
        assert_eq!(value.value(), 1.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn test_cancel_drops_token() {
        let mut value = AnimatedValue::new(0.0);
        value.spring_to(100.0, SpringConfig::stiff(), 1u32);
        value.tick(1.0 / 60.0);

        assert!(value.cancel());
        assert!(!value.cancel());
        for _ in 0..200 {
            assert_eq!(value.tick(1.0 / 60.0), None);
        }
        assert!(value.value() > 0.0 && value.value() < 100.0);
    }

    #[test]
    fn test_new_transition_supersedes_previous() {
        let mut value = AnimatedValue::new(0.0);
        value.spring_to(100.0, SpringConfig::stiff(), "first");
        value.tick(1.0 / 60.0);
        value.spring_to(-50.0, SpringConfig::stiff(), "second");

        let mut completions = Vec::new();
        for _ in 0..240 {
            if let Some(token) = value.tick(1.0 / 60.0) {
                completions.push(token);
            }
        }

        assert_eq!(completions, vec!["second"]);
        assert_eq!(value.value(), -50.0);
    }

    #[test]
    fn test_set_immediate_cancels() {
        let mut value = AnimatedValue::new(0.0);
        value.spring_to(10.0, SpringConfig::stiff(), ());
        value.set_immediate(3.0);
        assert!(!value.is_animating());
        assert_eq!(value.value(), 3.0);
        assert_eq!(value.tick(0.1), None);
    }

    #[test]
    fn test_spring_to_current_value_completes_on_first_tick() {
        let mut value = AnimatedValue::new(-300.0);
        value.spring_to(-300.0, SpringConfig::page_settle(), 'x');
        assert_eq!(value.tick(1.0 / 60.0), Some('x'));
    }
}
