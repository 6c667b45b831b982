//! Clipped page removal
//!
//! Pages far from the active page can be detached from the render tree.
//! Detaching is suspended (every page attached) while a drag or jump is in
//! progress, and only resumes after the settle completes plus a grace delay,
//! so rapid repeated interaction never pops content in and out.
//!
//! Whether the optimization applies at all is a [`ClippingPolicy`] decision,
//! since the reasons to avoid it are runtime specific.

use pagekit_animation::{AnimatedValue, Easing};

use crate::config::PagerConfig;
use crate::position::is_page_in_range;

/// Decides whether clipped pages may be removed for a given configuration
pub trait ClippingPolicy: Send {
    fn is_enabled(&self, config: &PagerConfig) -> bool;
}

/// Follows `remove_clipped_pages`
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClippingPolicy;

impl ClippingPolicy for DefaultClippingPolicy {
    fn is_enabled(&self, config: &PagerConfig) -> bool {
        config.remove_clipped_pages
    }
}

/// Also disables removal when the active page follows its key across
/// children updates, for runtimes whose view recycling breaks on reorder
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyTrackingSafeClippingPolicy;

impl ClippingPolicy for KeyTrackingSafeClippingPolicy {
    fn is_enabled(&self, config: &PagerConfig) -> bool {
        config.remove_clipped_pages && !config.hold_current_page_on_children_update
    }
}

#[derive(Debug)]
struct GraceElapsed;

/// Per-pager clipping state, owned by the animation context
#[derive(Debug)]
pub struct ClippingController {
    enabled: bool,
    retained_window: usize,
    grace_ms: f32,
    can_remove: bool,
    grace: AnimatedValue<GraceElapsed>,
    current_page: usize,
    attached: Vec<bool>,
}

impl ClippingController {
    pub fn new(
        enabled: bool,
        retained_window: usize,
        grace_ms: f32,
        page_count: usize,
        current_page: usize,
    ) -> Self {
        let mut controller = Self {
            enabled,
            retained_window,
            grace_ms,
            can_remove: enabled,
            grace: AnimatedValue::new(0.0),
            current_page,
            attached: vec![true; page_count],
        };
        controller.evaluate();
        controller
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether detaching is currently allowed
    pub fn can_remove(&self) -> bool {
        self.can_remove
    }

    /// Whether the grace delay is running
    pub fn is_grace_pending(&self) -> bool {
        self.grace.is_animating()
    }

    pub fn is_attached(&self, page: usize) -> bool {
        self.attached.get(page).copied().unwrap_or(true)
    }

    /// Force every page attached until `resume` completes
    pub fn suspend(&mut self) {
        if !self.enabled {
            return;
        }
        self.grace.cancel();
        if self.can_remove {
            tracing::trace!("clipping suspended");
        }
        self.can_remove = false;
        self.attached.iter_mut().for_each(|attached| *attached = true);
    }

    /// Allow detaching again once the grace delay has elapsed
    pub fn resume(&mut self) {
        if !self.enabled || self.can_remove || self.grace.is_animating() {
            return;
        }
        self.grace.set_immediate(0.0);
        self.grace
            .timing_to(1.0, self.grace_ms, Easing::Linear, GraceElapsed);
        if self.grace_ms <= 0.0 {
            self.tick(0.0);
        }
    }

    /// Advance the grace timer; returns whether it is still running
    pub fn tick(&mut self, dt: f32) -> bool {
        if let Some(GraceElapsed) = self.grace.tick(dt) {
            tracing::trace!("clipping resumed");
            self.can_remove = true;
            self.evaluate();
        }
        self.grace.is_animating()
    }

    pub fn on_page_changed(&mut self, current_page: usize) {
        self.current_page = current_page;
        self.evaluate();
    }

    pub fn set_page_count(&mut self, page_count: usize, current_page: usize) {
        self.attached.resize(page_count, true);
        self.on_page_changed(current_page);
    }

    /// Stop the grace timer without re-enabling removal
    pub fn cancel(&mut self) {
        self.grace.cancel();
    }

    fn evaluate(&mut self) {
        if !self.enabled {
            return;
        }
        let (current, window, can_remove) = (self.current_page, self.retained_window, self.can_remove);
        for (page, attached) in self.attached.iter_mut().enumerate() {
            if is_page_in_range(page, current, window) {
                *attached = true;
            } else if can_remove {
                *attached = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(controller: &ClippingController, count: usize) -> Vec<bool> {
        (0..count).map(|page| controller.is_attached(page)).collect()
    }

    #[test]
    fn test_far_pages_detached_from_start() {
        let controller = ClippingController::new(true, 1, 5000.0, 5, 0);
        assert_eq!(attached(&controller, 5), vec![true, true, false, false, false]);
    }

    #[test]
    fn test_disabled_keeps_everything_attached() {
        let mut controller = ClippingController::new(false, 1, 5000.0, 5, 0);
        controller.resume();
        controller.on_page_changed(4);
        assert_eq!(attached(&controller, 5), vec![true; 5]);
    }

    #[test]
    fn test_suspend_attaches_all_until_grace_elapses() {
        let mut controller = ClippingController::new(true, 1, 5000.0, 5, 0);
        controller.suspend();
        assert_eq!(attached(&controller, 5), vec![true; 5]);

        controller.on_page_changed(3);
        controller.resume();
        assert!(controller.is_grace_pending());

        // Halfway through the grace delay nothing is detached yet
        for _ in 0..150 {
            controller.tick(1.0 / 60.0);
        }
        assert!(!controller.can_remove());
        assert_eq!(attached(&controller, 5), vec![true; 5]);

        for _ in 0..160 {
            controller.tick(1.0 / 60.0);
        }
        assert!(controller.can_remove());
        assert!(!controller.is_grace_pending());
        assert_eq!(attached(&controller, 5), vec![false, false, true, true, true]);
    }

    #[test]
    fn test_suspend_cancels_pending_grace() {
        let mut controller = ClippingController::new(true, 1, 100.0, 4, 0);
        controller.suspend();
        controller.resume();
        controller.tick(0.05);
        controller.suspend();
        for _ in 0..20 {
            controller.tick(0.05);
        }
        assert!(!controller.can_remove());
    }

    #[test]
    fn test_zero_grace_resumes_immediately() {
        let mut controller = ClippingController::new(true, 0, 0.0, 3, 1);
        controller.suspend();
        controller.resume();
        assert!(controller.can_remove());
        assert_eq!(attached(&controller, 3), vec![false, true, false]);
    }

    #[test]
    fn test_policies() {
        let config = PagerConfig::default().with_hold_current_page(true);
        assert!(DefaultClippingPolicy.is_enabled(&config));
        assert!(!KeyTrackingSafeClippingPolicy.is_enabled(&config));
        assert!(KeyTrackingSafeClippingPolicy.is_enabled(&PagerConfig::default()));
    }
}
