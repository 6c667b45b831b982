//! Gesture claim arbitration
//!
//! Decides, from the displacement since touch-down, whether the pager should
//! claim a gesture, keep waiting, or give it up so an ancestor can have it.

use serde::{Deserialize, Serialize};

use crate::input::{Orientation, Point};

/// Thresholds used to claim or reject a gesture
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationConfig {
    /// Minimum main-axis travel before the pager claims the gesture
    pub activation_distance: f32,
    /// Maximum angle from the main axis, in degrees
    pub direction_tolerance_deg: f32,
    /// Give up when swiping before the first page
    pub fail_on_start_edge: bool,
    /// Give up when swiping past the last page
    pub fail_on_end_edge: bool,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            activation_distance: 10.0,
            direction_tolerance_deg: 45.0,
            fail_on_start_edge: false,
            fail_on_end_edge: false,
        }
    }
}

/// Where the pager currently sits relative to its page range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeContext {
    pub at_first_page: bool,
    pub at_last_page: bool,
}

/// Outcome of evaluating a pan sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimDecision {
    /// Not enough movement to decide yet
    Pending,
    /// The pager owns the gesture
    Activate,
    /// The gesture belongs to someone else
    Fail,
}

/// Stateless claim arbiter
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureArbiter {
    config: ActivationConfig,
}

impl GestureArbiter {
    pub fn new(config: ActivationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ActivationConfig {
        &self.config
    }

    /// Evaluate the translation since touch-down
    pub fn evaluate(
        &self,
        orientation: Orientation,
        translation: Point,
        edges: EdgeContext,
    ) -> ClaimDecision {
        let main = orientation.main_axis(translation);
        let cross = orientation.cross_axis(translation);
        let (main_abs, cross_abs) = (main.abs(), cross.abs());

        let distance = self.config.activation_distance.max(0.0);
        let tolerance = self.config.direction_tolerance_deg.clamp(0.0, 90.0);
        // 0° is straight along the scroll axis
        let angle = cross_abs.atan2(main_abs).to_degrees();

        if main_abs > distance && angle <= tolerance {
            // Positive main-axis translation pulls earlier pages into view
            if self.config.fail_on_start_edge && edges.at_first_page && main > 0.0 {
                tracing::trace!(main, "claim failed at start edge");
                return ClaimDecision::Fail;
            }
            if self.config.fail_on_end_edge && edges.at_last_page && main < 0.0 {
                tracing::trace!(main, "claim failed at end edge");
                return ClaimDecision::Fail;
            }
            ClaimDecision::Activate
        } else if cross_abs > distance && angle > tolerance {
            tracing::trace!(main, cross, angle, "claim failed off-axis");
            ClaimDecision::Fail
        } else {
            ClaimDecision::Pending
        }
    }
}
