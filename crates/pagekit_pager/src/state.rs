//! Scroll state machine
//!
//! ```text
//! Idle ----DragStart----> Dragging ----Release----> Settling ----Landed----> Idle
//!  ^                        |  ^                       |
//!  +------ZeroRelease-------+  +-------DragStart-------+
//!
//! any state --Jump--> Idle
//! ```

use serde::{Deserialize, Serialize};

/// Pager scroll state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollState {
    /// At rest (or animating an imperative jump)
    #[default]
    Idle,
    /// Following the finger
    Dragging,
    /// Animating toward the release target
    Settling,
}

/// Inputs to the scroll state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollEvent {
    /// A drag was claimed
    DragStart,
    /// The drag ended with movement; a settle animation starts
    Release,
    /// The drag ended without moving off a page boundary
    ZeroRelease,
    /// The settle animation put the pager exactly on a page
    Landed,
    /// Imperative jump, resize or children update forcing rest
    Jump,
}

impl ScrollState {
    /// Next state for `event`, `None` when the event does not apply
    pub fn on_event(&self, event: ScrollEvent) -> Option<Self> {
        match (self, event) {
            (ScrollState::Idle, ScrollEvent::DragStart) => Some(ScrollState::Dragging),
            // A new drag interrupts a settle
            (ScrollState::Settling, ScrollEvent::DragStart) => Some(ScrollState::Dragging),

            (ScrollState::Dragging, ScrollEvent::Release) => Some(ScrollState::Settling),
            (ScrollState::Dragging, ScrollEvent::ZeroRelease) => Some(ScrollState::Idle),

            (ScrollState::Settling, ScrollEvent::Landed) => Some(ScrollState::Idle),

            (ScrollState::Dragging, ScrollEvent::Jump) | (ScrollState::Settling, ScrollEvent::Jump) => {
                Some(ScrollState::Idle)
            }

            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ScrollState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, ScrollState::Dragging)
    }

    pub fn is_settling(&self) -> bool {
        matches!(self, ScrollState::Settling)
    }
}
