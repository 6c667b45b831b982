//! Nested scrollables
//!
//! A scrollable region inside a page competes with the pager for the same
//! touches. A region scrolling across the pager's axis must wait until the
//! pager has given the gesture up; one scrolling along the same axis is left
//! alone.
//!
//! The reverse relation also exists: a pager living inside a scrollable
//! parent can block that parent from activating while the pager still
//! contends for the touch.

use crate::input::Orientation;
use crate::recognizer::RecognizerState;

/// What a nested scrollable needs to know about the pager's gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagerGestureInfo {
    pub orientation: Orientation,
    pub state: RecognizerState,
    /// Block the nearest scrollable ancestor while the pager contends
    pub block_parent_activation: bool,
}

/// How the scrollable sits relative to the pager
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nesting {
    /// The scrollable lives inside one of the pager's pages
    Child,
    /// The pager lives inside the scrollable
    Parent,
}

/// A scrollable region participating in gesture arbitration with a pager
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollableWrapper {
    orientation: Orientation,
    nesting: Nesting,
}

impl ScrollableWrapper {
    pub fn new(orientation: Orientation, nesting: Nesting) -> Self {
        Self {
            orientation,
            nesting,
        }
    }

    /// A vertically scrolling child, the common case inside a horizontal pager
    pub fn vertical_child() -> Self {
        Self::new(Orientation::Vertical, Nesting::Child)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether this scrollable's own gesture may activate right now
    pub fn may_activate(&self, pager: &PagerGestureInfo) -> bool {
        match self.nesting {
            Nesting::Child if self.orientation != pager.orientation => {
                !pager.state.is_contending()
            }
            Nesting::Child => true,
            Nesting::Parent => !(pager.block_parent_activation && pager.state.is_contending()),
        }
    }
}
