//! Pan recognizer
//!
//! Turns raw [`GestureInput`] samples into the pager's [`PanEvent`] stream:
//!
//! ```text
//! Idle --touch down (inside hit area)--> Possible --claim--> Active --release--> Idle
//!                                           |                   |
//!                                           +--fail--> Failed   +--cancel--> Idle
//! ```
//!
//! A failed or out-of-bounds touch stays `Failed` until the next touch-down.

use smallvec::{smallvec, SmallVec};

use crate::arbiter::{ClaimDecision, EdgeContext, GestureArbiter};
use crate::hit_slop::{Bounds, HitSlop};
use crate::input::{GestureInput, Orientation, PanEvent, Point};

/// Recognition state of the pager's pan gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecognizerState {
    /// No touch in progress
    #[default]
    Idle,
    /// Touch down, claim undecided
    Possible,
    /// Claimed by the pager
    Active,
    /// Given up for the remainder of this touch
    Failed,
}

impl RecognizerState {
    /// True while the pager may still take (or holds) the gesture
    pub fn is_contending(&self) -> bool {
        matches!(self, RecognizerState::Possible | RecognizerState::Active)
    }
}

/// Per-sample facts owned by the pager
#[derive(Clone, Copy, Debug, Default)]
pub struct RecognizerContext {
    /// Gesture input is accepted at all
    pub enabled: bool,
    /// Container bounds; `None` before the first layout
    pub bounds: Option<Bounds>,
    pub edges: EdgeContext,
}

/// Events produced by a single sample (at most `Start` + `Change`)
pub type PanEvents = SmallVec<[PanEvent; 2]>;

/// Pan gesture recognizer for one pager
#[derive(Clone, Debug)]
pub struct PanRecognizer {
    orientation: Orientation,
    arbiter: GestureArbiter,
    hit_slop: HitSlop,
    state: RecognizerState,
    last_translation: Point,
}

impl PanRecognizer {
    pub fn new(orientation: Orientation, arbiter: GestureArbiter, hit_slop: HitSlop) -> Self {
        Self {
            orientation,
            arbiter,
            hit_slop,
            state: RecognizerState::Idle,
            last_translation: Point::ZERO,
        }
    }

    pub fn state(&self) -> RecognizerState {
        self.state
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Feed one sample
    pub fn handle(&mut self, input: GestureInput, ctx: &RecognizerContext) -> PanEvents {
        match input {
            GestureInput::TouchDown { position } => {
                let inside = ctx
                    .bounds
                    .map(|bounds| bounds.contains(position, &self.hit_slop))
                    .unwrap_or(false);

                self.last_translation = Point::ZERO;
                self.state = if ctx.enabled && inside {
                    RecognizerState::Possible
                } else {
                    tracing::trace!(?position, enabled = ctx.enabled, "touch rejected");
                    RecognizerState::Failed
                };
                SmallVec::new()
            }

            GestureInput::Pan { translation } => {
                self.last_translation = translation;
                match self.state {
                    RecognizerState::Possible => {
                        match self.arbiter.evaluate(self.orientation, translation, ctx.edges) {
                            ClaimDecision::Activate => {
                                self.state = RecognizerState::Active;
                                smallvec![
                                    PanEvent::Start,
                                    PanEvent::Change {
                                        translation: self.orientation.main_axis(translation),
                                    },
                                ]
                            }
                            ClaimDecision::Fail => {
                                self.state = RecognizerState::Failed;
                                SmallVec::new()
                            }
                            ClaimDecision::Pending => SmallVec::new(),
                        }
                    }
                    RecognizerState::Active => smallvec![PanEvent::Change {
                        translation: self.orientation.main_axis(translation),
                    }],
                    RecognizerState::Idle | RecognizerState::Failed => SmallVec::new(),
                }
            }

            GestureInput::Release {
                translation,
                velocity,
            } => {
                let was_active = self.state == RecognizerState::Active;
                self.state = RecognizerState::Idle;
                if was_active {
                    smallvec![PanEvent::End {
                        translation: self.orientation.main_axis(translation),
                        velocity: self.orientation.main_axis(velocity),
                    }]
                } else {
                    SmallVec::new()
                }
            }

            GestureInput::Cancel => {
                let was_active = self.state == RecognizerState::Active;
                self.state = RecognizerState::Idle;
                if was_active {
                    // A cancelled drag settles like a release without velocity
                    smallvec![PanEvent::End {
                        translation: self.orientation.main_axis(self.last_translation),
                        velocity: 0.0,
                    }]
                } else {
                    SmallVec::new()
                }
            }
        }
    }

    /// Forget any touch in progress
    pub fn reset(&mut self) {
        self.state = RecognizerState::Idle;
        self.last_translation = Point::ZERO;
    }
}
