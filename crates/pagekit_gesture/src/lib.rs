//! pagekit Gesture Layer
//!
//! The boundary between a platform's touch stream and the pager:
//!
//! - [`GestureInput`]: touch-down, pan, release and cancel samples
//! - [`HitSlop`]/[`Bounds`]: where a gesture may begin
//! - [`GestureArbiter`]: activation distance, direction tolerance and edge failure
//! - [`PanRecognizer`]: the per-touch claim state machine
//! - [`ScrollableWrapper`]: arbitration with nested scrollables

pub mod arbiter;
pub mod hit_slop;
pub mod input;
pub mod nested;
pub mod recognizer;

pub use arbiter::{ActivationConfig, ClaimDecision, EdgeContext, GestureArbiter};
pub use hit_slop::{Bounds, HitSlop};
pub use input::{GestureInput, Orientation, PanEvent, Point};
pub use nested::{Nesting, PagerGestureInfo, ScrollableWrapper};
pub use recognizer::{PanEvents, PanRecognizer, RecognizerContext, RecognizerState};
