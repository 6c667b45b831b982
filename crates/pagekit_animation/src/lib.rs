//! pagekit Animation System
//!
//! Spring physics, timed transitions and the background frame loop.
//!
//! # Features
//!
//! - **Spring Physics**: closed-form damped springs with stiffness, damping, mass
//! - **Timings**: fixed-duration transitions with easing curves
//! - **Cancellable Transitions**: `AnimatedValue` hands back a completion token
//!   on success and drops it on cancel
//! - **Frame Loop**: a background animation thread ticking at a target rate

pub mod animated;
pub mod frame_loop;
pub mod spring;
pub mod timing;

pub use animated::{AnimatedValue, Transition};
pub use frame_loop::{FrameLoop, WakeCallback};
pub use spring::{Spring, SpringConfig};
pub use timing::{Easing, Timing};
