//! pagekit Core Runtime
//!
//! Building blocks shared by every pagekit crate:
//!
//! - **Observable values**: single-writer values that notify subscribers on change
//! - **Dispatch**: a channel hand-off from the animation context to the
//!   application thread
//! - **Errors**: the error type for the few fallible runtime edges

pub mod dispatch;
pub mod error;
pub mod observable;

pub use dispatch::{channel, DispatchQueue, Dispatcher};
pub use error::{CoreError, Result};
pub use observable::{Observable, SubscriptionId};
