//! pagekit Pager
//!
//! A gesture-driven pager: swipe between pages, jump programmatically,
//! settle with springs, bounce past the edges and mount pages lazily.
//!
//! # Features
//!
//! - **Position Model**: raw offset, page offsets and `(page, fraction)` decomposition
//! - **Gesture Bridge**: drag tracking, activation threshold commits and
//!   velocity/visibility based settle targets
//! - **Offset Interpolators**: clamping (default) or resistance bounce with an
//!   overscroll threshold event
//! - **Page Lifecycle**: monotonic lazy mount, onscreen windows and clipped
//!   page removal with a grace delay
//! - **Style Interpolators**: per-page transforms from the page's distance to
//!   the display position
//! - **Imperative Control**: `set_page` / `set_page_without_animation` from any thread
//!
//! # Threads
//!
//! The [`PagerEngine`] lives in the animation context (optionally a
//! [`FrameLoop`](pagekit_animation::FrameLoop) thread). It posts
//! [`PagerEvent`]s to the [`PagerHost`], which runs on the application
//! thread, updates page lifecycles and calls [`PagerCallbacks`].

pub mod active_page;
pub mod builder;
pub mod clipping;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod handle;
pub mod host;
pub mod interpolator;
pub mod layout;
pub mod lifecycle;
pub mod page;
pub mod position;
pub mod state;
pub mod style;

pub use active_page::{
    is_within_window, relative_index, ActivePageStore, ActivePageSubscription, OnscreenLatch,
};
pub use builder::PagerBuilder;
pub use clipping::{
    ClippingController, ClippingPolicy, DefaultClippingPolicy, KeyTrackingSafeClippingPolicy,
};
pub use config::{PageStyleMode, PagerConfig, ScrollOffsetMode, ScrollToPageSpring};
pub use engine::{EngineSubscription, PagerEngine, SharedPagerEngine, SpringConfigFn, SpringRequest};
pub use error::{ConfigError, Result};
pub use events::{PagerCallbacks, PagerEvent};
pub use handle::PagerRef;
pub use host::PagerHost;
pub use interpolator::{
    BounceConfig, BounceInterpolator, ClampInterpolator, InterpolatedOffset, OverscrollSide,
    ScrollOffsetInterpolator, ScrollOffsetParams,
};
pub use layout::LayoutTracker;
pub use lifecycle::PageLifecycle;
pub use page::{PageContext, PageEntry, PageKey, PageSlot};
pub use position::{
    clamp_page, derive_scroll_position, get_overscroll_offset, get_page_offset,
    scroll_position_from_offset, ScrollPosition,
};
pub use state::{ScrollEvent, ScrollState};
pub use style::{
    interpolate, CardStackStyle, Extrapolate, PageStyleInterpolator, PageStyleParams,
    PageTransform, SlideStyle,
};

pub use pagekit_gesture::{GestureInput, HitSlop, Orientation, Point};
