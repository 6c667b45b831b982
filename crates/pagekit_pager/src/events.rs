//! Pager notifications
//!
//! The engine posts [`PagerEvent`]s from the animation context; the host
//! drains them on the application thread and invokes [`PagerCallbacks`].

use serde::Serialize;

use crate::interpolator::OverscrollSide;
use crate::page::PageKey;
use crate::state::ScrollState;

/// A notification from the engine
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PagerEvent {
    /// The active page changed
    PageSelected { page: usize },
    ScrollStateChanged { state: ScrollState },
    /// Display scroll position, in pages
    PageScroll { position: f32 },
    DragStart,
    DragEnd,
    /// The page size became known for the first time
    InitialMeasure,
    /// The bounce interpolator crossed its threshold
    Overscroll { side: OverscrollSide },
    /// Children were reconciled; `current_page` is already resolved
    ChildrenChanged {
        keys: Vec<PageKey>,
        current_page: usize,
    },
}

type Callback<T> = Option<Box<dyn FnMut(T)>>;

/// Application callbacks, all invoked on the application thread
#[derive(Default)]
pub struct PagerCallbacks {
    pub on_page_selected: Callback<usize>,
    pub on_page_scroll_state_changed: Callback<ScrollState>,
    pub on_page_scroll: Callback<f32>,
    pub on_drag_start: Callback<()>,
    pub on_drag_end: Callback<()>,
    pub on_initial_measure: Callback<()>,
    pub on_overscroll: Callback<OverscrollSide>,
}

impl PagerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page_selected(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_page_selected = Some(Box::new(f));
        self
    }

    pub fn on_page_scroll_state_changed(mut self, f: impl FnMut(ScrollState) + 'static) -> Self {
        self.on_page_scroll_state_changed = Some(Box::new(f));
        self
    }

    pub fn on_page_scroll(mut self, f: impl FnMut(f32) + 'static) -> Self {
        self.on_page_scroll = Some(Box::new(f));
        self
    }

    pub fn on_drag_start(mut self, mut f: impl FnMut() + 'static) -> Self {
        self.on_drag_start = Some(Box::new(move |()| f()));
        self
    }

    pub fn on_drag_end(mut self, mut f: impl FnMut() + 'static) -> Self {
        self.on_drag_end = Some(Box::new(move |()| f()));
        self
    }

    pub fn on_initial_measure(mut self, mut f: impl FnMut() + 'static) -> Self {
        self.on_initial_measure = Some(Box::new(move |()| f()));
        self
    }

    pub fn on_overscroll(mut self, f: impl FnMut(OverscrollSide) + 'static) -> Self {
        self.on_overscroll = Some(Box::new(f));
        self
    }

    /// Invoke the callback matching `event`, if registered
    pub fn emit(&mut self, event: &PagerEvent) {
        fn call<T>(callback: &mut Callback<T>, value: T) {
            if let Some(callback) = callback {
                callback(value);
            }
        }

        match event {
            PagerEvent::PageSelected { page } => call(&mut self.on_page_selected, *page),
            PagerEvent::ScrollStateChanged { state } => {
                call(&mut self.on_page_scroll_state_changed, *state)
            }
            PagerEvent::PageScroll { position } => call(&mut self.on_page_scroll, *position),
            PagerEvent::DragStart => call(&mut self.on_drag_start, ()),
            PagerEvent::DragEnd => call(&mut self.on_drag_end, ()),
            PagerEvent::InitialMeasure => call(&mut self.on_initial_measure, ()),
            PagerEvent::Overscroll { side } => call(&mut self.on_overscroll, *side),
            PagerEvent::ChildrenChanged { .. } => {}
        }
    }
}

impl std::fmt::Debug for PagerCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerCallbacks")
            .field("on_page_selected", &self.on_page_selected.is_some())
            .field("on_page_scroll_state_changed", &self.on_page_scroll_state_changed.is_some())
            .field("on_page_scroll", &self.on_page_scroll.is_some())
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .field("on_initial_measure", &self.on_initial_measure.is_some())
            .field("on_overscroll", &self.on_overscroll.is_some())
            .finish()
    }
}
