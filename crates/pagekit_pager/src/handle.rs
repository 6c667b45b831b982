//! Imperative control surface
//!
//! [`PagerRef`] is a cheap, cloneable handle to a pager's engine. Every call
//! takes the engine lock for its duration, so a jump issued from any thread
//! is applied atomically with respect to frame ticks.

use pagekit_animation::FrameLoop;
use pagekit_gesture::{GestureInput, PagerGestureInfo};

use crate::engine::{PagerEngine, SharedPagerEngine};
use crate::page::PageKey;
use crate::state::ScrollState;

/// Handle for driving a pager
#[derive(Clone)]
pub struct PagerRef {
    engine: SharedPagerEngine,
}

impl PagerRef {
    pub fn new(engine: SharedPagerEngine) -> Self {
        Self { engine }
    }

    /// Animate to `page`; the page-selected notification is posted immediately
    pub fn set_page(&self, page: usize) {
        self.engine.lock().set_page(page);
    }

    /// Jump to `page` without animating
    pub fn set_page_without_animation(&self, page: usize) {
        self.engine.lock().set_page_without_animation(page);
    }

    pub fn set_scroll_enabled(&self, enabled: bool) {
        self.engine.lock().set_scroll_enabled(enabled);
    }

    pub fn set_children(&self, keys: Vec<PageKey>) {
        self.engine.lock().set_children(keys);
    }

    pub fn handle_input(&self, input: GestureInput) {
        self.engine.lock().handle_input(input);
    }

    pub fn on_layout(&self, width: f32, height: f32) {
        self.engine.lock().on_layout(width, height);
    }

    /// Advance animations by `dt` seconds
    pub fn tick(&self, dt: f32) -> bool {
        self.engine.lock().tick(dt)
    }

    pub fn current_page(&self) -> usize {
        self.engine.lock().current_page()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.engine.lock().scroll_state()
    }

    pub fn raw_offset(&self) -> f32 {
        self.engine.lock().raw_offset()
    }

    pub fn gesture_info(&self) -> PagerGestureInfo {
        self.engine.lock().gesture_info()
    }

    /// Run `f` with the engine locked
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut PagerEngine) -> R) -> R {
        f(&mut self.engine.lock())
    }

    /// Tick this pager from `frame_loop`'s background thread
    ///
    /// The loop thread becomes the pager's animation context.
    pub fn start_frame_loop(&self, frame_loop: &mut FrameLoop) {
        let engine = self.engine.clone();
        frame_loop.start(move |dt| engine.lock().tick(dt));
    }

    /// Cancel animations and release subscribers
    pub fn teardown(&self) {
        self.engine.lock().teardown();
    }
}

impl std::fmt::Debug for PagerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.engine.try_lock() {
            Some(engine) => f.debug_tuple("PagerRef").field(&*engine).finish(),
            None => f.debug_tuple("PagerRef").field(&"<locked>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PagerConfig;
    use crate::events::PagerEvent;
    use pagekit_animation::SpringConfig;
    use pagekit_core::channel;
    use std::thread;
    use std::time::{Duration, Instant};

    fn pager(count: usize) -> (PagerRef, pagekit_core::DispatchQueue<PagerEvent>) {
        let (dispatcher, queue) = channel();
        let engine = PagerEngine::new(PagerConfig::default(), PageKey::indexed(count), dispatcher);
        let pager = PagerRef::new(engine.into_shared());
        pager.on_layout(300.0, 600.0);
        (pager, queue)
    }

    #[test]
    fn test_clones_share_one_engine() {
        let (pager, _queue) = pager(3);
        let other = pager.clone();
        other.set_page_without_animation(2);
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.raw_offset(), -600.0);
    }

    #[test]
    fn test_jump_from_another_thread() {
        let (pager, mut queue) = pager(3);
        queue.drain();

        let remote = pager.clone();
        thread::spawn(move || remote.set_page(1))
            .join()
            .expect("jump thread panicked");

        assert_eq!(pager.current_page(), 1);
        assert_eq!(queue.drain(), vec![PagerEvent::PageSelected { page: 1 }]);
    }

    #[test]
    fn test_frame_loop_settles_jump() {
        let (pager, _queue) = pager(3);
        let mut frame_loop = FrameLoop::new();
        frame_loop.set_target_fps(240);
        pager.with_engine(|engine| {
            engine.set_spring_config_fn(Box::new(|_| SpringConfig::stiff()));
        });
        pager.start_frame_loop(&mut frame_loop);

        pager.set_page(2);
        let deadline = Instant::now() + Duration::from_secs(30);
        while pager.raw_offset() != -600.0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        frame_loop.stop();

        assert_eq!(pager.raw_offset(), -600.0);
        assert!(frame_loop.frame_count() > 0);
    }
}
