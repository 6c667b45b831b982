//! Pager engine
//!
//! The animation-context half of a pager: it owns the raw offset, the active
//! page and the scroll state, turns pan gestures into page transitions and
//! drives settle springs.
//!
//! # Flow
//!
//! ```text
//! GestureInput -> PanRecognizer -> gesture start/change/end
//!                                        |
//!                                        v
//!                 raw offset (Observable) --> interpolator --> display position
//!                                        |                        |
//!                                        |                        +--> page transforms
//!                                        v
//!                 threshold / landing checks --> current page --> PagerEvent
//! ```
//!
//! Notifications never run application code here; they are posted to a
//! [`Dispatcher`] and delivered by the host on the application thread.

use std::sync::Arc;

use pagekit_animation::{AnimatedValue, SpringConfig};
use pagekit_core::{Dispatcher, Observable, SubscriptionId};
use pagekit_gesture::{
    EdgeContext, GestureArbiter, GestureInput, PagerGestureInfo, PanEvent, PanRecognizer,
    RecognizerContext,
};
use parking_lot::Mutex;

use crate::clipping::{ClippingController, ClippingPolicy, DefaultClippingPolicy};
use crate::config::{PageStyleMode, PagerConfig, ScrollOffsetMode};
use crate::events::PagerEvent;
use crate::interpolator::{
    BounceInterpolator, ClampInterpolator, ScrollOffsetInterpolator, ScrollOffsetParams,
};
use crate::layout::LayoutTracker;
use crate::page::{dedupe_keys, PageKey};
use crate::position::{
    clamp_page, derive_scroll_position, get_page_offset, scroll_position_from_offset,
    ScrollPosition,
};
use crate::state::{ScrollEvent, ScrollState};
use crate::style::{CardStackStyle, PageStyleInterpolator, PageStyleParams, PageTransform, SlideStyle};

/// Activation threshold slack, in units of f32 rounding at the current position
const THRESHOLD_ULPS: f32 = 4.0;

// ============================================================================
// Spring selection
// ============================================================================

/// What a settle spring is being chosen for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpringRequest {
    /// The requested page lies outside the page range
    pub is_overscroll: bool,
    /// Requested page, before clamping
    pub page: i64,
}

/// Picks the spring for a settle or animated jump
pub type SpringConfigFn = Box<dyn Fn(SpringRequest) -> SpringConfig + Send>;

/// Completion tokens of the offset animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OffsetTransition {
    /// Settle after a released drag
    Settle,
    /// Animated `set_page`
    Jump,
}

/// Handle to a subscription on one of the engine's observable fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineSubscription {
    RawOffset(SubscriptionId),
    CurrentPage(SubscriptionId),
    ScrollState(SubscriptionId),
}

/// Shared handle used by the frame loop and the imperative surface
pub type SharedPagerEngine = Arc<Mutex<PagerEngine>>;

// ============================================================================
// Engine
// ============================================================================

pub struct PagerEngine {
    config: PagerConfig,
    layout: LayoutTracker,
    keys: Vec<PageKey>,

    raw_offset: Observable<f32>,
    current_page: Observable<usize>,
    scroll_state: Observable<ScrollState>,

    /// Interpolated position, `None` until the page size is known
    display_position: Option<f32>,
    transforms: Vec<PageTransform>,

    gesture_start_offset: f32,
    gesture_start_page: usize,
    last_translation: f32,
    settle_target: Option<usize>,
    offset_anim: AnimatedValue<OffsetTransition>,

    interpolator: Box<dyn ScrollOffsetInterpolator>,
    style: Box<dyn PageStyleInterpolator>,
    spring_config: SpringConfigFn,
    recognizer: PanRecognizer,
    clipping: ClippingController,

    dispatcher: Dispatcher<PagerEvent>,
    initial_measure_sent: bool,
    torn_down: bool,
}

impl PagerEngine {
    /// Create an engine with the interpolators and spring the config names
    pub fn new(config: PagerConfig, keys: Vec<PageKey>, dispatcher: Dispatcher<PagerEvent>) -> Self {
        let keys = dedupe_keys(keys);
        let page_count = keys.len();
        let initial_page = clamp_page(config.initial_page as i64, page_count);
        let layout = LayoutTracker::new(config.orientation, config.page_margin, config.estimated_size);
        let recognizer = PanRecognizer::new(
            config.orientation,
            GestureArbiter::new(config.activation()),
            config.hit_slop,
        );
        let clipping = ClippingController::new(
            DefaultClippingPolicy.is_enabled(&config),
            config.lazy_page_limit,
            config.clipping_grace_ms,
            page_count,
            initial_page,
        );

        let mut engine = Self {
            interpolator: default_interpolator(&config.scroll_offset),
            style: default_style(config.page_style),
            spring_config: default_spring_config(&config),
            layout,
            keys,
            raw_offset: Observable::new(0.0),
            current_page: Observable::new(initial_page),
            scroll_state: Observable::new(ScrollState::Idle),
            display_position: None,
            transforms: vec![PageTransform::IDENTITY; page_count],
            gesture_start_offset: 0.0,
            gesture_start_page: initial_page,
            last_translation: 0.0,
            settle_target: None,
            offset_anim: AnimatedValue::new(0.0),
            recognizer,
            clipping,
            dispatcher,
            initial_measure_sent: false,
            torn_down: false,
            config,
        };

        if engine.layout.is_known() {
            engine.on_initial_measure();
        }
        engine
    }

    pub fn into_shared(self) -> SharedPagerEngine {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Pluggable behavior
    // ------------------------------------------------------------------

    pub fn set_scroll_offset_interpolator(&mut self, interpolator: Box<dyn ScrollOffsetInterpolator>) {
        self.interpolator = interpolator;
        self.display_position = None;
        self.refresh_display();
    }

    pub fn set_page_style_interpolator(&mut self, style: Box<dyn PageStyleInterpolator>) {
        self.style = style;
        if let Some(position) = self.display_position {
            self.update_transforms(position);
        }
    }

    pub fn set_spring_config_fn(&mut self, spring_config: SpringConfigFn) {
        self.spring_config = spring_config;
    }

    /// Replace the clipping policy, resetting clipping state
    pub fn set_clipping_policy(&mut self, policy: &dyn ClippingPolicy) {
        self.clipping = ClippingController::new(
            policy.is_enabled(&self.config),
            self.config.lazy_page_limit,
            self.config.clipping_grace_ms,
            self.keys.len(),
            self.current_page.value(),
        );
    }

    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.config.scroll_enabled = enabled;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn keys(&self) -> &[PageKey] {
        &self.keys
    }

    pub fn page_count(&self) -> usize {
        self.keys.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page.value()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll_state.value()
    }

    pub fn raw_offset(&self) -> f32 {
        self.raw_offset.value()
    }

    pub fn page_size(&self) -> f32 {
        self.layout.page_size()
    }

    pub fn content_size(&self) -> f32 {
        self.layout.content_size(self.keys.len())
    }

    /// Whether pages can be rendered (page size measured or estimated)
    pub fn is_ready(&self) -> bool {
        self.layout.is_known()
    }

    pub fn layout(&self) -> &LayoutTracker {
        &self.layout
    }

    /// Interpolated scroll position used for rendering
    pub fn display_position(&self) -> Option<f32> {
        self.display_position
    }

    /// Raw scroll position split into page and fraction
    pub fn scroll_position(&self) -> Option<ScrollPosition> {
        derive_scroll_position(self.raw_offset.value(), self.layout.page_size())
    }

    /// Style interpolator output for every page, in page order
    pub fn page_transforms(&self) -> &[PageTransform] {
        &self.transforms
    }

    pub fn is_page_attached(&self, page: usize) -> bool {
        self.clipping.is_attached(page)
    }

    pub fn clipping(&self) -> &ClippingController {
        &self.clipping
    }

    /// Page the running settle is heading to
    pub fn settle_target(&self) -> Option<usize> {
        self.settle_target
    }

    /// Whether a settle or jump animation is running
    pub fn is_offset_animating(&self) -> bool {
        self.offset_anim.is_animating()
    }

    /// Gesture state for nested scrollable arbitration
    pub fn gesture_info(&self) -> PagerGestureInfo {
        PagerGestureInfo {
            orientation: self.config.orientation,
            state: self.recognizer.state(),
            block_parent_activation: self.config.block_parent_scrollable_activation,
        }
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscribe_raw_offset<F>(&mut self, f: F) -> EngineSubscription
    where
        F: FnMut(&f32) + Send + 'static,
    {
        EngineSubscription::RawOffset(self.raw_offset.subscribe(f))
    }

    pub fn subscribe_current_page<F>(&mut self, f: F) -> EngineSubscription
    where
        F: FnMut(&usize) + Send + 'static,
    {
        EngineSubscription::CurrentPage(self.current_page.subscribe(f))
    }

    pub fn subscribe_scroll_state<F>(&mut self, f: F) -> EngineSubscription
    where
        F: FnMut(&ScrollState) + Send + 'static,
    {
        EngineSubscription::ScrollState(self.scroll_state.subscribe(f))
    }

    pub fn unsubscribe(&mut self, subscription: EngineSubscription) -> bool {
        match subscription {
            EngineSubscription::RawOffset(id) => self.raw_offset.unsubscribe(id),
            EngineSubscription::CurrentPage(id) => self.current_page.unsubscribe(id),
            EngineSubscription::ScrollState(id) => self.scroll_state.unsubscribe(id),
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Container measurement from the layout system
    pub fn on_layout(&mut self, width: f32, height: f32) {
        if self.torn_down {
            return;
        }

        let was_known = self.layout.is_known();
        let previous_size = self.layout.page_size();
        let Some(page_size) = self.layout.measure(width, height) else {
            return;
        };

        if !was_known {
            self.on_initial_measure();
            return;
        }

        if self.scroll_state.value().is_dragging() {
            // Keep following the finger at the new scale
            self.gesture_start_offset *= page_size / previous_size;
            self.set_raw_offset(self.gesture_start_offset + self.last_translation);
            return;
        }

        self.offset_anim.cancel();
        self.settle_target = None;
        self.transition(ScrollEvent::Jump);
        let offset = get_page_offset(self.current_page.value(), page_size);
        self.set_raw_offset(offset);
        self.refresh_display();
        self.clipping.resume();
    }

    fn on_initial_measure(&mut self) {
        let offset = get_page_offset(self.current_page.value(), self.layout.page_size());
        self.raw_offset.set(offset);
        self.offset_anim.set_immediate(offset);
        self.refresh_display();

        if !self.initial_measure_sent {
            self.initial_measure_sent = true;
            tracing::debug!(page_size = self.layout.page_size(), "initial measure");
            self.emit(PagerEvent::InitialMeasure);
        }
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Feed a raw gesture sample
    pub fn handle_input(&mut self, input: GestureInput) {
        if self.torn_down {
            return;
        }

        let page_count = self.keys.len();
        let current = self.current_page.value();
        let context = RecognizerContext {
            enabled: self.config.scroll_enabled && page_count > 0 && self.layout.is_known(),
            bounds: self.layout.bounds(),
            edges: EdgeContext {
                at_first_page: current == 0,
                at_last_page: current + 1 >= page_count,
            },
        };

        for event in self.recognizer.handle(input, &context) {
            match event {
                PanEvent::Start => self.on_gesture_start(),
                PanEvent::Change { translation } => self.on_gesture_change(translation),
                PanEvent::End {
                    translation,
                    velocity,
                } => self.on_gesture_end(translation, velocity),
            }
        }
    }

    /// The pager claimed a drag
    pub fn on_gesture_start(&mut self) {
        if self.torn_down || self.keys.is_empty() || !self.layout.is_known() {
            return;
        }

        self.offset_anim.cancel();
        self.settle_target = None;
        self.clipping.suspend();

        self.gesture_start_offset = self.raw_offset.value();
        self.gesture_start_page = self.current_page.value();
        self.last_translation = 0.0;
        self.interpolator.on_pan_start();

        tracing::debug!(
            offset = self.gesture_start_offset,
            page = self.gesture_start_page,
            "drag started"
        );
        self.transition(ScrollEvent::DragStart);
    }

    /// Main-axis translation since touch-down
    pub fn on_gesture_change(&mut self, translation: f32) {
        if !self.scroll_state.value().is_dragging() || !translation.is_finite() {
            return;
        }
        self.last_translation = translation;
        self.set_raw_offset(self.gesture_start_offset + translation);
    }

    /// The drag ended with `translation` and `velocity` along the main axis
    pub fn on_gesture_end(&mut self, translation: f32, velocity: f32) {
        if !self.scroll_state.value().is_dragging() {
            return;
        }
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.on_gesture_change(translation);

        let page_size = self.layout.page_size();
        let raw = self.raw_offset.value();
        let on_page = self.scroll_position().is_some_and(|position| position.is_on_page());

        if translation == 0.0 && on_page {
            tracing::trace!("zero translation release");
            self.transition(ScrollEvent::ZeroRelease);
            self.clipping.resume();
            return;
        }

        let progress = ScrollPosition::from_position(-raw / page_size);
        let moving_forward = velocity < 0.0;
        let next_page_visible = if moving_forward {
            progress.offset
        } else {
            1.0 - progress.offset
        };

        let mut candidate = if moving_forward || progress.is_on_page() {
            progress.position
        } else {
            progress.position + 1
        };
        if velocity.abs() > self.config.pan_velocity_threshold || next_page_visible > 0.5 {
            candidate += if moving_forward { 1 } else { -1 };
        }

        let page_count = self.keys.len();
        let target = clamp_page(candidate, page_count);
        let is_overscroll = candidate < 0 || candidate >= page_count as i64;

        tracing::debug!(
            translation,
            velocity,
            candidate,
            target,
            is_overscroll,
            "drag released"
        );

        self.transition(ScrollEvent::Release);
        self.settle_target = Some(target);
        let spring = (self.spring_config)(SpringRequest {
            is_overscroll,
            page: candidate,
        });
        self.animate_offset_to(get_page_offset(target, page_size), spring, OffsetTransition::Settle);
    }

    // ------------------------------------------------------------------
    // Imperative control
    // ------------------------------------------------------------------

    /// Jump to `page` with a spring
    pub fn set_page(&mut self, page: usize) {
        self.jump_to(page, true);
    }

    /// Jump to `page` immediately
    pub fn set_page_without_animation(&mut self, page: usize) {
        self.jump_to(page, false);
    }

    fn jump_to(&mut self, page: usize, animated: bool) {
        let page_count = self.keys.len();
        if self.torn_down || page_count == 0 {
            return;
        }

        let target = clamp_page(page as i64, page_count);
        tracing::debug!(page, target, animated, "set page");

        self.transition(ScrollEvent::Jump);
        self.offset_anim.cancel();
        self.settle_target = None;
        self.clipping.suspend();
        self.set_current_page_and_notify(target);

        if !self.layout.is_known() {
            // Applied when the first measurement arrives
            self.clipping.resume();
            return;
        }

        let offset = get_page_offset(target, self.layout.page_size());
        if animated {
            let spring = (self.spring_config)(SpringRequest {
                is_overscroll: page >= page_count,
                page: page as i64,
            });
            self.animate_offset_to(offset, spring, OffsetTransition::Jump);
        } else {
            self.set_raw_offset(offset);
            self.clipping.resume();
        }
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Reconcile a new children list
    pub fn set_children(&mut self, keys: Vec<PageKey>) {
        let keys = dedupe_keys(keys);
        if self.torn_down || keys == self.keys {
            return;
        }

        let current = self.current_page.value();
        let held = if self.config.hold_current_page_on_children_update {
            self.keys
                .get(current)
                .and_then(|key| keys.iter().position(|candidate| candidate == key))
        } else {
            None
        };
        let next = held.unwrap_or_else(|| clamp_page(current as i64, keys.len()));

        tracing::debug!(
            from = self.keys.len(),
            to = keys.len(),
            page = current,
            next,
            "children changed"
        );

        self.keys = keys;
        self.transforms.resize(self.keys.len(), PageTransform::IDENTITY);
        self.clipping.set_page_count(self.keys.len(), next);

        let page_size = self.layout.page_size();
        let dragging = self.scroll_state.value().is_dragging();
        if dragging {
            self.gesture_start_page = next;
            self.gesture_start_offset = get_page_offset(next, page_size) - self.last_translation;
        } else {
            self.offset_anim.cancel();
            self.settle_target = None;
            if self.transition(ScrollEvent::Jump) {
                self.clipping.resume();
            }
        }

        self.emit(PagerEvent::ChildrenChanged {
            keys: self.keys.clone(),
            current_page: next,
        });
        self.set_current_page_and_notify(next);

        if self.layout.is_known() {
            let offset = if dragging {
                self.gesture_start_offset + self.last_translation
            } else {
                get_page_offset(next, page_size)
            };
            self.set_raw_offset(offset);
            self.refresh_display();
        }
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Advance animations by `dt` seconds; returns whether anything is running
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.torn_down {
            return false;
        }

        if self.offset_anim.is_animating() {
            let finished = self.offset_anim.tick(dt);
            self.set_raw_offset(self.offset_anim.value());

            match finished {
                Some(OffsetTransition::Settle) => {
                    if self.scroll_state.value().is_settling() {
                        let page = self.settle_target.unwrap_or(self.current_page.value());
                        self.land(page);
                    }
                    self.clipping.resume();
                }
                Some(OffsetTransition::Jump) => self.clipping.resume(),
                None => {}
            }
        }

        let clipping_active = self.clipping.tick(dt);
        self.offset_anim.is_animating() || clipping_active
    }

    /// Cancel all animations and drop subscribers
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        tracing::debug!("pager torn down");
        self.offset_anim.cancel();
        self.clipping.cancel();
        self.recognizer.reset();
        self.raw_offset.clear_subscribers();
        self.current_page.clear_subscribers();
        self.scroll_state.clear_subscribers();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit(&self, event: PagerEvent) {
        if self.dispatcher.dispatch(event).is_err() {
            tracing::trace!("event dropped, host is gone");
        }
    }

    fn transition(&mut self, event: ScrollEvent) -> bool {
        let previous = self.scroll_state.value();
        let Some(next) = previous.on_event(event) else {
            return false;
        };

        tracing::debug!(from = ?previous, to = ?next, ?event, "scroll state");
        self.scroll_state.set(next);
        self.emit(PagerEvent::ScrollStateChanged { state: next });

        if next.is_dragging() {
            self.emit(PagerEvent::DragStart);
        }
        if previous.is_dragging() {
            self.emit(PagerEvent::DragEnd);
        }
        true
    }

    /// The only place the active page changes
    fn set_current_page_and_notify(&mut self, page: usize) {
        if self.current_page.set(page).is_some() {
            tracing::debug!(page, "page selected");
            self.clipping.on_page_changed(page);
            self.emit(PagerEvent::PageSelected { page });
        }
    }

    fn animate_offset_to(&mut self, offset: f32, spring: SpringConfig, token: OffsetTransition) {
        self.offset_anim.set_immediate(self.raw_offset.value());
        self.offset_anim.spring_to(offset, spring, token);
    }

    fn set_raw_offset(&mut self, offset: f32) {
        if self.raw_offset.set(offset).is_some() {
            self.on_offset_changed();
        }
    }

    fn on_offset_changed(&mut self) {
        let Some(display) = self.refresh_display() else {
            return;
        };

        let state = self.scroll_state.value();
        if state.is_idle() {
            return;
        }

        let displayed = ScrollPosition::from_position(display);
        if state.is_settling() && displayed.is_on_page() {
            if let Some(page) = self.landed_page() {
                self.land(page);
                return;
            }
        }

        let threshold = self.config.page_activation_threshold - threshold_slack(display);
        let candidate = if displayed.position >= self.gesture_start_page as i64 {
            if displayed.offset >= threshold {
                displayed.position + 1
            } else {
                displayed.position
            }
        } else if 1.0 - displayed.offset >= threshold {
            displayed.position
        } else {
            displayed.position + 1
        };

        self.set_current_page_and_notify(clamp_page(candidate, self.keys.len()));
    }

    /// Page the raw offset rests on, if it is the settle target
    fn landed_page(&self) -> Option<usize> {
        let raw = self.scroll_position()?;
        if !raw.is_on_page() {
            return None;
        }
        let page = clamp_page(raw.position, self.keys.len());
        if raw.position != page as i64 {
            return None;
        }
        match self.settle_target {
            Some(target) if target != page => None,
            _ => Some(page),
        }
    }

    fn land(&mut self, page: usize) {
        self.offset_anim.cancel();
        self.settle_target = None;
        self.raw_offset.set(get_page_offset(page, self.layout.page_size()));
        self.refresh_display();

        tracing::debug!(page, "settled");
        self.transition(ScrollEvent::Landed);
        self.set_current_page_and_notify(page);
        self.clipping.resume();
    }

    /// Recompute the display position and page transforms
    fn refresh_display(&mut self) -> Option<f32> {
        let page_count = self.keys.len();
        if page_count == 0 {
            return None;
        }
        let scroll_position =
            scroll_position_from_offset(self.raw_offset.value(), self.layout.page_size())?;

        let result = self.interpolator.interpolate(&ScrollOffsetParams {
            scroll_position,
            page_count,
            orientation: self.config.orientation,
        });

        if let Some(side) = result.threshold_reached {
            tracing::debug!(?side, "overscroll threshold reached");
            self.emit(PagerEvent::Overscroll { side });
        }

        self.update_transforms(result.position);
        if self.display_position != Some(result.position) {
            self.display_position = Some(result.position);
            self.emit(PagerEvent::PageScroll {
                position: result.position,
            });
        }
        Some(result.position)
    }

    fn update_transforms(&mut self, position: f32) {
        let page_size = self.layout.page_size();
        let style = &self.style;
        for (page_index, transform) in self.transforms.iter_mut().enumerate() {
            *transform = style.style(&PageStyleParams {
                page_offset: page_index as f32 - position,
                page_index,
                page_size,
                scroll_position: position,
            });
        }
    }
}

impl std::fmt::Debug for PagerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerEngine")
            .field("page_count", &self.keys.len())
            .field("page_size", &self.layout.page_size())
            .field("raw_offset", &self.raw_offset.value())
            .field("current_page", &self.current_page.value())
            .field("scroll_state", &self.scroll_state.value())
            .field("settle_target", &self.settle_target)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

/// Rounding slack of a fraction derived from `position`
fn threshold_slack(position: f32) -> f32 {
    THRESHOLD_ULPS * f32::EPSILON * position.abs().max(1.0)
}

fn default_interpolator(mode: &ScrollOffsetMode) -> Box<dyn ScrollOffsetInterpolator> {
    match mode {
        ScrollOffsetMode::Clamp => Box::new(ClampInterpolator),
        ScrollOffsetMode::Bounce(bounce) => Box::new(BounceInterpolator::new(*bounce)),
    }
}

fn default_style(mode: PageStyleMode) -> Box<dyn PageStyleInterpolator> {
    match mode {
        PageStyleMode::Slide => Box::new(SlideStyle),
        PageStyleMode::CardStack => Box::new(CardStackStyle::default()),
    }
}

fn default_spring_config(config: &PagerConfig) -> SpringConfigFn {
    let springs = config.scroll_to_page_spring;
    Box::new(move |request| springs.config_for(request.is_overscroll))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolator::{BounceConfig, OverscrollSide};
    use pagekit_core::{channel, DispatchQueue};
    use pagekit_gesture::Point;

    const FRAME: f32 = 1.0 / 60.0;

    fn keys(count: usize) -> Vec<PageKey> {
        PageKey::indexed(count)
    }

    fn measured(config: PagerConfig, count: usize) -> (PagerEngine, DispatchQueue<PagerEvent>) {
        let (dispatcher, queue) = channel();
        let mut engine = PagerEngine::new(config, keys(count), dispatcher);
        engine.on_layout(300.0, 600.0);
        (engine, queue)
    }

    fn engine(count: usize) -> (PagerEngine, DispatchQueue<PagerEvent>) {
        measured(PagerConfig::default(), count)
    }

    fn settle(engine: &mut PagerEngine) {
        for _ in 0..3000 {
            if engine.scroll_state().is_idle() && !engine.is_offset_animating() {
                return;
            }
            engine.tick(FRAME);
        }
        panic!("pager did not settle: {engine:?}");
    }

    fn selected(events: &[PagerEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|event| match event {
                PagerEvent::PageSelected { page } => Some(*page),
                _ => None,
            })
            .collect()
    }

    fn states(events: &[PagerEvent]) -> Vec<ScrollState> {
        events
            .iter()
            .filter_map(|event| match event {
                PagerEvent::ScrollStateChanged { state } => Some(*state),
                _ => None,
            })
            .collect()
    }

    fn drag(engine: &mut PagerEngine, translation: f32) {
        engine.on_gesture_start();
        engine.on_gesture_change(translation);
    }

    #[test]
    fn test_rest_offset_matches_current_page() {
        let (mut engine, _queue) = engine(4);
        assert_eq!(engine.raw_offset(), 0.0);

        for page in [2, 1, 3, 0] {
            engine.set_page(page);
            settle(&mut engine);
            assert_eq!(engine.current_page(), page);
            assert_eq!(engine.raw_offset(), get_page_offset(page, 300.0));
        }

        drag(&mut engine, -200.0);
        engine.on_gesture_end(-200.0, -100.0);
        settle(&mut engine);
        assert_eq!(engine.raw_offset(), get_page_offset(engine.current_page(), 300.0));
    }

    #[test]
    fn test_zero_translation_release_is_noop() {
        let (mut engine, mut queue) = engine(3);
        queue.drain();

        drag(&mut engine, 0.0);
        engine.on_gesture_end(0.0, 0.0);

        let events = queue.drain();
        assert!(selected(&events).is_empty());
        assert_eq!(engine.scroll_state(), ScrollState::Idle);
        assert_eq!(engine.current_page(), 0);
        assert_eq!(engine.raw_offset(), 0.0);
        assert!(!engine.is_offset_animating());
    }

    #[test]
    fn test_forward_threshold_commits_at_exact_value() {
        let (mut engine, mut queue) = engine(3);
        queue.drain();

        drag(&mut engine, -239.0);
        assert_eq!(engine.current_page(), 0);

        engine.on_gesture_change(-240.0);
        assert_eq!(engine.current_page(), 1);
        assert_eq!(selected(&queue.drain()), vec![1]);

        // Moving back below the threshold reverts the commit
        engine.on_gesture_change(-200.0);
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn test_backward_threshold_commits_at_exact_value() {
        let (mut engine, mut queue) = engine(3);
        engine.set_page_without_animation(2);
        queue.drain();

        drag(&mut engine, 237.0);
        assert_eq!(engine.current_page(), 2);

        engine.on_gesture_change(240.0);
        assert_eq!(engine.current_page(), 1);
        assert_eq!(selected(&queue.drain()), vec![1]);
    }

    #[test]
    fn test_velocity_overrides_visibility() {
        let (mut engine, _queue) = engine(3);
        drag(&mut engine, -30.0);
        engine.on_gesture_end(-30.0, -600.0);
        assert_eq!(engine.settle_target(), Some(1));
        settle(&mut engine);
        assert_eq!(engine.current_page(), 1);

        let (mut engine, _queue) = self::engine(3);
        drag(&mut engine, -30.0);
        engine.on_gesture_end(-30.0, -100.0);
        assert_eq!(engine.settle_target(), Some(0));
        settle(&mut engine);
        assert_eq!(engine.current_page(), 0);
        assert_eq!(engine.raw_offset(), 0.0);
    }

    #[test]
    fn test_backward_release_returns_to_previous_page() {
        let (mut engine, _queue) = engine(3);
        engine.set_page_without_animation(1);

        drag(&mut engine, 30.0);
        engine.on_gesture_end(30.0, 100.0);
        assert_eq!(engine.settle_target(), Some(1));

        engine.tick(FRAME);
        engine.set_page_without_animation(1);
        drag(&mut engine, 30.0);
        engine.on_gesture_end(30.0, 600.0);
        assert_eq!(engine.settle_target(), Some(0));
    }

    #[test]
    fn test_backward_release_on_page_boundary_steps_back() {
        let (mut engine, _queue) = engine(3);
        drag(&mut engine, -300.0);
        assert_eq!(engine.current_page(), 1);

        engine.on_gesture_end(-300.0, 100.0);
        assert_eq!(engine.settle_target(), Some(0));
        settle(&mut engine);
        assert_eq!(engine.current_page(), 0);
        assert_eq!(engine.raw_offset(), 0.0);
    }

    #[test]
    fn test_forward_release_on_page_boundary_stays() {
        let (mut engine, _queue) = engine(3);
        drag(&mut engine, -300.0);
        engine.on_gesture_end(-300.0, -100.0);
        assert_eq!(engine.settle_target(), Some(1));
    }

    #[test]
    fn test_just_below_threshold_does_not_commit() {
        let (mut engine, mut queue) = engine(3);
        queue.drain();

        // 0.799995 of a page
        drag(&mut engine, -239.9985);
        assert_eq!(engine.current_page(), 0);
        assert!(selected(&queue.drain()).is_empty());

        engine.set_page_without_animation(2);
        queue.drain();
        drag(&mut engine, 239.9985);
        assert_eq!(engine.current_page(), 2);
        assert!(selected(&queue.drain()).is_empty());
    }

    #[test]
    fn test_end_to_end_swipe() {
        let (mut engine, mut queue) = engine(3);
        queue.drain();

        engine.handle_input(GestureInput::TouchDown {
            position: Point::new(150.0, 300.0),
        });
        engine.handle_input(GestureInput::Pan {
            translation: Point::new(-20.0, 0.0),
        });
        engine.handle_input(GestureInput::Pan {
            translation: Point::new(-250.0, 0.0),
        });
        engine.handle_input(GestureInput::Release {
            translation: Point::new(-250.0, 0.0),
            velocity: Point::new(-800.0, 0.0),
        });
        settle(&mut engine);

        let events = queue.drain();
        assert_eq!(
            states(&events),
            vec![ScrollState::Dragging, ScrollState::Settling, ScrollState::Idle]
        );
        assert_eq!(selected(&events), vec![1]);
        assert_eq!(engine.current_page(), 1);
        assert_eq!(engine.raw_offset(), -300.0);
        assert!(events.contains(&PagerEvent::DragStart));
        assert!(events.contains(&PagerEvent::DragEnd));
    }

    #[test]
    fn test_overscroll_release_uses_overscroll_spring() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (mut engine, mut queue) = engine(3);
        let sink = Arc::clone(&requests);
        engine.set_spring_config_fn(Box::new(move |request| {
            sink.lock().push(request);
            SpringConfig::page_settle()
        }));
        queue.drain();

        drag(&mut engine, 100.0);
        engine.on_gesture_end(100.0, 800.0);
        assert_eq!(
            *requests.lock(),
            vec![SpringRequest {
                is_overscroll: true,
                page: -1,
            }]
        );

        settle(&mut engine);
        assert_eq!(engine.raw_offset(), 0.0);
        assert_eq!(engine.current_page(), 0);
        assert!(selected(&queue.drain()).is_empty());
    }

    #[test]
    fn test_set_page_notifies_before_animating() {
        let (mut engine, mut queue) = engine(3);
        queue.drain();

        engine.set_page(2);
        assert_eq!(selected(&queue.drain()), vec![2]);
        assert_eq!(engine.current_page(), 2);
        assert_eq!(engine.scroll_state(), ScrollState::Idle);
        assert!(engine.is_offset_animating());
        assert_eq!(engine.raw_offset(), 0.0);

        settle(&mut engine);
        assert_eq!(engine.raw_offset(), -600.0);
        assert!(selected(&queue.drain()).is_empty());
    }

    #[test]
    fn test_rapid_jumps_supersede() {
        let (mut engine, mut queue) = engine(4);
        queue.drain();

        engine.set_page(3);
        for _ in 0..5 {
            engine.tick(FRAME);
        }
        engine.set_page(1);
        settle(&mut engine);

        assert_eq!(selected(&queue.drain()), vec![3, 1]);
        assert_eq!(engine.raw_offset(), -300.0);
    }

    #[test]
    fn test_out_of_range_jump_is_clamped() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (mut engine, mut queue) = engine(3);
        let sink = Arc::clone(&requests);
        engine.set_spring_config_fn(Box::new(move |request| {
            sink.lock().push(request);
            SpringConfig::overscroll_settle()
        }));
        queue.drain();

        engine.set_page(10);
        assert_eq!(engine.current_page(), 2);
        assert!(requests.lock()[0].is_overscroll);
        settle(&mut engine);
        assert_eq!(engine.raw_offset(), -600.0);
        assert_eq!(selected(&queue.drain()), vec![2]);
    }

    #[test]
    fn test_jump_interrupts_drag() {
        let (mut engine, mut queue) = engine(3);
        queue.drain();

        drag(&mut engine, -100.0);
        engine.set_page_without_animation(2);

        let events = queue.drain();
        assert_eq!(states(&events), vec![ScrollState::Dragging, ScrollState::Idle]);
        assert!(events.contains(&PagerEvent::DragEnd));
        assert_eq!(engine.raw_offset(), -600.0);

        // The finger keeps moving, but the drag is over
        engine.on_gesture_change(-150.0);
        engine.on_gesture_end(-150.0, -900.0);
        assert_eq!(engine.raw_offset(), -600.0);
        assert_eq!(engine.scroll_state(), ScrollState::Idle);
    }

    #[test]
    fn test_drag_interrupts_settle() {
        let (mut engine, mut queue) = engine(3);
        drag(&mut engine, -200.0);
        engine.on_gesture_end(-200.0, -100.0);
        for _ in 0..3 {
            engine.tick(FRAME);
        }
        queue.drain();

        engine.on_gesture_start();
        assert_eq!(engine.scroll_state(), ScrollState::Dragging);
        assert!(!engine.is_offset_animating());
        assert_eq!(states(&queue.drain()), vec![ScrollState::Dragging]);

        let offset = engine.raw_offset();
        engine.on_gesture_change(10.0);
        assert_eq!(engine.raw_offset(), offset + 10.0);
    }

    #[test]
    fn test_children_update_holds_current_key() {
        let config = PagerConfig::default().with_hold_current_page(true);
        let (dispatcher, mut queue) = channel();
        let children: Vec<PageKey> = ["a", "b", "c"].into_iter().map(PageKey::from).collect();
        let mut engine = PagerEngine::new(config, children, dispatcher);
        engine.on_layout(300.0, 600.0);
        engine.set_page_without_animation(2);
        queue.drain();

        engine.set_children(vec![PageKey::from("b"), PageKey::from("c")]);

        let events = queue.drain();
        assert_eq!(selected(&events), vec![1]);
        assert_eq!(engine.current_page(), 1);
        assert_eq!(engine.raw_offset(), -300.0);

        let changed = events
            .iter()
            .position(|event| matches!(event, PagerEvent::ChildrenChanged { .. }));
        let page = events
            .iter()
            .position(|event| matches!(event, PagerEvent::PageSelected { .. }));
        assert!(changed < page);
    }

    #[test]
    fn test_children_update_clamps_index() {
        let (mut engine, mut queue) = engine(4);
        engine.set_page_without_animation(3);
        queue.drain();

        engine.set_children(keys(2));
        assert_eq!(engine.current_page(), 1);
        assert_eq!(engine.raw_offset(), -300.0);
        assert_eq!(selected(&queue.drain()), vec![1]);

        // Same page index, no notification
        engine.set_children(keys(3));
        assert_eq!(engine.current_page(), 1);
        assert!(selected(&queue.drain()).is_empty());
    }

    #[test]
    fn test_children_update_during_drag_rebases_gesture() {
        let config = PagerConfig::default().with_hold_current_page(true);
        let (dispatcher, _queue) = channel();
        let mut engine = PagerEngine::new(config, keys(4), dispatcher);
        engine.on_layout(300.0, 600.0);
        engine.set_page_without_animation(2);

        drag(&mut engine, -50.0);
        let mut next = keys(4);
        next.remove(0);
        engine.set_children(next);

        assert_eq!(engine.current_page(), 1);
        assert_eq!(engine.scroll_state(), ScrollState::Dragging);
        engine.on_gesture_change(-60.0);
        assert_eq!(engine.raw_offset(), -310.0);
    }

    #[test]
    fn test_resize_snaps_without_animation() {
        let (mut engine, mut queue) = engine(3);
        engine.set_page_without_animation(2);
        queue.drain();

        engine.on_layout(400.0, 600.0);
        assert_eq!(engine.raw_offset(), -800.0);
        assert!(!engine.is_offset_animating());
        let events = queue.drain();
        assert!(selected(&events).is_empty());
        assert!(!events.contains(&PagerEvent::InitialMeasure));
    }

    #[test]
    fn test_resize_cancels_settle() {
        let (mut engine, _queue) = engine(3);
        drag(&mut engine, -250.0);
        engine.on_gesture_end(-250.0, -800.0);
        engine.tick(FRAME);

        engine.on_layout(200.0, 600.0);
        assert_eq!(engine.scroll_state(), ScrollState::Idle);
        assert_eq!(engine.current_page(), 1);
        assert_eq!(engine.raw_offset(), -200.0);
    }

    #[test]
    fn test_deferred_until_measured() {
        let (dispatcher, mut queue) = channel();
        let mut engine = PagerEngine::new(PagerConfig::default(), keys(3), dispatcher);
        assert!(!engine.is_ready());
        assert_eq!(engine.display_position(), None);

        engine.on_gesture_start();
        assert_eq!(engine.scroll_state(), ScrollState::Idle);

        engine.set_page(2);
        assert_eq!(engine.current_page(), 2);
        assert_eq!(engine.raw_offset(), 0.0);

        engine.on_layout(300.0, 600.0);
        assert_eq!(engine.raw_offset(), -600.0);
        assert_eq!(engine.display_position(), Some(2.0));

        let events = queue.drain();
        let measures = events
            .iter()
            .filter(|event| **event == PagerEvent::InitialMeasure)
            .count();
        assert_eq!(measures, 1);
    }

    #[test]
    fn test_estimated_size_renders_immediately() {
        let config = PagerConfig::default()
            .with_estimated_size(Some(390.0))
            .with_initial_page(1);
        let (dispatcher, mut queue) = channel();
        let mut engine = PagerEngine::new(config, keys(3), dispatcher);

        assert!(engine.is_ready());
        assert_eq!(engine.raw_offset(), -390.0);
        assert!(queue.drain().contains(&PagerEvent::InitialMeasure));

        engine.on_layout(380.0, 700.0);
        assert_eq!(engine.raw_offset(), -380.0);
        assert!(!queue.drain().contains(&PagerEvent::InitialMeasure));
    }

    #[test]
    fn test_bounce_threshold_fires_overscroll() {
        let config = PagerConfig::default().with_bounce(BounceConfig::default());
        let (mut engine, mut queue) = measured(config, 3);
        queue.drain();

        drag(&mut engine, 120.0);
        engine.on_gesture_change(130.0);
        assert!((engine.display_position().unwrap() - -0.13).abs() < 1e-5);

        let overscrolls: Vec<_> = queue
            .drain()
            .into_iter()
            .filter(|event| matches!(event, PagerEvent::Overscroll { .. }))
            .collect();
        assert_eq!(
            overscrolls,
            vec![PagerEvent::Overscroll {
                side: OverscrollSide::Left
            }]
        );
    }

    #[test]
    fn test_clipping_suspended_until_grace_elapses() {
        let (mut engine, _queue) = engine(5);
        assert_eq!(
            (0..5).map(|page| engine.is_page_attached(page)).collect::<Vec<_>>(),
            vec![true, true, false, false, false]
        );

        drag(&mut engine, -250.0);
        assert!((0..5).all(|page| engine.is_page_attached(page)));
        engine.on_gesture_end(-250.0, -800.0);
        settle(&mut engine);
        assert!(!engine.clipping().can_remove());

        for _ in 0..320 {
            engine.tick(FRAME);
        }
        assert!(engine.clipping().can_remove());
        assert_eq!(
            (0..5).map(|page| engine.is_page_attached(page)).collect::<Vec<_>>(),
            vec![true, true, true, false, false]
        );
    }

    #[test]
    fn test_scroll_disabled_ignores_gestures() {
        let mut config = PagerConfig::default();
        config.scroll_enabled = false;
        let (mut engine, _queue) = measured(config, 3);

        engine.handle_input(GestureInput::TouchDown {
            position: Point::new(150.0, 300.0),
        });
        engine.handle_input(GestureInput::Pan {
            translation: Point::new(-200.0, 0.0),
        });
        assert_eq!(engine.scroll_state(), ScrollState::Idle);
        assert_eq!(engine.raw_offset(), 0.0);

        engine.set_page(1);
        assert_eq!(engine.current_page(), 1);
    }

    #[test]
    fn test_empty_children_are_inert() {
        let (mut engine, mut queue) = engine(0);
        engine.set_page(3);
        drag(&mut engine, -100.0);
        assert!(!engine.tick(FRAME));
        assert_eq!(engine.current_page(), 0);
        assert_eq!(engine.scroll_state(), ScrollState::Idle);
        assert!(selected(&queue.drain()).is_empty());
    }

    #[test]
    fn test_transforms_cover_every_page() {
        let config = PagerConfig {
            page_style: PageStyleMode::CardStack,
            ..PagerConfig::default()
        };
        let (mut engine, _queue) = measured(config, 4);
        assert_eq!(engine.page_transforms().len(), 4);
        assert_eq!(engine.page_transforms()[0].scale, 1.0);
        assert!(engine.page_transforms()[1].scale < 1.0);

        engine.set_children(keys(6));
        assert_eq!(engine.page_transforms().len(), 6);
    }

    #[test]
    fn test_subscribers_see_commits_and_teardown_drops_them() {
        let pages = Arc::new(Mutex::new(Vec::new()));
        let (mut engine, _queue) = engine(3);
        let sink = Arc::clone(&pages);
        let subscription = engine.subscribe_current_page(move |page| sink.lock().push(*page));

        engine.set_page_without_animation(2);
        engine.set_page_without_animation(1);
        assert_eq!(*pages.lock(), vec![2, 1]);

        engine.set_page(0);
        engine.teardown();
        assert!(engine.is_torn_down());
        assert!(!engine.is_offset_animating());
        assert!(!engine.unsubscribe(subscription));
        assert!(!engine.tick(FRAME));
    }
}
