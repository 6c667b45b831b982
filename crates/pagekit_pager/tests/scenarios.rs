//! End-to-end pager scenarios: engine, host and callbacks together

use std::cell::RefCell;
use std::rc::Rc;

use pagekit_pager::{
    BounceConfig, GestureInput, KeyTrackingSafeClippingPolicy, OverscrollSide, PageKey,
    PagerBuilder, PagerCallbacks, PagerConfig, PagerHost, PagerRef, Point, ScrollState,
};

const FRAME: f32 = 1.0 / 60.0;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Selected(usize),
    State(ScrollState),
    DragStart,
    DragEnd,
    InitialMeasure,
    Overscroll(OverscrollSide),
}

fn recording_callbacks(log: &Rc<RefCell<Vec<Call>>>) -> PagerCallbacks {
    let selected = Rc::clone(log);
    let state = Rc::clone(log);
    let drag_start = Rc::clone(log);
    let drag_end = Rc::clone(log);
    let measure = Rc::clone(log);
    let overscroll = Rc::clone(log);

    PagerCallbacks::new()
        .on_page_selected(move |page| selected.borrow_mut().push(Call::Selected(page)))
        .on_page_scroll_state_changed(move |s| state.borrow_mut().push(Call::State(s)))
        .on_drag_start(move || drag_start.borrow_mut().push(Call::DragStart))
        .on_drag_end(move || drag_end.borrow_mut().push(Call::DragEnd))
        .on_initial_measure(move || measure.borrow_mut().push(Call::InitialMeasure))
        .on_overscroll(move |side| overscroll.borrow_mut().push(Call::Overscroll(side)))
}

fn build(config: PagerConfig, count: usize) -> (PagerRef, PagerHost, Rc<RefCell<Vec<Call>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (pager, host) = PagerBuilder::new(config)
        .page_count(count)
        .callbacks(recording_callbacks(&log))
        .build()
        .expect("valid config");
    (pager, host, log)
}

fn run_until_idle(pager: &PagerRef, host: &mut PagerHost) {
    for _ in 0..3000 {
        let animating = pager.tick(FRAME);
        host.pump();
        if pager.scroll_state() == ScrollState::Idle
            && !pager.with_engine(|engine| engine.is_offset_animating())
        {
            return;
        }
        let _ = animating;
    }
    panic!("pager never came to rest");
}

fn swipe(pager: &PagerRef, translation: f32, velocity: f32) {
    pager.handle_input(GestureInput::TouchDown {
        position: Point::new(150.0, 300.0),
    });
    pager.handle_input(GestureInput::Pan {
        translation: Point::new(translation.signum() * 15.0, 0.0),
    });
    pager.handle_input(GestureInput::Pan {
        translation: Point::new(translation, 0.0),
    });
    pager.handle_input(GestureInput::Release {
        translation: Point::new(translation, 0.0),
        velocity: Point::new(velocity, 0.0),
    });
}

#[test]
fn test_swipe_to_next_page() {
    let (pager, mut host, log) = build(PagerConfig::default(), 3);
    pager.on_layout(300.0, 600.0);
    host.pump();
    log.borrow_mut().clear();

    swipe(&pager, -250.0, -800.0);
    run_until_idle(&pager, &mut host);

    let calls = log.borrow().clone();
    let selections: Vec<_> = calls
        .iter()
        .filter(|call| matches!(call, Call::Selected(_)))
        .collect();
    assert_eq!(selections, vec![&Call::Selected(1)]);

    let states: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            Call::State(state) => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![ScrollState::Dragging, ScrollState::Settling, ScrollState::Idle]
    );
    assert!(calls.contains(&Call::DragStart));
    assert!(calls.contains(&Call::DragEnd));

    assert_eq!(pager.current_page(), 1);
    assert_eq!(pager.raw_offset(), -300.0);
    assert_eq!(host.active_page(), 1);
    assert_eq!(host.scroll_state(), ScrollState::Idle);
    assert_eq!(host.scroll_position(), Some(1.0));
}

#[test]
fn test_initial_measure_reported_once() {
    let (pager, mut host, log) = build(PagerConfig::default(), 3);
    assert!(host.slots(&pager).is_empty());

    pager.on_layout(300.0, 600.0);
    pager.on_layout(320.0, 600.0);
    host.pump();

    let measures = log
        .borrow()
        .iter()
        .filter(|call| **call == Call::InitialMeasure)
        .count();
    assert_eq!(measures, 1);
    assert_eq!(host.slots(&pager).len(), 3);
}

#[test]
fn test_lazy_mount_follows_active_page() {
    let config = PagerConfig::default().with_lazy(1).with_initial_page(3);
    let (pager, mut host, _log) = build(config, 7);
    pager.on_layout(300.0, 600.0);
    host.pump();

    let mut mounted_history = Vec::new();
    mounted_history.push(host.lifecycle().entry(5).map(|entry| entry.is_mounted));

    for page in [4, 5, 4, 3] {
        pager.set_page_without_animation(page);
        host.pump();
        assert_eq!(host.active_page(), page);
        mounted_history.push(host.lifecycle().entry(5).map(|entry| entry.is_mounted));
    }

    assert_eq!(
        mounted_history,
        vec![Some(false), Some(true), Some(true), Some(true), Some(true)]
    );
    assert!(!host.lifecycle().entry(0).unwrap().is_mounted);
}

#[test]
fn test_page_context_tracks_active_page() {
    let config = PagerConfig::default().with_track_onscreen(0);
    let (pager, mut host, _log) = build(config, 3);
    pager.on_layout(300.0, 600.0);

    pager.set_page(2);
    host.pump();

    let context = host.page_context(2).unwrap();
    assert!(context.is_active());
    assert!(context.is_onscreen);
    assert!(!host.page_context(0).unwrap().is_onscreen);
    assert_eq!(host.page_context(0).unwrap().relative_index(), -2);
}

#[test]
fn test_children_update_keeps_same_key_active() {
    let config = PagerConfig::default().with_hold_current_page(true);
    let log = Rc::new(RefCell::new(Vec::new()));
    let (pager, mut host) = PagerBuilder::new(config)
        .children(["inbox", "archive", "trash"])
        .clipping_policy(KeyTrackingSafeClippingPolicy)
        .callbacks(recording_callbacks(&log))
        .build()
        .expect("valid config");
    pager.on_layout(300.0, 600.0);
    pager.set_page_without_animation(2);
    host.pump();
    log.borrow_mut().clear();

    pager.set_children(vec![PageKey::from("archive"), PageKey::from("trash")]);
    host.pump();

    assert_eq!(*log.borrow(), vec![Call::Selected(1)]);
    assert_eq!(pager.current_page(), 1);
    assert_eq!(pager.raw_offset(), -300.0);
    assert_eq!(host.keys().len(), 2);
    assert_eq!(
        host.lifecycle().entry(1).map(|entry| entry.key.as_str()),
        Some("trash")
    );
    // Key tracking disables clipped page removal
    assert!(pager.with_engine(|engine| !engine.clipping().is_enabled()));
}

#[test]
fn test_bounce_overscroll_reports_side() {
    let config = PagerConfig::default().with_bounce(BounceConfig::default());
    let (pager, mut host, log) = build(config, 3);
    pager.on_layout(300.0, 600.0);
    pager.set_page_without_animation(2);
    host.pump();
    log.borrow_mut().clear();

    swipe(&pager, -150.0, -200.0);
    run_until_idle(&pager, &mut host);

    let calls = log.borrow().clone();
    assert!(calls.contains(&Call::Overscroll(OverscrollSide::Right)));
    assert!(!calls.iter().any(|call| matches!(call, Call::Selected(_))));
    assert_eq!(pager.current_page(), 2);
    assert_eq!(pager.raw_offset(), -600.0);
}

#[test]
fn test_slots_combine_lifecycle_and_engine() {
    let config = PagerConfig::default().with_lazy(1);
    let (pager, mut host, _log) = build(config, 5);
    pager.on_layout(300.0, 600.0);
    host.pump();

    let slots = host.slots(&pager);
    assert_eq!(slots.len(), 5);
    assert!(slots[1].is_mounted);
    assert!(!slots[2].is_mounted);
    assert!(slots[1].is_attached);
    assert!(!slots[3].is_attached);
    assert_eq!(slots[0].mount_opacity, 1.0);
    assert_eq!(slots[1].transform, pagekit_pager::PageTransform::IDENTITY);

    pager.set_page_without_animation(3);
    host.pump();
    let slots = host.slots(&pager);
    assert!(slots[3].is_mounted);
    assert!(slots[3].is_attached);
    assert_eq!(slots[3].mount_opacity, 0.0);

    for _ in 0..20 {
        host.tick(FRAME);
    }
    assert_eq!(host.slots(&pager)[3].mount_opacity, 1.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = PagerConfig::default();
    config.page_activation_threshold = 1.5;
    assert!(PagerBuilder::new(config).page_count(3).build().is_err());
}
