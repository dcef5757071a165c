//! # Achievement Ring Integration Test
//!
//! Fills the popup ring past capacity and watches the chain hand over from
//! one popup to the next without extra pushes.

use std::sync::Arc;
use std::time::Duration;

use herald_widgets::{
    BadgeResolver, IconSet, MonospaceMetrics, PushOutcome, ScreenInfo, TextureId, Widgets,
    WidgetsConfig,
};

const FRAME: Duration = Duration::from_millis(10);

struct NumberedBadges;

impl BadgeResolver for NumberedBadges {
    fn resolve(&self, key: &str) -> Option<TextureId> {
        key.strip_prefix("badge-")?.parse().ok().map(TextureId)
    }
}

fn widgets() -> Widgets {
    let config = WidgetsConfig {
        achievement_hold_ms: 100,
        ..WidgetsConfig::default()
    };
    Widgets::init(
        config,
        Arc::new(MonospaceMetrics::default()),
        Arc::new(NumberedBadges),
        IconSet::new(),
        ScreenInfo::new(1920, 1080, 1.0),
    )
    .expect("default setup is valid")
}

fn current_title(widgets: &Widgets) -> Option<String> {
    widgets.achievements().view().map(|v| v.popup.title)
}

/// Test: the ninth push into an eight-slot ring is dropped, and finishing
/// one popup starts the next on its own.
#[test]
fn test_ring_overflow_and_auto_advance() {
    let mut widgets = widgets();
    let handle = widgets.handle();

    let outcomes: Vec<PushOutcome> = (0..9)
        .map(|i| handle.push_achievement(&format!("a{i}"), None))
        .collect();
    assert!(outcomes[..8].iter().all(|o| o.is_queued()));
    assert_eq!(outcomes[8], PushOutcome::Dropped);
    assert_eq!(widgets.achievements().queued(), 8);

    widgets.advance(FRAME);
    assert_eq!(current_title(&widgets).as_deref(), Some("a0"));
    assert!(widgets.achievements().is_active());

    let mut guard = 0;
    while widgets.achievements().shown() == 0 {
        widgets.advance(FRAME);
        guard += 1;
        assert!(guard < 1000, "first popup never finished");
    }

    assert_eq!(widgets.achievements().queued(), 7);
    assert_eq!(current_title(&widgets).as_deref(), Some("a1"));
    assert!(widgets.achievements().is_active());

    assert!(handle.push_achievement("late", None).is_queued());
    assert_eq!(handle.push_achievement("too late", None), PushOutcome::Dropped);
}

/// Test: the popup slides in, opens, closes and slides out.
#[test]
fn test_popup_animation_chain() {
    let mut widgets = widgets();
    let _ = widgets.push_achievement("First Blood", Some("badge-12"));

    widgets.advance(FRAME);
    let view = widgets.achievements().view().expect("popup started");
    assert_eq!(view.popup.badge, Some(TextureId(12)));
    assert!(view.y < 0.0);
    assert!(view.unfold < f32::EPSILON);
    let font = widgets.layout().font_size;
    assert!((view.height - font * 4.0).abs() < 1e-3);

    // Slide-in done, unfold running.
    for _ in 0..50 {
        widgets.advance(FRAME);
    }
    let view = widgets.achievements().view().expect("popup shown");
    assert!(view.y.abs() < 1e-3);
    assert!(view.unfold > 0.0);

    // Held open.
    for _ in 0..18 {
        widgets.advance(FRAME);
    }
    let view = widgets.achievements().view().expect("popup held");
    assert!((view.unfold - 1.0).abs() < 1e-3);

    for _ in 0..200 {
        widgets.advance(FRAME);
    }
    assert!(widgets.achievements().view().is_none());
    assert!(!widgets.achievements().is_active());
    assert_eq!(widgets.achievements().shown(), 1);
}

/// Test: a push into a drained ring starts a fresh chain.
#[test]
fn test_push_after_idle_restarts_chain() {
    let mut widgets = widgets();
    let _ = widgets.push_achievement("One", None);
    for _ in 0..300 {
        widgets.advance(FRAME);
    }
    assert_eq!(widgets.achievements().shown(), 1);
    assert!(current_title(&widgets).is_none());

    let _ = widgets.push_achievement("Two", Some("unknown"));
    widgets.advance(FRAME);
    let view = widgets.achievements().view().expect("second popup");
    assert_eq!(view.popup.title, "Two");
    assert_eq!(view.popup.badge, None);
}

/// Test: deinit empties the ring.
#[test]
fn test_deinit_clears_ring() {
    let mut widgets = widgets();
    for i in 0..3 {
        let _ = widgets.push_achievement(&format!("a{i}"), None);
    }
    widgets.advance(FRAME);

    widgets.deinit();
    assert_eq!(widgets.achievements().queued(), 0);
    assert!(widgets.achievements().view().is_none());

    widgets
        .reinit(IconSet::new(), ScreenInfo::new(1920, 1080, 1.0))
        .expect("screen is valid");
    assert!(widgets.push_achievement("again", None).is_queued());
    widgets.advance(FRAME);
    assert_eq!(current_title(&widgets).as_deref(), Some("again"));
}

/// Test: pushes from many threads never overfill the ring.
#[test]
fn test_concurrent_pushes_respect_capacity() {
    let widgets = widgets();
    let threads: Vec<_> = (0..4)
        .map(|t| {
            let handle = widgets.handle();
            std::thread::spawn(move || {
                (0..10)
                    .filter(|i| handle.push_achievement(&format!("t{t}-{i}"), None).is_queued())
                    .count()
            })
        })
        .collect();

    let accepted: usize = threads
        .into_iter()
        .map(|t| t.join().expect("pusher panicked"))
        .sum();
    assert_eq!(accepted, 8);
    assert_eq!(widgets.achievements().queued(), 8);
}
