//! # Notification Lifecycle Integration Test
//!
//! Drives the whole widget layer frame by frame and checks the queue rules:
//! bounded intake, FIFO order, task suffix, one move at a time and
//! exactly-once free.

use std::sync::Arc;
use std::time::Duration;

use herald_widgets::{
    IconSet, MessageRequest, MonospaceMetrics, NoBadges, PushOutcome, ScreenInfo, TaskId,
    TaskSnapshot, TextureId, WidgetIcon, Widgets, WidgetsConfig,
};

const FRAME: Duration = Duration::from_millis(10);

fn widgets_with(config: WidgetsConfig, icons: IconSet) -> Widgets {
    Widgets::init(
        config,
        Arc::new(MonospaceMetrics::default()),
        Arc::new(NoBadges),
        icons,
        ScreenInfo::new(1920, 1080, 1.0),
    )
    .expect("default setup is valid")
}

fn widgets() -> Widgets {
    widgets_with(WidgetsConfig::default(), IconSet::new())
}

fn row_icons() -> IconSet {
    IconSet::new()
        .with(WidgetIcon::MsgQueueIcon, TextureId(1))
        .with(WidgetIcon::MsgQueueIconOutline, TextureId(2))
        .with(WidgetIcon::MsgQueueIconRect, TextureId(3))
}

fn frames(widgets: &mut Widgets, count: usize) {
    for _ in 0..count {
        widgets.advance(FRAME);
    }
}

fn onscreen_texts(widgets: &Widgets) -> Vec<String> {
    widgets
        .queue()
        .onscreen()
        .map(|(_, n)| n.latest_text().to_owned())
        .collect()
}

fn assert_tasks_are_suffix(widgets: &Widgets) {
    let kinds: Vec<bool> = widgets.queue().onscreen().map(|(_, n)| n.is_task()).collect();
    let first_task = kinds.iter().position(|t| *t).unwrap_or(kinds.len());
    assert!(
        kinds[first_task..].iter().all(|t| *t),
        "message below a task row: {kinds:?}"
    );
    assert_eq!(kinds.len() - first_task, widgets.queue().tasks_count());
}

/// Test: exceeding the pending capacity drops exactly the overflow.
#[test]
fn test_pending_capacity_drops_overflow_in_order() {
    let mut widgets = widgets();
    let handle = widgets.handle();

    let outcomes: Vec<PushOutcome> = (0..40)
        .map(|i| handle.push_message(&format!("m{i}"), Duration::from_secs(60)))
        .collect();

    assert!(outcomes[..32].iter().all(|o| o.is_queued()));
    assert!(outcomes[32..].iter().all(|o| *o == PushOutcome::Dropped));
    assert_eq!(widgets.pending_len(), 32);

    widgets.advance(FRAME);

    assert_eq!(onscreen_texts(&widgets), vec!["m0"]);
    let pending: Vec<String> = widgets
        .queue()
        .pending()
        .map(|(_, n)| n.text().to_owned())
        .collect();
    let expected: Vec<String> = (1..32).map(|i| format!("m{i}")).collect();
    assert_eq!(pending, expected);

    // One slot came back with the drain.
    assert!(handle.push_message("late", Duration::from_secs(1)).is_queued());
    assert_eq!(handle.push_message("later", Duration::from_secs(1)), PushOutcome::Dropped);
}

/// Test: three messages appear in push order and leave in the same order,
/// one kill at a time.
#[test]
fn test_three_messages_expire_in_arrival_order() {
    let mut widgets = widgets();
    for (text, ms) in [("a", 1000), ("b", 2000), ("c", 3000)] {
        assert!(widgets
            .push(MessageRequest::message(text, Duration::from_millis(ms)))
            .is_queued());
    }

    let mut history: Vec<Vec<String>> = Vec::new();
    let mut last_kills = 0;
    for _ in 0..800 {
        let before = widgets.onscreen_len();
        widgets.advance(FRAME);

        let kills = widgets.queue().stats().kills;
        assert!(kills - last_kills <= 1);
        last_kills = kills;
        assert!(before.abs_diff(widgets.onscreen_len()) <= 1);

        let texts = onscreen_texts(&widgets);
        if history.last() != Some(&texts) {
            history.push(texts);
        }
    }

    let expected: Vec<Vec<String>> = [
        vec!["a"],
        vec!["a", "b"],
        vec!["a", "b", "c"],
        vec!["b", "c"],
        vec!["c"],
        vec![],
    ]
    .into_iter()
    .map(|v| v.into_iter().map(str::to_owned).collect())
    .collect();
    assert_eq!(history, expected);

    let stats = widgets.queue().stats();
    assert_eq!(stats.drained, 3);
    assert_eq!(stats.kills, 3);
    assert_eq!(stats.freed, 3);
}

/// Test: free happens once, after the drop and the fade have both run out.
#[test]
fn test_free_after_both_kill_animations() {
    let mut widgets = widgets();
    let _ = widgets.push(MessageRequest::message("bye", Duration::from_millis(100)));

    let mut guard = 0;
    while widgets.queue().stats().kills == 0 {
        widgets.advance(FRAME);
        guard += 1;
        assert!(guard < 200, "message never expired");
    }

    let (_, dying) = widgets.queue().onscreen().next().expect("dying row stays listed");
    assert!(dying.is_dying());
    let start_offset = dying.offset_y();
    assert!(widgets.is_moving());

    frames(&mut widgets, 20);
    let (_, dying) = widgets.queue().onscreen().next().expect("still fading");
    assert!(dying.alpha() < 1.0 && dying.alpha() > 0.0);
    assert!(dying.offset_y() < start_offset);
    assert_eq!(widgets.queue().stats().freed, 0);

    frames(&mut widgets, 15);
    assert_eq!(widgets.queue().stats().freed, 1);
    assert_eq!(widgets.onscreen_len(), 0);
    assert!(!widgets.is_moving());

    frames(&mut widgets, 100);
    assert_eq!(widgets.queue().stats().freed, 1);
}

/// Test: mixed traffic keeps tasks in a suffix and never starts two
/// transitions in one frame.
#[test]
fn test_mixed_traffic_invariants() {
    let config = WidgetsConfig {
        task_finished_duration_ms: 200,
        ..WidgetsConfig::default()
    };
    let mut widgets = widgets_with(config, row_icons());
    let handle = widgets.handle();

    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };

    let mut running: Vec<TaskSnapshot> = Vec::new();
    let mut next_task = 0u64;
    let mut last = widgets.queue().stats();

    for frame in 0..4000 {
        if frame % 7 == 0 {
            match next() % 4 {
                // Four running rows would starve the messages of screen room.
                0 if running.len() < 2 => {
                    next_task += 1;
                    let task = TaskSnapshot::new(TaskId(next_task), format!("task {next_task}"))
                        .with_progress(0);
                    if handle.push_task(task.clone()).is_queued() {
                        running.push(task);
                    }
                }
                1 if !running.is_empty() => {
                    let i = next() as usize % running.len();
                    if handle.push_task(running[i].clone().finished()).is_queued() {
                        running.swap_remove(i);
                    }
                }
                _ => {
                    let ms = 200 + u64::from(next() % 800);
                    let _ = handle.push_message(&format!("msg {frame}"), Duration::from_millis(ms));
                }
            }
        }

        widgets.advance(FRAME);

        let stats = widgets.queue().stats();
        let started = (stats.drained - last.drained) + (stats.kills - last.kills);
        assert!(started <= 1, "frame {frame} started {started} transitions");
        assert!(stats.freed <= stats.kills);
        last = stats;

        assert!(widgets.onscreen_len() <= widgets.config().onscreen_max);
        assert_tasks_are_suffix(&widgets);
    }

    for task in running.drain(..) {
        let mut attempts = 0;
        while !handle.push_task(task.clone().finished()).is_queued() {
            frames(&mut widgets, 10);
            attempts += 1;
            assert!(attempts < 10_000, "intake never freed up");
        }
    }
    frames(&mut widgets, 20_000);

    let stats = widgets.queue().stats();
    assert_eq!(widgets.onscreen_len(), 0);
    assert_eq!(widgets.pending_len(), 0);
    assert_eq!(stats.freed, stats.kills);
    assert_eq!(stats.freed, stats.created);
}

/// Test: with row icons a message unfolds after its move, and the next
/// drain waits for the unfold.
#[test]
fn test_unfold_blocks_next_drain() {
    let mut widgets = widgets_with(WidgetsConfig::default(), row_icons());
    for text in ["first", "second"] {
        let _ = widgets.push(MessageRequest::message(text, Duration::from_secs(30)));
    }

    widgets.advance(FRAME);
    let (_, first) = widgets.queue().onscreen().next().expect("drained");
    assert!(!first.is_unfolded());
    assert!(first.unfold() < f32::EPSILON);

    frames(&mut widgets, 40);
    let (_, first) = widgets.queue().onscreen().next().expect("drained");
    assert!(first.is_unfolding());
    assert!(widgets.is_moving());
    assert_eq!(widgets.onscreen_len(), 1);

    frames(&mut widgets, 30);
    assert_eq!(widgets.onscreen_len(), 2);
    let (_, first) = widgets.queue().onscreen().next().expect("drained");
    assert!(first.is_unfolded());
    assert!((first.unfold() - 1.0).abs() < f32::EPSILON);
}

/// Test: an unchanged title is a plain update.
#[test]
fn test_task_update_with_same_title() {
    let mut widgets = widgets();
    let task = TaskSnapshot::new(TaskId(1), "Downloading").with_progress(0);

    let _ = widgets.push(MessageRequest::task(task.clone()));
    frames(&mut widgets, 50);
    assert_eq!(widgets.onscreen_len(), 1);

    let _ = widgets.push(MessageRequest::task(task.with_progress(40)));
    frames(&mut widgets, 5);

    let stats = widgets.queue().stats();
    assert_eq!(widgets.onscreen_len(), 1);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.updates, 1);
    assert_eq!(stats.text_transitions, 0);

    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    assert_eq!(n.task().and_then(|t| t.progress), Some(40));
    assert_eq!(n.incoming_text(), None);
}

/// Test: one crossfade per distinct title, none with the alternative look.
#[test]
fn test_title_change_transitions() {
    let mut widgets = widgets();
    let task = TaskSnapshot::new(TaskId(7), "Step 1");
    let _ = widgets.push(MessageRequest::task(task.clone()));
    frames(&mut widgets, 50);

    let step2 = task.retitled("Step 2");
    let _ = widgets.push(MessageRequest::task(step2.clone()));
    frames(&mut widgets, 2);
    let _ = widgets.push(MessageRequest::task(step2.clone()));
    frames(&mut widgets, 2);
    assert_eq!(widgets.queue().stats().text_transitions, 1);

    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    assert_eq!(n.text(), "Step 1");
    assert_eq!(n.incoming_text(), Some("Step 2"));

    frames(&mut widgets, 80);
    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    assert_eq!(n.text(), "Step 2");
    assert_eq!(n.incoming_text(), None);

    let step3 = step2.retitled("Step 3");
    let _ = widgets.push(MessageRequest::task(step3.clone()));
    frames(&mut widgets, 1);
    assert_eq!(widgets.queue().stats().text_transitions, 2);

    let step4 = step3.retitled("Step 4").with_alternative_look(true);
    let _ = widgets.push(MessageRequest::task(step4));
    frames(&mut widgets, 1);
    assert_eq!(widgets.queue().stats().text_transitions, 2);
    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    assert_eq!(n.text(), "Step 4");
    assert_eq!(n.task().map(|t| t.reuse_count), Some(4));
}

/// Test: a successor task takes over its predecessor's row.
#[test]
fn test_successor_reuses_row() {
    let mut widgets = widgets();
    let first = TaskSnapshot::new(TaskId(1), "Scanning").with_progress(100);
    let _ = widgets.push(MessageRequest::task(first));
    frames(&mut widgets, 50);

    let second = TaskSnapshot::new(TaskId(2), "Indexing")
        .with_progress(0)
        .succeeding(TaskId(1));
    let _ = widgets.push(MessageRequest::task(second.clone()));
    frames(&mut widgets, 80);

    assert_eq!(widgets.onscreen_len(), 1);
    assert_eq!(widgets.queue().stats().created, 1);
    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    assert_eq!(n.text(), "Indexing");
    assert_eq!(n.task().map(|t| t.id), Some(TaskId(2)));

    // Later pushes of the successor find the row directly.
    let _ = widgets.push(MessageRequest::task(second.with_progress(50)));
    frames(&mut widgets, 1);
    assert_eq!(widgets.queue().stats().created, 1);
}

/// Test: a finished task expires after the finished delay, a failed one
/// shows the failure text first.
#[test]
fn test_finished_task_expires() {
    let config = WidgetsConfig {
        task_finished_duration_ms: 300,
        ..WidgetsConfig::default()
    };
    let mut widgets = widgets_with(config, IconSet::new());
    let task = TaskSnapshot::new(TaskId(3), "Compiling shaders").with_progress(60);
    let _ = widgets.push(MessageRequest::task(task.clone()));
    frames(&mut widgets, 50);

    let _ = widgets.push(MessageRequest::task(task.failed()));
    frames(&mut widgets, 2);
    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    let status = n.task().and_then(|t| t.status_text()).expect("status text");
    assert_eq!(status, "Task failed");
    assert_eq!(widgets.queue().stats().kills, 0);

    frames(&mut widgets, 80);
    assert_eq!(widgets.onscreen_len(), 0);
    assert_eq!(widgets.queue().tasks_count(), 0);
}

/// Test: a cancelled task lingers for the finished delay, then leaves.
#[test]
fn test_cancelled_task_expires() {
    let config = WidgetsConfig {
        task_finished_duration_ms: 300,
        ..WidgetsConfig::default()
    };
    let mut widgets = widgets_with(config, IconSet::new());
    let task = TaskSnapshot::new(TaskId(8), "Uploading save").with_progress(60);
    let _ = widgets.push(MessageRequest::task(task.clone()));
    frames(&mut widgets, 50);
    assert_eq!(widgets.queue().tasks_count(), 1);

    let _ = widgets.push(MessageRequest::task(task.cancelled()));
    frames(&mut widgets, 20);
    let (_, n) = widgets.queue().onscreen().next().expect("task row");
    assert!(n.task().is_some_and(|t| t.cancelled && !t.finished));
    assert_eq!(widgets.queue().stats().kills, 0);

    frames(&mut widgets, 60);
    assert_eq!(widgets.queue().stats().kills, 1);
    assert_eq!(widgets.onscreen_len(), 0);
    assert_eq!(widgets.queue().tasks_count(), 0);
}

/// Test: a message that never times out stays up without disturbing the queue.
#[test]
fn test_unbounded_duration_message_stays() {
    let mut widgets = widgets();
    let _ = widgets.push(MessageRequest::message("sticky", Duration::MAX));
    frames(&mut widgets, 1);
    assert_eq!(onscreen_texts(&widgets), vec!["sticky"]);

    let _ = widgets.push(MessageRequest::message("brief", Duration::from_millis(100)));
    frames(&mut widgets, 300);
    assert_eq!(onscreen_texts(&widgets), vec!["sticky"]);
    assert_eq!(widgets.queue().stats().kills, 1);
}

/// Test: pushes bounce while inactive; non-persistent deinit clears the queue.
#[test]
fn test_deinit_and_reinit() {
    let mut widgets = widgets();
    let handle = widgets.handle();
    let _ = handle.push_message("one", Duration::from_secs(10));
    let _ = handle.push_message("two", Duration::from_secs(10));
    frames(&mut widgets, 1);

    widgets.deinit();
    assert!(!widgets.is_active());
    assert_eq!(widgets.onscreen_len(), 0);
    assert_eq!(widgets.pending_len(), 0);
    assert_eq!(handle.push_message("three", Duration::from_secs(1)), PushOutcome::Inactive);
    assert_eq!(handle.push_achievement("Nope", None), PushOutcome::Inactive);
    assert!(widgets.frame().is_empty());
    assert!(!widgets.set_fps_text("60 fps"));
    assert!(!widgets.start_load_content("Game.bin", true, Some(TextureId(5))));

    widgets
        .reinit(IconSet::new(), ScreenInfo::new(1280, 720, 1.0))
        .expect("screen is valid");
    assert!(handle.push_message("four", Duration::from_secs(1)).is_queued());
    frames(&mut widgets, 1);
    assert_eq!(onscreen_texts(&widgets), vec!["four"]);
    assert!((widgets.layout().screen_width - 1280.0).abs() < f32::EPSILON);
    assert!(widgets.set_fps_text("60 fps"));
}

/// Test: a persistent layer keeps its rows across deinit.
#[test]
fn test_persistent_deinit_keeps_rows() {
    let mut widgets = widgets();
    widgets.set_persistent(true);
    let _ = widgets.push(MessageRequest::message("stay", Duration::from_secs(10)));
    frames(&mut widgets, 1);

    widgets.deinit();
    assert_eq!(widgets.onscreen_len(), 1);

    // Frozen while inactive.
    frames(&mut widgets, 2000);
    assert_eq!(widgets.onscreen_len(), 1);
}

/// Test: bad setup is refused.
#[test]
fn test_init_rejects_bad_setup() {
    let config = WidgetsConfig {
        pending_capacity: 0,
        ..WidgetsConfig::default()
    };
    let result = Widgets::init(
        config,
        Arc::new(MonospaceMetrics::default()),
        Arc::new(NoBadges),
        IconSet::new(),
        ScreenInfo::new(1920, 1080, 1.0),
    );
    assert!(matches!(result, Err(herald_widgets::WidgetsError::InvalidConfig(_))));

    let result = Widgets::init(
        WidgetsConfig::default(),
        Arc::new(MonospaceMetrics::default()),
        Arc::new(NoBadges),
        IconSet::new(),
        ScreenInfo::new(0, 1080, 1.0),
    );
    assert!(matches!(result, Err(herald_widgets::WidgetsError::EmptyScreen { .. })));
}

/// Test: producers on other threads never exceed the pending capacity.
#[test]
fn test_concurrent_producers() {
    let mut widgets = widgets();
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let handle = widgets.handle();
            std::thread::spawn(move || {
                (0..100)
                    .filter(|i| {
                        handle
                            .push_message(&format!("p{p}-{i}"), Duration::from_millis(50))
                            .is_queued()
                    })
                    .count()
            })
        })
        .collect();

    let accepted: usize = producers
        .into_iter()
        .map(|p| p.join().expect("producer panicked"))
        .sum();
    assert!(accepted >= 1);
    assert!(accepted <= widgets.config().pending_capacity);
    assert_eq!(widgets.pending_len(), accepted);

    frames(&mut widgets, 20_000);
    assert_eq!(widgets.queue().stats().freed as usize, accepted);
}
