//! # Notification Soak
//!
//! Hammers the widget layer from several producer threads while the main
//! thread plays render loop, then prints what got through.
//!
//! ## Usage
//!
//! ```bash
//! notification_soak --seconds 20 --producers 4 --config widgets.toml
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use herald_core::FrameClock;
use herald_widgets::{
    IconSet, MonospaceMetrics, NoBadges, ScreenInfo, StatusIndicators, TaskId, TaskSnapshot,
    TextureId, WidgetIcon, Widgets, WidgetsConfig, WidgetsHandle,
};

/// Tallies shared by all producers.
#[derive(Default)]
struct ProducerTally {
    queued: AtomicU64,
    dropped: AtomicU64,
    achievements: AtomicU64,
}

fn produce(id: u64, handle: &WidgetsHandle, stop: &AtomicBool, tally: &ProducerTally) {
    let mut step = 0u64;
    let mut task = TaskSnapshot::new(TaskId(id), format!("Producer {id} job 0")).with_progress(0);

    while !stop.load(Ordering::Relaxed) {
        step += 1;

        let outcome = match step % 5 {
            0 => handle.push_message(
                &format!("Producer {id} says hello #{step}"),
                Duration::from_millis(500 + (step % 7) * 200),
            ),
            1 | 2 | 3 => {
                let progress = task.progress.map_or(0, i32::from) + 10;
                task = if progress > 100 {
                    let done = task.clone().finished();
                    let next = TaskId(task.id.0 + 1000);
                    let _ = handle.push_task(done);
                    TaskSnapshot::new(next, format!("Producer {id} job {}", next.0 / 1000))
                        .with_progress(0)
                        .succeeding(task.id)
                } else {
                    task.clone().with_progress(progress)
                };
                handle.push_task(task.clone())
            }
            _ => {
                let outcome = handle.push_achievement(&format!("Soaked #{step}"), None);
                if outcome.is_queued() {
                    tally.achievements.fetch_add(1, Ordering::Relaxed);
                }
                outcome
            }
        };

        if outcome.is_queued() {
            tally.queued.fetch_add(1, Ordering::Relaxed);
        } else {
            tally.dropped.fetch_add(1, Ordering::Relaxed);
        }

        thread::sleep(Duration::from_millis(3 + id % 5));
    }
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         HERALD NOTIFICATION SOAK                                 ║");
    println!("║         PRODUCERS NEVER BLOCK, THE FRAME NEVER STALLS            ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let mut seconds = 10u64;
    let mut producers = 4u64;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seconds" | "-s" => {
                if i + 1 < args.len() {
                    seconds = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--producers" | "-p" => {
                if i + 1 < args.len() {
                    producers = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            other => println!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match WidgetsConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                println!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => WidgetsConfig::default(),
    };

    let icons = IconSet::new()
        .with(WidgetIcon::MsgQueueIcon, TextureId(1))
        .with(WidgetIcon::MsgQueueIconOutline, TextureId(2))
        .with(WidgetIcon::MsgQueueIconRect, TextureId(3))
        .with(WidgetIcon::Hourglass, TextureId(4));

    let mut widgets = match Widgets::init(
        config,
        Arc::new(MonospaceMetrics::default()),
        Arc::new(NoBadges),
        icons,
        ScreenInfo::new(1920, 1080, 1.0),
    ) {
        Ok(widgets) => widgets,
        Err(e) => {
            println!("Error: widgets failed to initialize: {e}");
            std::process::exit(1);
        }
    };

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Duration:           {seconds} seconds");
    println!("│ Producers:          {producers} threads");
    println!("│ Pending capacity:   {}", widgets.config().pending_capacity);
    println!("│ On-screen max:      {}", widgets.config().onscreen_max);
    println!("│ Achievement ring:   {}", widgets.config().achievement_capacity);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let stop = Arc::new(AtomicBool::new(false));
    let tally = Arc::new(ProducerTally::default());
    let threads: Vec<_> = (1..=producers)
        .map(|id| {
            let handle = widgets.handle();
            let stop = Arc::clone(&stop);
            let tally = Arc::clone(&tally);
            thread::spawn(move || produce(id, &handle, &stop, &tally))
        })
        .collect();

    let mut clock = FrameClock::new();
    let start = Instant::now();
    let mut slowest = Duration::ZERO;
    let mut over_budget = 0u64;
    let mut max_onscreen = 0usize;
    let mut commands = 0usize;

    while start.elapsed() < Duration::from_secs(seconds) {
        let delta = clock.tick();
        if delta.over_budget {
            over_budget += 1;
        }

        let work = Instant::now();
        widgets.set_indicators(StatusIndicators {
            fast_forward: delta.frame % 600 < 120,
            ..StatusIndicators::default()
        });
        widgets.advance(delta.delta);
        commands += widgets.frame().len();
        slowest = slowest.max(work.elapsed());
        max_onscreen = max_onscreen.max(widgets.onscreen_len());

        if let Some(rest) = clock.target().checked_sub(work.elapsed()) {
            thread::sleep(rest);
        }
    }

    stop.store(true, Ordering::Relaxed);
    for thread in threads {
        if thread.join().is_err() {
            println!("⚠ a producer panicked");
        }
    }

    let frames = clock.frame();
    let stats = widgets.queue().stats();

    println!("┌─ RESULTS ─────────────────────────────────────────────────────┐");
    println!("│ Frames:             {frames} ({over_budget} over budget)");
    println!("│ Slowest frame work: {slowest:?}");
    println!("│ Draw commands:      {:.1} per frame", commands as f64 / frames.max(1) as f64);
    println!("│ Pushes queued:      {}", tally.queued.load(Ordering::Relaxed));
    println!("│ Pushes dropped:     {}", tally.dropped.load(Ordering::Relaxed));
    println!("│ Created / updated:  {} / {}", stats.created, stats.updates);
    println!("│ Drained / freed:    {} / {}", stats.drained, stats.freed);
    println!("│ Title crossfades:   {}", stats.text_transitions);
    println!("│ Max on screen:      {max_onscreen}");
    println!(
        "│ Achievements:       {} queued, {} shown",
        tally.achievements.load(Ordering::Relaxed),
        widgets.achievements().shown()
    );
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    widgets.deinit();

    if max_onscreen <= widgets.config().onscreen_max {
        println!("✓ On-screen limit held");
    } else {
        println!("⚠ On-screen limit exceeded");
        std::process::exit(1);
    }
}
