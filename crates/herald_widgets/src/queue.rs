//! # Notification Queue
//!
//! The lifecycle engine behind toast messages and task rows.
//!
//! ```text
//!  producers ──> intake ──> pending FIFO ──drain──> on-screen list ──kill──> dying ──> freed
//!                 (N)          (N)                     (M)
//! ```
//!
//! ## Rules
//!
//! - At most one drain and at most one kill begin per frame, and neither
//!   begins while anything is moving (a move pass, an unfold or a fade-out).
//! - Task rows occupy a contiguous suffix of the on-screen list. Free-standing
//!   messages are inserted at the boundary.
//! - A dying notification is freed only by its own fade-out completion.
//!
//! Everything here runs on the render thread. Producers only ever touch the
//! intake channel.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::time::Duration;

use herald_core::sync::IntakeReceiver;
use herald_core::{Easing, SlotArena, SlotId, TimerService, Tween, TweenEngine, TweenTarget};

use crate::config::WidgetsConfig;
use crate::layout::WidgetLayout;
use crate::notification::{MessageRequest, MsgField, Notification, QueueEvent};
use crate::task::{TaskBindings, TaskSnapshot};
use crate::text::{word_wrap, FontMetrics};

/// Counters for tests, the soak binary and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Requests turned into new notifications.
    pub created: u64,
    /// Requests applied to an existing task notification.
    pub updates: u64,
    /// Requests lost because no slot was free.
    pub arena_drops: u64,
    /// Pending → on-screen transitions.
    pub drained: u64,
    /// Title crossfades started.
    pub text_transitions: u64,
    /// Kills started.
    pub kills: u64,
    /// Notifications freed.
    pub freed: u64,
}

#[derive(Debug, Clone, Copy)]
struct QueueTimings {
    animation: Duration,
    task_finished: Duration,
    hourglass_interval: Duration,
    hourglass_spin: Duration,
}

struct ArenaWriter<'a>(&'a mut SlotArena<Notification>);

impl TweenTarget<SlotId, MsgField> for ArenaWriter<'_> {
    fn write(&mut self, owner: SlotId, field: MsgField, value: f32) -> bool {
        match self.0.get_mut(owner) {
            Some(notification) => {
                notification.write(field, value);
                true
            }
            None => false,
        }
    }
}

/// Pending FIFO, on-screen list and every notification's animations.
pub struct NotificationQueue {
    timings: QueueTimings,
    onscreen_max: usize,
    pending_capacity: usize,

    intake: IntakeReceiver<MessageRequest>,
    arena: SlotArena<Notification>,
    pending: VecDeque<SlotId>,
    onscreen: Vec<SlotId>,
    bindings: TaskBindings,
    tasks_count: usize,

    tweens: TweenEngine<SlotId, MsgField, QueueEvent>,
    timers: TimerService<QueueEvent>,

    move_in_flight: bool,
    unfolding: Option<SlotId>,
    dying: Option<SlotId>,
    has_icons: bool,

    stats: QueueStats,
}

impl NotificationQueue {
    /// Creates a queue fed by `intake`.
    #[must_use]
    pub fn new(config: &WidgetsConfig, intake: IntakeReceiver<MessageRequest>) -> Self {
        // Every live notification is either pending or on screen.
        let slots = config.pending_capacity + config.onscreen_max;

        Self {
            timings: QueueTimings {
                animation: config.animation_duration(),
                task_finished: config.task_finished_duration(),
                hourglass_interval: config.hourglass_interval(),
                hourglass_spin: config.hourglass_duration(),
            },
            onscreen_max: config.onscreen_max,
            pending_capacity: config.pending_capacity,
            intake,
            arena: SlotArena::new(slots),
            pending: VecDeque::with_capacity(config.pending_capacity),
            onscreen: Vec::with_capacity(config.onscreen_max),
            bindings: TaskBindings::new(),
            tasks_count: 0,
            tweens: TweenEngine::new(),
            timers: TimerService::new(),
            move_in_flight: false,
            unfolding: None,
            dying: None,
            has_icons: false,
            stats: QueueStats::default(),
        }
    }

    /// Sets whether new free-standing messages start folded.
    pub fn set_has_icons(&mut self, has_icons: bool) {
        self.has_icons = has_icons;
    }

    /// Advances one frame: intake, timers, tweens, one drain, one kill.
    pub fn advance(&mut self, delta: Duration, layout: &WidgetLayout, metrics: &dyn FontMetrics) {
        self.take_requests(layout, metrics);

        for event in self.timers.tick(delta) {
            self.dispatch(event);
        }

        let finished = self.tweens.tick(delta, &mut ArenaWriter(&mut self.arena));
        for event in finished {
            self.dispatch(event);
        }

        self.drain_one(layout);
        self.scan(layout);
    }

    // =========================================================================
    // Intake
    // =========================================================================

    fn take_requests(&mut self, layout: &WidgetLayout, metrics: &dyn FontMetrics) {
        while let Some(request) = self.intake.try_recv() {
            if let Some(task) = &request.task {
                if let Some(id) = self.bound_slot(task) {
                    self.update(id, task, layout, metrics);
                    self.intake.release(1);
                    continue;
                }
            }

            if self.pending.len() >= self.pending_capacity {
                tracing::debug!("pending queue full, dropping notification");
                self.intake.release(1);
                continue;
            }

            let notification = self.build(&request, layout, metrics);
            let Some(id) = self.arena.insert(notification) else {
                tracing::warn!("notification arena exhausted, dropping notification");
                self.stats.arena_drops += 1;
                self.intake.release(1);
                continue;
            };

            if let Some(task) = &request.task {
                self.bindings.bind(task.id, id);
            }
            self.pending.push_back(id);
            self.stats.created += 1;
        }
    }

    /// Live slot bound to `task` or to the task it succeeds.
    fn bound_slot(&mut self, task: &TaskSnapshot) -> Option<SlotId> {
        if let Some(id) = self.bindings.get(task.id) {
            if self.arena.contains(id) {
                return Some(id);
            }
            self.bindings.forget(task.id);
        }

        let predecessor = task.predecessor?;
        let id = self.bindings.get(predecessor)?;
        if !self.arena.contains(id) {
            self.bindings.forget(predecessor);
            return None;
        }

        self.bindings.hand_off(predecessor, task.id);
        if let Some(mirror) = self.arena.get_mut(id).and_then(|n| n.task.as_mut()) {
            mirror.id = task.id;
        }
        tracing::debug!(from = predecessor.0, to = task.id.0, "task notification handed off");
        Some(id)
    }

    fn build(
        &self,
        request: &MessageRequest,
        layout: &WidgetLayout,
        metrics: &dyn FontMetrics,
    ) -> Notification {
        let base_height = layout.text_scale * layout.font_size;

        if let Some(task) = &request.task {
            let width = layout.msg_text_width(metrics, &task.title) + layout.padding / 2.0;
            return Notification::for_task(task, width, base_height);
        }

        let mut column = if request.menu_alive {
            layout.column_width_menu_alive
        } else {
            layout.column_width
        };
        let text_width = layout.msg_text_width(metrics, &request.text);

        let (text, width, text_height) = if text_width > column {
            // Keep the second line at least a quarter of the text.
            let three_quarters = text_width - text_width / 4.0;
            if three_quarters < column {
                column = three_quarters;
            }
            let chars = request.text.chars().count();
            let line_chars = ((chars as f32 * column) / text_width) as usize;
            (word_wrap(&request.text, line_chars, 2), column, base_height * 2.5)
        } else {
            (request.text.clone(), text_width, base_height * 1.35)
        };

        Notification::message(
            request,
            text,
            width + layout.padding / 2.0,
            text_height,
            self.has_icons,
        )
    }

    fn update(
        &mut self,
        id: SlotId,
        task: &TaskSnapshot,
        layout: &WidgetLayout,
        metrics: &dyn FontMetrics,
    ) {
        let Self {
            arena,
            timers,
            tweens,
            stats,
            timings,
            ..
        } = self;
        let Some(notification) = arena.get_mut(id) else {
            return;
        };

        timers.kill(&mut notification.expiration_timer);
        notification.expiration_started = false;
        stats.updates += 1;

        let content_changed = notification.latest_text() != task.title;
        let Some(mirror) = notification.task.as_mut() else {
            return;
        };
        let generation_moved = mirror.title_generation != task.title_generation;

        if content_changed || generation_moved {
            mirror.title_generation = task.title_generation;
            mirror.reuse_count = mirror.reuse_count.saturating_add(1);
            notification.width =
                layout.msg_text_width(metrics, &task.title) + layout.padding / 2.0;
        }

        if content_changed {
            notification.incoming = Some(task.title.clone());
            notification.text_transition = 0.0;

            if task.alternative_look {
                tweens.kill(id, MsgField::TextTransition);
                notification.settle_text();
            } else {
                tweens.push(
                    Tween::new(
                        id,
                        MsgField::TextTransition,
                        0.0,
                        layout.row_height / 2.0,
                        timings.animation * 2,
                    )
                    .with_easing(Easing::OutQuad)
                    .on_complete(QueueEvent::TextTransitionEnd(id)),
                );
                stats.text_transitions += 1;
            }
        }

        if let Some(mirror) = notification.task.as_mut() {
            mirror.refresh(task);
        }
    }

    // =========================================================================
    // Completions
    // =========================================================================

    fn dispatch(&mut self, event: QueueEvent) {
        match event {
            QueueEvent::Expired(id) => {
                if let Some(n) = self.arena.get_mut(id) {
                    n.expired = true;
                }
            }
            QueueEvent::HourglassTick(id) => {
                if self.arena.contains(id) {
                    let spin = self.timings.hourglass_spin;
                    self.tweens.push(
                        Tween::new(id, MsgField::Hourglass, 0.0, -2.0 * PI, spin)
                            .with_easing(Easing::Linear)
                            .on_complete(QueueEvent::HourglassEnd(id)),
                    );
                }
            }
            QueueEvent::HourglassEnd(id) => self.restart_hourglass(id),
            QueueEvent::TextTransitionEnd(id) => {
                if let Some(n) = self.arena.get_mut(id) {
                    n.settle_text();
                }
            }
            QueueEvent::MoveEnd { unfold } => {
                self.move_in_flight = false;
                if let Some(id) = unfold {
                    self.start_unfold(id);
                }
            }
            QueueEvent::UnfoldEnd(id) => {
                if let Some(n) = self.arena.get_mut(id) {
                    n.unfolding = false;
                }
                if self.unfolding == Some(id) {
                    self.unfolding = None;
                }
            }
            QueueEvent::KillEnd(id) => self.free(id, true),
        }
    }

    fn restart_hourglass(&mut self, id: SlotId) {
        let Self { arena, timers, timings, .. } = self;
        if let Some(n) = arena.get_mut(id) {
            n.hourglass_rotation = 0.0;
            timers.start(
                &mut n.hourglass_timer,
                timings.hourglass_interval,
                QueueEvent::HourglassTick(id),
            );
        }
    }

    fn start_unfold(&mut self, id: SlotId) {
        let Some(n) = self.arena.get_mut(id) else {
            return;
        };
        if n.dying || n.unfolded {
            return;
        }

        n.unfolded = true;
        n.unfolding = true;
        self.unfolding = Some(id);
        self.tweens.push(
            Tween::new(id, MsgField::Unfold, n.unfold, 1.0, self.timings.animation)
                .on_complete(QueueEvent::UnfoldEnd(id)),
        );
    }

    fn start_expiration(&mut self, id: SlotId, duration: Duration) {
        let Self { arena, timers, .. } = self;
        let Some(n) = arena.get_mut(id) else {
            return;
        };
        if n.expiration_started {
            return;
        }
        timers.start(&mut n.expiration_timer, duration, QueueEvent::Expired(id));
        n.expiration_started = true;
    }

    // =========================================================================
    // Per-frame steps
    // =========================================================================

    fn drain_one(&mut self, layout: &WidgetLayout) {
        if self.pending.is_empty() || self.is_moving() || self.onscreen.len() >= self.onscreen_max {
            return;
        }
        let Some(id) = self.pending.pop_front() else {
            return;
        };
        self.intake.release(1);

        let Some(n) = self.arena.get(id) else {
            return;
        };
        let is_task = n.is_task();
        let duration = n.duration;

        if self.tasks_count == 0 || is_task {
            self.onscreen.push(id);
        } else {
            let boundary = self.onscreen.len() - self.tasks_count;
            self.onscreen.insert(boundary, id);
        }

        if is_task {
            self.tasks_count += 1;
            self.restart_hourglass(id);
        } else {
            self.start_expiration(id, (self.timings.animation * 2).saturating_add(duration));
        }

        self.stats.drained += 1;
        tracing::debug!(
            slot = id.raw(),
            task = is_task,
            onscreen = self.onscreen.len(),
            pending = self.pending.len(),
            "notification shown"
        );

        self.move_pass(layout);
    }

    fn scan(&mut self, layout: &WidgetLayout) {
        let finishing: Vec<SlotId> = self
            .onscreen
            .iter()
            .copied()
            .filter(|id| {
                self.arena
                    .get(*id)
                    .and_then(|n| n.task.as_ref())
                    .is_some_and(|t| t.finished || t.cancelled)
            })
            .collect();
        for id in finishing {
            self.start_expiration(id, self.timings.task_finished);
        }

        if self.is_moving() {
            return;
        }

        let expired = self.onscreen.iter().copied().find(|id| {
            self.arena
                .get(*id)
                .is_some_and(|n| n.expired && !n.dying)
        });
        if let Some(id) = expired {
            self.kill(id, layout);
        }
    }

    /// Re-targets every live row. Rows stack upwards from the bottom edge.
    fn move_pass(&mut self, layout: &WidgetLayout) {
        let mut y = 0.0;
        let mut unfold = None;
        let mut launched = Vec::new();

        for &id in self.onscreen.iter().rev() {
            let Some(n) = self.arena.get(id) else {
                continue;
            };
            if n.dying {
                continue;
            }

            let row = if n.is_task() {
                layout.row_height / 2.0
            } else {
                layout.row_height
            };
            y += row + layout.spacing;

            if !n.unfolded {
                unfold = Some(id);
            }
            if (n.offset_y - y).abs() > f32::EPSILON {
                launched.push((id, n.offset_y, y));
            }
        }

        // The frontmost launch (last in walk order) reports the settle.
        let last = launched.len().checked_sub(1);
        for (i, (id, from, to)) in launched.into_iter().enumerate() {
            let mut tween = Tween::new(id, MsgField::OffsetY, from, to, self.timings.animation);
            if Some(i) == last {
                tween = tween.on_complete(QueueEvent::MoveEnd { unfold });
            }
            self.tweens.push(tween);
            self.move_in_flight = true;
        }
    }

    fn kill(&mut self, id: SlotId, layout: &WidgetLayout) {
        let Some(n) = self.arena.get_mut(id) else {
            return;
        };
        n.dying = true;
        self.dying = Some(id);
        self.stats.kills += 1;

        let drop_to = n.offset_y - layout.row_height / 4.0;
        self.tweens.push(Tween::new(
            id,
            MsgField::OffsetY,
            n.offset_y,
            drop_to,
            self.timings.animation,
        ));
        self.tweens.push(
            Tween::new(id, MsgField::Alpha, n.alpha, 0.0, self.timings.animation)
                .on_complete(QueueEvent::KillEnd(id)),
        );

        tracing::debug!(slot = id.raw(), "notification expired");
        self.move_pass(layout);
    }

    fn free(&mut self, id: SlotId, touch_list: bool) {
        let Some(mut n) = self.arena.remove(id) else {
            return;
        };

        if let Some(task) = &n.task {
            if !task.is_terminal() {
                self.bindings.unbind(task.id, id);
            }
        }

        self.tweens.kill_by_owner(id);
        self.timers.kill(&mut n.hourglass_timer);
        self.timers.kill(&mut n.expiration_timer);

        if touch_list {
            if let Some(pos) = self.onscreen.iter().position(|x| *x == id) {
                self.onscreen.remove(pos);
                if n.is_task() {
                    self.tasks_count = self.tasks_count.saturating_sub(1);
                }
            }
        }

        if self.dying == Some(id) {
            self.dying = None;
        }
        if self.unfolding == Some(id) {
            self.unfolding = None;
        }
        self.stats.freed += 1;
        tracing::debug!(slot = id.raw(), onscreen = self.onscreen.len(), "notification freed");
    }

    /// Frees every notification without animating, empties the intake and
    /// resets all counters. Returns how many notifications were freed.
    pub fn teardown(&mut self) -> usize {
        let pending: Vec<SlotId> = self.pending.drain(..).collect();
        let onscreen: Vec<SlotId> = self.onscreen.drain(..).collect();
        let count = pending.len() + onscreen.len();

        for id in pending.into_iter().chain(onscreen) {
            self.free(id, false);
        }

        let discarded = self.intake.purge();
        self.tweens.kill_all();
        self.timers.kill_all();
        self.arena.clear();
        self.bindings.clear();
        self.tasks_count = 0;
        self.move_in_flight = false;
        self.unfolding = None;
        self.dying = None;

        tracing::info!(freed = count, discarded, "notification queue torn down");
        count
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// True while a move pass, an unfold or a fade-out is running.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.move_in_flight || self.unfolding.is_some() || self.dying.is_some()
    }

    /// Notifications on screen.
    #[must_use]
    pub fn onscreen_len(&self) -> usize {
        self.onscreen.len()
    }

    /// Notifications waiting to be shown, including requests still in the
    /// intake channel.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len() + self.intake.pending_count()
    }

    /// Task rows on screen.
    #[must_use]
    pub fn tasks_count(&self) -> usize {
        self.tasks_count
    }

    /// On-screen notifications, top to bottom.
    pub fn onscreen(&self) -> impl Iterator<Item = (SlotId, &Notification)> + '_ {
        self.onscreen
            .iter()
            .filter_map(|id| self.arena.get(*id).map(|n| (*id, n)))
    }

    /// Pending notifications, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = (SlotId, &Notification)> + '_ {
        self.pending
            .iter()
            .filter_map(|id| self.arena.get(*id).map(|n| (*id, n)))
    }

    /// Looks up a live notification.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&Notification> {
        self.arena.get(id)
    }

    /// Running counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::sync::BoundedIntake;

    use crate::assets::IconSet;
    use crate::layout::ScreenInfo;
    use crate::task::{TaskId, TaskSnapshot};
    use crate::text::MonospaceMetrics;

    const FRAME: Duration = Duration::from_millis(10);

    struct Rig {
        queue: NotificationQueue,
        tx: herald_core::sync::IntakeSender<MessageRequest>,
        layout: WidgetLayout,
        metrics: MonospaceMetrics,
    }

    impl Rig {
        fn new(config: &WidgetsConfig) -> Self {
            let (tx, rx) = BoundedIntake::create_pair(config.pending_capacity);
            let metrics = MonospaceMetrics::default();
            let layout = WidgetLayout::compute(
                ScreenInfo::new(1920, 1080, 1.0),
                config,
                &metrics,
                &IconSet::new(),
            );
            Self {
                queue: NotificationQueue::new(config, rx),
                tx,
                layout,
                metrics,
            }
        }

        fn step(&mut self, delta: Duration) {
            self.queue.advance(delta, &self.layout, &self.metrics);
        }

        fn run(&mut self, total: Duration) {
            let mut elapsed = Duration::ZERO;
            while elapsed < total {
                self.step(FRAME);
                elapsed += FRAME;
            }
        }

        fn texts(&self) -> Vec<String> {
            self.queue.onscreen().map(|(_, n)| n.text().to_owned()).collect()
        }
    }

    #[test]
    fn test_drain_waits_for_move_to_settle() {
        let mut rig = Rig::new(&WidgetsConfig::default());
        for text in ["a", "b"] {
            assert!(rig.tx.try_send(MessageRequest::message(text, Duration::from_secs(10))).is_sent());
        }

        rig.step(FRAME);
        assert_eq!(rig.queue.onscreen_len(), 1);
        assert!(rig.queue.is_moving());

        rig.step(FRAME);
        assert_eq!(rig.queue.onscreen_len(), 1);

        rig.run(Duration::from_millis(400));
        assert_eq!(rig.queue.onscreen_len(), 2);
    }

    #[test]
    fn test_rows_stack_from_bottom() {
        let mut rig = Rig::new(&WidgetsConfig::default());
        let _ = rig.tx.try_send(MessageRequest::message("a", Duration::from_secs(10)));
        rig.run(Duration::from_millis(400));

        let row = rig.layout.row_height + rig.layout.spacing;
        let (_, n) = rig.queue.onscreen().next().unwrap();
        assert!((n.offset_y() - row).abs() < 1e-3);
        assert!(!rig.queue.is_moving());
    }

    #[test]
    fn test_free_leaves_terminal_binding() {
        let config = WidgetsConfig {
            task_finished_duration_ms: 50,
            ..WidgetsConfig::default()
        };
        let mut rig = Rig::new(&config);
        let task = TaskSnapshot::new(TaskId(5), "Copying");

        let _ = rig.tx.try_send(MessageRequest::task(task.clone()));
        rig.run(Duration::from_millis(400));
        let _ = rig.tx.try_send(MessageRequest::task(task.finished()));
        rig.run(Duration::from_millis(1000));

        assert_eq!(rig.queue.onscreen_len(), 0);
        assert_eq!(rig.queue.tasks_count(), 0);
        // Terminal bindings stay until a lookup misses on the generation check.
        assert_eq!(rig.queue.bindings.len(), 1);
    }

    #[test]
    fn test_teardown_resets_everything() {
        let mut rig = Rig::new(&WidgetsConfig::default());
        for i in 0..6 {
            let _ = rig.tx.try_send(MessageRequest::message(format!("m{i}"), Duration::from_secs(5)));
        }
        let _ = rig.tx.try_send(MessageRequest::task(TaskSnapshot::new(TaskId(1), "t")));
        rig.run(Duration::from_millis(100));

        let freed = rig.queue.teardown();
        assert_eq!(freed, 7);
        assert_eq!(rig.queue.onscreen_len(), 0);
        assert_eq!(rig.queue.pending_len(), 0);
        assert!(!rig.queue.is_moving());
        assert!(rig.queue.tweens.is_empty());
        assert!(rig.queue.timers.is_empty());
        assert_eq!(rig.texts(), Vec::<String>::new());
    }

    #[test]
    fn test_long_text_wraps_to_two_lines() {
        let mut rig = Rig::new(&WidgetsConfig::default());
        let long = "word ".repeat(200);
        let _ = rig.tx.try_send(MessageRequest::message(long.trim(), Duration::from_secs(1)));
        rig.step(FRAME);

        let (_, n) = rig.queue.onscreen().next().unwrap();
        assert_eq!(n.text().lines().count(), 2);
        let base = rig.layout.text_scale * rig.layout.font_size;
        assert!((n.text_height() - base * 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_short_text_keeps_its_width() {
        let mut rig = Rig::new(&WidgetsConfig::default());
        let _ = rig.tx.try_send(MessageRequest::message("hello", Duration::from_secs(1)));
        rig.step(FRAME);

        let (_, n) = rig.queue.onscreen().next().unwrap();
        let expected = rig.layout.msg_text_width(&rig.metrics, "hello") + rig.layout.padding / 2.0;
        assert!((n.width() - expected).abs() < 1e-3);
        let base = rig.layout.text_scale * rig.layout.font_size;
        assert!((n.text_height() - base * 1.35).abs() < 1e-3);
    }
}
