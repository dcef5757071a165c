//! Notification records and push requests.

use std::borrow::Cow;
use std::time::Duration;

use herald_core::{SlotId, TimerHandle};

use crate::task::{TaskId, TaskSnapshot};

/// Icon hint attached to a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageIcon {
    /// Category-dependent default.
    #[default]
    Default,
    /// Info glyph.
    Info,
    /// No icon.
    None,
}

/// Severity of a message. Tints the icon disc.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageCategory {
    /// Plain information.
    #[default]
    Info,
    /// Something went wrong.
    Error,
    /// Something may go wrong.
    Warning,
    /// Something went right.
    Success,
}

/// A message or task update on its way to the render thread.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageRequest {
    /// Owning task, `None` for a free-standing message.
    pub task: Option<TaskSnapshot>,
    /// Message text (free-standing only; tasks show their title).
    pub text: String,
    /// Display time after the slide-in.
    pub duration: Duration,
    /// Optional title, kept for hosts that display it elsewhere.
    pub title: Option<String>,
    /// Icon hint.
    pub icon: MessageIcon,
    /// Severity.
    pub category: MessageCategory,
    /// Priority hint, kept for the host.
    pub priority: u32,
    /// Flush hint, kept for the host.
    pub flush: bool,
    /// Menu was open when the message was raised (narrower column).
    pub menu_alive: bool,
}

impl MessageRequest {
    /// Free-standing message shown for `duration`.
    #[must_use]
    pub fn message(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            task: None,
            text: text.into(),
            duration,
            title: None,
            icon: MessageIcon::Default,
            category: MessageCategory::Info,
            priority: 0,
            flush: false,
            menu_alive: false,
        }
    }

    /// Create-or-update request for a task notification.
    #[must_use]
    pub fn task(snapshot: TaskSnapshot) -> Self {
        let text = snapshot.title.clone();
        Self {
            task: Some(snapshot),
            ..Self::message(text, Duration::ZERO)
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_category(mut self, category: MessageCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the icon hint.
    #[must_use]
    pub fn with_icon(mut self, icon: MessageIcon) -> Self {
        self.icon = icon;
        self
    }

    /// Marks the message as raised while the menu is open.
    #[must_use]
    pub fn with_menu_alive(mut self, menu_alive: bool) -> Self {
        self.menu_alive = menu_alive;
        self
    }
}

/// Animated properties of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsgField {
    /// Distance of the row from the bottom edge.
    OffsetY,
    /// Opacity.
    Alpha,
    /// 0 folded, 1 unfolded.
    Unfold,
    /// Vertical offset of the outgoing and incoming titles.
    TextTransition,
    /// Hourglass angle in radians.
    Hourglass,
}

/// Timer and tween completions of the notification queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueEvent {
    /// Display time ran out.
    Expired(SlotId),
    /// Time for the next hourglass spin.
    HourglassTick(SlotId),
    /// One hourglass spin finished.
    HourglassEnd(SlotId),
    /// Title crossfade finished.
    TextTransitionEnd(SlotId),
    /// The move pass settled; unfold the candidate if any.
    MoveEnd {
        /// Folded entry to unfold next.
        unfold: Option<SlotId>,
    },
    /// Unfold finished.
    UnfoldEnd(SlotId),
    /// Fade-out finished; free the slot.
    KillEnd(SlotId),
}

/// Task state mirrored into a task-bound notification.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskMirror {
    /// Task currently driving the notification.
    pub id: TaskId,
    /// Host ident.
    pub ident: u32,
    /// Title generation last seen.
    pub title_generation: u32,
    /// Progress 0-100 or unknown.
    pub progress: Option<u8>,
    /// Finished flag.
    pub finished: bool,
    /// Error flag.
    pub error: bool,
    /// Cancelled flag.
    pub cancelled: bool,
    /// Number of titles this notification has shown.
    pub reuse_count: u32,
}

/// Progress past 100 reads as unknown, same as [`TaskSnapshot::with_progress`].
fn valid_progress(task: &TaskSnapshot) -> Option<u8> {
    task.progress.filter(|p| *p <= 100)
}

impl TaskMirror {
    fn from_snapshot(task: &TaskSnapshot) -> Self {
        Self {
            id: task.id,
            ident: task.ident,
            title_generation: task.title_generation,
            progress: valid_progress(task),
            finished: task.finished,
            error: task.error,
            cancelled: task.cancelled,
            reuse_count: 1,
        }
    }

    pub(crate) fn refresh(&mut self, task: &TaskSnapshot) {
        self.ident = task.ident;
        self.progress = valid_progress(task);
        self.finished = task.finished;
        self.error = task.error;
        self.cancelled = task.cancelled;
    }

    /// Task is done one way or another.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.finished || self.error || self.cancelled
    }

    /// Right-hand status text, `None` when nothing is shown.
    #[must_use]
    pub fn status_text(&self) -> Option<Cow<'static, str>> {
        if self.finished {
            if self.error {
                Some(Cow::Borrowed("Task failed"))
            } else {
                Some(Cow::Borrowed(" "))
            }
        } else {
            self.progress.map(|p| Cow::Owned(format!("{p}%")))
        }
    }

    /// Width of the progress bar for a row `row_width` wide.
    #[must_use]
    pub fn bar_width(&self, row_width: f32) -> f32 {
        match self.progress {
            Some(p) if !self.finished => row_width * f32::from(p.min(100)) / 100.0,
            _ => 0.0,
        }
    }
}

/// One on-screen or pending notification.
#[derive(Debug)]
pub struct Notification {
    pub(crate) task: Option<TaskMirror>,
    pub(crate) text: String,
    pub(crate) incoming: Option<String>,
    pub(crate) width: f32,
    pub(crate) text_height: f32,
    pub(crate) duration: Duration,
    pub(crate) category: MessageCategory,
    pub(crate) icon: MessageIcon,
    pub(crate) priority: u32,

    pub(crate) expiration_timer: TimerHandle,
    pub(crate) expiration_started: bool,
    pub(crate) expired: bool,
    pub(crate) dying: bool,

    pub(crate) offset_y: f32,
    pub(crate) alpha: f32,
    pub(crate) unfold: f32,
    pub(crate) unfolded: bool,
    pub(crate) unfolding: bool,
    pub(crate) text_transition: f32,
    pub(crate) hourglass_rotation: f32,
    pub(crate) hourglass_timer: TimerHandle,
}

impl Notification {
    fn blank(text: String, width: f32, text_height: f32, folded: bool) -> Self {
        Self {
            task: None,
            text,
            incoming: None,
            width,
            text_height,
            duration: Duration::ZERO,
            category: MessageCategory::Info,
            icon: MessageIcon::Default,
            priority: 0,
            expiration_timer: TimerHandle::new(),
            expiration_started: false,
            expired: false,
            dying: false,
            offset_y: 0.0,
            alpha: 1.0,
            unfold: if folded { 0.0 } else { 1.0 },
            unfolded: !folded,
            unfolding: false,
            text_transition: 0.0,
            hourglass_rotation: 0.0,
            hourglass_timer: TimerHandle::new(),
        }
    }

    /// New free-standing message, already wrapped and measured.
    pub(crate) fn message(
        request: &MessageRequest,
        text: String,
        width: f32,
        text_height: f32,
        folded: bool,
    ) -> Self {
        Self {
            duration: request.duration,
            category: request.category,
            icon: request.icon,
            priority: request.priority,
            ..Self::blank(text, width, text_height, folded)
        }
    }

    /// New task notification. Tasks are never folded.
    pub(crate) fn for_task(snapshot: &TaskSnapshot, width: f32, text_height: f32) -> Self {
        Self {
            task: Some(TaskMirror::from_snapshot(snapshot)),
            ..Self::blank(snapshot.title.clone(), width, text_height, false)
        }
    }

    /// Title the notification is showing or moving to.
    #[must_use]
    pub fn latest_text(&self) -> &str {
        self.incoming.as_deref().unwrap_or(&self.text)
    }

    /// Finishes a title crossfade.
    pub(crate) fn settle_text(&mut self) {
        if let Some(text) = self.incoming.take() {
            self.text = text;
        }
        self.text_transition = 0.0;
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Title sliding in during a crossfade.
    #[must_use]
    pub fn incoming_text(&self) -> Option<&str> {
        self.incoming.as_deref()
    }

    /// Task mirror, `None` for free-standing messages.
    #[must_use]
    pub fn task(&self) -> Option<&TaskMirror> {
        self.task.as_ref()
    }

    /// True for task-bound notifications.
    #[must_use]
    pub fn is_task(&self) -> bool {
        self.task.is_some()
    }

    /// Content width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Text block height in pixels.
    #[must_use]
    pub fn text_height(&self) -> f32 {
        self.text_height
    }

    /// Requested display time.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Severity.
    #[must_use]
    pub fn category(&self) -> MessageCategory {
        self.category
    }

    /// Icon hint.
    #[must_use]
    pub fn icon(&self) -> MessageIcon {
        self.icon
    }

    /// Priority hint.
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Distance from the bottom edge.
    #[must_use]
    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Opacity.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Unfold progress.
    #[must_use]
    pub fn unfold(&self) -> f32 {
        self.unfold
    }

    /// Fully unfolded.
    #[must_use]
    pub fn is_unfolded(&self) -> bool {
        self.unfolded
    }

    /// Unfold animation running.
    #[must_use]
    pub fn is_unfolding(&self) -> bool {
        self.unfolding
    }

    /// Title crossfade offset.
    #[must_use]
    pub fn text_transition(&self) -> f32 {
        self.text_transition
    }

    /// Hourglass angle.
    #[must_use]
    pub fn hourglass_rotation(&self) -> f32 {
        self.hourglass_rotation
    }

    /// Being removed.
    #[must_use]
    pub fn is_dying(&self) -> bool {
        self.dying
    }

    /// Display time ran out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Expiration timer armed at least once since the last task update.
    #[must_use]
    pub fn expiration_started(&self) -> bool {
        self.expiration_started
    }

    pub(crate) fn write(&mut self, field: MsgField, value: f32) {
        match field {
            MsgField::OffsetY => self.offset_y = value,
            MsgField::Alpha => self.alpha = value,
            MsgField::Unfold => self.unfold = value,
            MsgField::TextTransition => self.text_transition = value,
            MsgField::Hourglass => self.hourglass_rotation = value,
        }
    }
}
