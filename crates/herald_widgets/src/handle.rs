//! Producer handle.
//!
//! Any thread may hold a [`WidgetsHandle`]. Pushing never blocks: the request
//! either gets a unit of capacity or is dropped on the spot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use herald_core::sync::{IntakeSender, SendOutcome};

use crate::achievement::AchievementSender;
use crate::notification::{MessageCategory, MessageIcon, MessageRequest};
use crate::task::TaskSnapshot;

/// Result of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Accepted; the render thread will pick it up on its next frame.
    Queued,
    /// No capacity left; nothing was queued.
    Dropped,
    /// The widgets are deinitialized; nothing was queued.
    Inactive,
}

impl PushOutcome {
    /// Returns true if the request was accepted.
    #[must_use]
    pub const fn is_queued(self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// Cloneable, thread-safe entry point for producers.
#[derive(Clone)]
pub struct WidgetsHandle {
    active: Arc<AtomicBool>,
    intake: IntakeSender<MessageRequest>,
    achievements: AchievementSender,
}

impl WidgetsHandle {
    pub(crate) fn new(
        active: Arc<AtomicBool>,
        intake: IntakeSender<MessageRequest>,
        achievements: AchievementSender,
    ) -> Self {
        Self {
            active,
            intake,
            achievements,
        }
    }

    /// True while the widgets accept pushes.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Pushes a message, or a create-or-update for `task` when one is given.
    ///
    /// `title`, `priority` and `flush` travel with the request for the host
    /// but do not change how the notification behaves.
    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &self,
        task: Option<TaskSnapshot>,
        text: &str,
        duration: Duration,
        title: Option<&str>,
        icon: MessageIcon,
        category: MessageCategory,
        priority: u32,
        flush: bool,
        menu_alive: bool,
    ) -> PushOutcome {
        let mut request = match task {
            Some(task) => MessageRequest::task(task),
            None => MessageRequest::message(text, duration),
        };
        request.duration = duration;
        request.title = title.map(str::to_owned);
        request.icon = icon;
        request.category = category;
        request.priority = priority;
        request.flush = flush;
        request.menu_alive = menu_alive;
        self.push_request(request)
    }

    /// Pushes a prepared request.
    pub fn push_request(&self, request: MessageRequest) -> PushOutcome {
        if !self.is_active() {
            return PushOutcome::Inactive;
        }

        match self.intake.try_send(request) {
            SendOutcome::Sent => PushOutcome::Queued,
            SendOutcome::Full => {
                tracing::debug!("notification intake full, dropping request");
                PushOutcome::Dropped
            }
            SendOutcome::Disconnected => {
                tracing::debug!("notification queue gone, dropping request");
                PushOutcome::Dropped
            }
        }
    }

    /// Pushes a free-standing message.
    pub fn push_message(&self, text: &str, duration: Duration) -> PushOutcome {
        self.push_request(MessageRequest::message(text, duration))
    }

    /// Pushes a task snapshot (creates the row or updates it).
    pub fn push_task(&self, task: TaskSnapshot) -> PushOutcome {
        self.push_request(MessageRequest::task(task))
    }

    /// Queues an achievement popup.
    pub fn push_achievement(&self, title: &str, badge_key: Option<&str>) -> PushOutcome {
        if !self.is_active() {
            return PushOutcome::Inactive;
        }
        self.achievements.push(title, badge_key)
    }
}
