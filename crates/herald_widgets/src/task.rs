//! Background task snapshots and the task → notification binding table.
//!
//! Tasks never hold a pointer to their notification. The queue keeps a
//! `TaskId → SlotId` table instead; once a notification is freed its slot
//! generation moves on, so a binding left behind by a finished task simply
//! misses on the next lookup.

use std::collections::HashMap;

use herald_core::SlotId;

/// Identity of a background task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Point-in-time view of a task, pushed by the task's thread.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskSnapshot {
    /// Task identity.
    pub id: TaskId,
    /// Host-side numeric ident, carried through untouched.
    pub ident: u32,
    /// Current title.
    pub title: String,
    /// Bumped by the task whenever it sets a new title.
    pub title_generation: u32,
    /// Progress 0-100, `None` when unknown.
    pub progress: Option<u8>,
    /// Task has finished.
    pub finished: bool,
    /// Task has finished with an error.
    pub error: bool,
    /// Task was cancelled.
    pub cancelled: bool,
    /// Swap titles instantly instead of crossfading.
    pub alternative_look: bool,
    /// Task whose notification this one takes over.
    pub predecessor: Option<TaskId>,
}

impl TaskSnapshot {
    /// Running task with unknown progress.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            ident: 0,
            title: title.into(),
            title_generation: 0,
            progress: None,
            finished: false,
            error: false,
            cancelled: false,
            alternative_look: false,
            predecessor: None,
        }
    }

    /// Sets progress; anything outside 0-100 reads as unknown.
    #[must_use]
    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = u8::try_from(progress).ok().filter(|p| *p <= 100);
        self
    }

    /// Replaces the title and bumps the generation.
    #[must_use]
    pub fn retitled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self.title_generation = self.title_generation.wrapping_add(1);
        self
    }

    /// Marks the task finished.
    #[must_use]
    pub fn finished(mut self) -> Self {
        self.finished = true;
        self
    }

    /// Marks the task finished with an error.
    #[must_use]
    pub fn failed(mut self) -> Self {
        self.finished = true;
        self.error = true;
        self
    }

    /// Marks the task cancelled.
    #[must_use]
    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Uses the instant title swap.
    #[must_use]
    pub fn with_alternative_look(mut self, on: bool) -> Self {
        self.alternative_look = on;
        self
    }

    /// Takes over the notification of `predecessor`.
    #[must_use]
    pub fn succeeding(mut self, predecessor: TaskId) -> Self {
        self.predecessor = Some(predecessor);
        self
    }

    /// Task is done one way or another.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.finished || self.error || self.cancelled
    }
}

/// `TaskId → SlotId` relation table.
#[derive(Debug, Default)]
pub struct TaskBindings {
    map: HashMap<TaskId, SlotId>,
}

impl TaskBindings {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `task` to `slot`, replacing any previous binding.
    pub fn bind(&mut self, task: TaskId, slot: SlotId) {
        self.map.insert(task, slot);
    }

    /// Slot bound to `task`, live or not.
    #[must_use]
    pub fn get(&self, task: TaskId) -> Option<SlotId> {
        self.map.get(&task).copied()
    }

    /// Removes the binding of `task` if it still points at `slot`.
    pub fn unbind(&mut self, task: TaskId, slot: SlotId) -> bool {
        if self.map.get(&task) == Some(&slot) {
            self.map.remove(&task);
            true
        } else {
            false
        }
    }

    /// Moves the binding of `from` to `to`.
    pub fn hand_off(&mut self, from: TaskId, to: TaskId) -> Option<SlotId> {
        let slot = self.map.remove(&from)?;
        self.map.insert(to, slot);
        Some(slot)
    }

    /// Drops the binding of `task` unconditionally.
    pub fn forget(&mut self, task: TaskId) {
        self.map.remove(&task);
    }

    /// Number of bindings, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drops every binding.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
