//! Owner-tagged tween engine.
//!
//! A tween drives one `(owner, field)` subject from a start value to a target
//! over a duration. The engine does not own the animated values: each
//! [`TweenEngine::tick`] writes them through a [`TweenTarget`], which lets the
//! consumer keep its data wherever it likes (arena slots, plain fields).
//!
//! Pushing a tween onto a subject that is already animating replaces the
//! running tween; the replaced tween's completion token is dropped.

use std::time::Duration;

use super::Easing;

/// Storage the engine writes animated values into.
pub trait TweenTarget<O, F> {
    /// Writes `value` into the subject.
    ///
    /// Returns false if the owner no longer exists; the tween is then
    /// discarded without completing.
    fn write(&mut self, owner: O, field: F, value: f32) -> bool;
}

/// A single running interpolation.
#[derive(Debug, Clone)]
pub struct Tween<O, F, C> {
    owner: O,
    field: F,
    start: f32,
    target: f32,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
    on_complete: Option<C>,
}

impl<O, F, C> Tween<O, F, C> {
    /// Creates a tween of `field` on `owner` from `start` to `target`.
    #[must_use]
    pub fn new(owner: O, field: F, start: f32, target: f32, duration: Duration) -> Self {
        Self {
            owner,
            field,
            start,
            target,
            elapsed: Duration::ZERO,
            duration,
            easing: Easing::default(),
            on_complete: None,
        }
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the token handed back when the tween reaches its target.
    #[must_use]
    pub fn on_complete(mut self, token: C) -> Self {
        self.on_complete = Some(token);
        self
    }

    /// Target value.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }
}

/// Runs tweens and hands back completion tokens.
#[derive(Debug)]
pub struct TweenEngine<O, F, C> {
    tweens: Vec<Tween<O, F, C>>,
}

impl<O, F, C> TweenEngine<O, F, C>
where
    O: Copy + PartialEq,
    F: Copy + PartialEq,
{
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tweens: Vec::with_capacity(64),
        }
    }

    /// Starts a tween, replacing any tween already driving the same subject.
    pub fn push(&mut self, tween: Tween<O, F, C>) {
        self.kill(tween.owner, tween.field);
        self.tweens.push(tween);
    }

    /// Cancels the tween driving `(owner, field)`.
    pub fn kill(&mut self, owner: O, field: F) -> bool {
        let before = self.tweens.len();
        self.tweens
            .retain(|t| !(t.owner == owner && t.field == field));
        before != self.tweens.len()
    }

    /// Cancels every tween belonging to `owner`. Returns how many were removed.
    pub fn kill_by_owner(&mut self, owner: O) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.owner != owner);
        before - self.tweens.len()
    }

    /// Cancels everything.
    pub fn kill_all(&mut self) {
        self.tweens.clear();
    }

    /// Returns true if `(owner, field)` is currently animating.
    #[must_use]
    pub fn is_animating(&self, owner: O, field: F) -> bool {
        self.tweens
            .iter()
            .any(|t| t.owner == owner && t.field == field)
    }

    /// Returns true if any tween of `owner` is running.
    #[must_use]
    pub fn owner_is_animating(&self, owner: O) -> bool {
        self.tweens.iter().any(|t| t.owner == owner)
    }

    /// Number of running tweens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Returns true if nothing is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advances every tween by `delta`, writing values into `target`.
    ///
    /// Returns completion tokens of the tweens that finished, in push order.
    /// Tweens pushed while dispatching those tokens start on the next tick.
    pub fn tick<T>(&mut self, delta: Duration, target: &mut T) -> Vec<C>
    where
        T: TweenTarget<O, F>,
    {
        let mut completed = Vec::new();
        let mut i = 0;
        while i < self.tweens.len() {
            let tween = &mut self.tweens[i];
            tween.elapsed += delta;

            let progress = tween.progress();
            let value = if progress >= 1.0 {
                tween.target
            } else {
                tween.start + (tween.target - tween.start) * tween.easing.apply(progress)
            };

            if !target.write(tween.owner, tween.field, value) {
                self.tweens.remove(i);
                continue;
            }

            if progress >= 1.0 {
                if let Some(token) = self.tweens.remove(i).on_complete {
                    completed.push(token);
                }
            } else {
                i += 1;
            }
        }
        completed
    }
}

impl<O, F, C> Default for TweenEngine<O, F, C>
where
    O: Copy + PartialEq,
    F: Copy + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}
