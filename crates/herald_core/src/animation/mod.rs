//! Animation system.
//!
//! Tweens are grouped by owner so everything belonging to one logical entity
//! (position, alpha, spinner, text slide) can be cancelled in a single call
//! before the entity is freed.

mod easing;
mod engine;

pub use easing::Easing;
pub use engine::{Tween, TweenEngine, TweenTarget};
