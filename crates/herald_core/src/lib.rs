//! # HERALD Core
//!
//! Frame-driven scheduling primitives for the notification widgets:
//! - Generational slot arena for owned objects with stale-safe handles
//! - One-shot timers with caller-owned handles
//! - A tween engine whose animations are grouped by owner
//! - A bounded, non-blocking intake channel for producer threads
//!
//! ## Architecture Rules
//!
//! 1. **Nothing is advanced by the OS** - the caller pumps timers and tweens
//!    once per frame with the frame delta.
//! 2. **Completions are data** - timers and tweens hand back completion tokens
//!    instead of calling function pointers, so the consumer dispatches them
//!    with full `&mut` access to its own state.
//! 3. **Producers never block** - a full intake channel drops the request.
//!
//! ## Frame Pump
//!
//! ```text
//! ┌──────────────┐   delta   ┌──────────────┐  tokens  ┌──────────────┐
//! │  FrameClock  │──────────>│ TimerService │─────────>│   consumer   │
//! │              │           │ TweenEngine  │─────────>│   dispatch   │
//! └──────────────┘           └──────────────┘          └──────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod frame;
pub mod slots;
pub mod sync;
pub mod timer;

pub use animation::{Easing, Tween, TweenEngine, TweenTarget};
pub use frame::{FrameClock, FrameDelta};
pub use slots::{SlotArena, SlotId};
pub use sync::{BoundedIntake, IntakeReceiver, IntakeSender, SendOutcome};
pub use timer::{TimerHandle, TimerService};
