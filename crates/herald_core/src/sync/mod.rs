//! # Producer → Consumer Intake
//!
//! ```text
//! Worker threads (tasks, unlocks)      Render thread
//!   try_send ──┐                        ┌── try_recv ── pending list ── release
//!              └──> [ bounded channel ] ┘
//! ```
//!
//! Producers never wait: when the capacity is used up, the request is dropped
//! and the producer is told so. Capacity is only handed back once the
//! consumer is finished with an item, not when it leaves the channel.

mod intake;

pub use intake::{BoundedIntake, IntakeReceiver, IntakeSender, SendOutcome};
