//! # HERALD Widgets
//!
//! On-screen notification layer for a frame-driven host:
//! - Bounded pending FIFO feeding a short on-screen list
//! - Live task rows that update in place and crossfade their titles
//! - A ring of achievement popups shown one after another
//! - Bottom banner, fps box and run-state indicators
//! - Full-screen splash while content loads
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐ push  ┌──────────────────┐        ┌──────────────────┐
//! │ producers  │──────>│  BoundedIntake   │──────> │ NotificationQueue│
//! │ (any thread)│      │  (capacity N)    │ drain  │ pending + onscreen│
//! └────────────┘       └──────────────────┘        └────────┬─────────┘
//!       │ push_achievement ┌──────────────────┐             │ advance
//!       └─────────────────>│ achievement ring │──┐          v
//!                          └──────────────────┘  │   ┌──────────────┐
//!                                                └──>│   Widgets    │──> DrawList
//!                                                    └──────────────┘
//! ```
//!
//! ## Threading
//!
//! Producers hold a [`WidgetsHandle`] and never block. Everything else runs
//! on the render thread, which calls [`Widgets::advance`] and
//! [`Widgets::frame`] once per frame.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod achievement;
pub mod assets;
pub mod config;
mod draw;
pub mod error;
pub mod handle;
pub mod layout;
pub mod load;
pub mod message;
pub mod notification;
pub mod queue;
pub mod render;
pub mod status;
pub mod style;
pub mod task;
pub mod text;
pub mod widgets;

pub use achievement::{AchievementPopup, AchievementPresenter, AchievementSender, PopupView};
pub use assets::{BadgeResolver, IconSet, NoBadges, TextureId, WidgetIcon};
pub use config::WidgetsConfig;
pub use error::{WidgetsError, WidgetsResult};
pub use handle::{PushOutcome, WidgetsHandle};
pub use layout::{Rect, ScreenInfo, WidgetLayout};
pub use load::{LoadContentAnimation, LoadContentView};
pub use message::MessageBanner;
pub use notification::{MessageCategory, MessageIcon, MessageRequest, Notification, TaskMirror};
pub use queue::{NotificationQueue, QueueStats};
pub use render::{DrawList, RenderCommand, TextAlign};
pub use status::{FpsText, StatusIndicators};
pub use style::{palette, Color};
pub use task::{TaskBindings, TaskId, TaskSnapshot};
pub use text::{word_wrap, FontMetrics, MonospaceMetrics};
pub use widgets::Widgets;
