//! The widget layer as one object.
//!
//! [`Widgets`] lives on the render thread. It owns the notification queue,
//! the achievement presenter, the banner, the status corner and the
//! load-content splash, and turns
//! them into draw commands once per frame. Producers talk to it through
//! [`WidgetsHandle`]s.
//!
//! ```text
//! init ──> [active] ──deinit──> [inactive] ──reinit──> [active]
//!              │                     │
//!           advance              (persistent: queue kept,
//!           frame                 otherwise torn down)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use herald_core::sync::BoundedIntake;

use crate::achievement::AchievementPresenter;
use crate::assets::{BadgeResolver, IconSet, TextureId};
use crate::config::WidgetsConfig;
use crate::draw::{
    draw_achievement, draw_banner, draw_fps, draw_indicator, draw_load_content, draw_notification,
    DrawContext,
};
use crate::error::WidgetsResult;
use crate::handle::{PushOutcome, WidgetsHandle};
use crate::layout::{ScreenInfo, WidgetLayout};
use crate::load::LoadContentAnimation;
use crate::message::MessageBanner;
use crate::notification::MessageRequest;
use crate::queue::NotificationQueue;
use crate::render::{DrawList, RenderCommand};
use crate::status::{FpsText, StatusIndicators};
use crate::text::FontMetrics;

/// Render-thread context of the widget layer.
pub struct Widgets {
    config: WidgetsConfig,
    active: Arc<AtomicBool>,
    persistent: bool,

    metrics: Arc<dyn FontMetrics>,
    icons: IconSet,
    layout: WidgetLayout,

    queue: NotificationQueue,
    achievements: AchievementPresenter,
    banner: MessageBanner,
    status: StatusIndicators,
    fps: FpsText,
    load: LoadContentAnimation,

    draw: DrawList,
    handle: WidgetsHandle,
}

impl Widgets {
    /// Brings the widget layer up.
    ///
    /// # Errors
    ///
    /// Fails on an invalid `config` or an empty `screen`; the caller must not
    /// use the widgets then.
    pub fn init(
        config: WidgetsConfig,
        metrics: Arc<dyn FontMetrics>,
        badges: Arc<dyn BadgeResolver>,
        icons: IconSet,
        screen: ScreenInfo,
    ) -> WidgetsResult<Self> {
        config.validate()?;
        screen.validate()?;

        let layout = WidgetLayout::compute(screen, &config, metrics.as_ref(), &icons);

        let intake = BoundedIntake::<MessageRequest>::new(config.pending_capacity);
        let mut queue = NotificationQueue::new(&config, intake.receiver());
        queue.set_has_icons(layout.has_icons);

        let achievements = AchievementPresenter::new(&config);
        let active = Arc::new(AtomicBool::new(true));
        let handle = WidgetsHandle::new(
            Arc::clone(&active),
            intake.sender(),
            achievements.sender(badges),
        );

        tracing::info!(
            width = screen.width,
            height = screen.height,
            scale = screen.scale_factor,
            icons = layout.has_icons,
            pending = config.pending_capacity,
            onscreen = config.onscreen_max,
            "widgets initialized"
        );

        Ok(Self {
            banner: MessageBanner::new(config.backdrop_alpha, config.animation_duration()),
            load: LoadContentAnimation::new(config.load_content_step()),
            config,
            active,
            persistent: false,
            metrics,
            icons,
            layout,
            queue,
            achievements,
            status: StatusIndicators::default(),
            fps: FpsText::default(),
            draw: DrawList::new(),
            handle,
        })
    }

    /// Takes the layer down. Pushes are refused from now on; unless the
    /// widgets are persistent every notification and popup is freed.
    pub fn deinit(&mut self) {
        self.active.store(false, Ordering::Release);

        if self.persistent {
            tracing::info!("widgets deinitialized, state kept");
            return;
        }

        let freed = self.queue.teardown();
        self.achievements.teardown();
        self.banner.clear();
        self.load.cleanup();
        tracing::info!(freed, "widgets deinitialized");
    }

    /// Brings a deinitialized layer back with fresh textures and screen.
    ///
    /// # Errors
    ///
    /// Fails on an empty `screen`; the layer stays inactive.
    pub fn reinit(&mut self, icons: IconSet, screen: ScreenInfo) -> WidgetsResult<()> {
        screen.validate()?;

        self.icons = icons;
        self.relayout(screen);
        self.active.store(true, Ordering::Release);
        tracing::info!(icons = self.layout.has_icons, "widgets reinitialized");
        Ok(())
    }

    /// Keeps the queue alive across [`deinit`](Self::deinit).
    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    /// True between init and deinit.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// New producer handle.
    #[must_use]
    pub fn handle(&self) -> WidgetsHandle {
        self.handle.clone()
    }

    /// Recomputes the layout if `screen` changed. Returns true if it did.
    pub fn set_screen(&mut self, screen: ScreenInfo) -> bool {
        if !self.layout.is_stale_for(screen) || screen.validate().is_err() {
            return false;
        }
        self.relayout(screen);
        true
    }

    fn relayout(&mut self, screen: ScreenInfo) {
        self.layout = WidgetLayout::compute(screen, &self.config, self.metrics.as_ref(), &self.icons);
        self.queue.set_has_icons(self.layout.has_icons);
        tracing::debug!(
            width = screen.width,
            height = screen.height,
            scale = screen.scale_factor,
            "widgets relayout"
        );
    }

    /// Advances every timer and animation by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        if !self.is_active() {
            return;
        }
        let metrics = self.metrics.as_ref();
        self.queue.advance(delta, &self.layout, metrics);
        self.achievements.advance(delta, &self.layout, metrics);
        self.banner.advance(delta);
        self.load.advance(delta);
    }

    /// Builds this frame's draw commands.
    pub fn frame(&mut self) -> &[RenderCommand] {
        self.draw.begin_frame();
        if !self.is_active() {
            return self.draw.commands();
        }

        let ctx = DrawContext {
            layout: &self.layout,
            metrics: self.metrics.as_ref(),
            icons: &self.icons,
            backdrop_alpha: self.config.backdrop_alpha,
        };

        draw_banner(&mut self.draw, &ctx, &self.banner);

        if let Some(view) = self.achievements.view() {
            draw_achievement(&mut self.draw, &ctx, &view, self.achievements.heading());
        }

        for (_, notification) in self.queue.onscreen() {
            draw_notification(&mut self.draw, &ctx, notification);
        }

        let mut right = self.layout.screen_width;
        let indicator_y = if self.fps.is_visible() {
            draw_fps(&mut self.draw, &ctx, self.fps.display(), right);
            self.layout.simple_height
        } else {
            0.0
        };
        for (icon, label) in self.status.active() {
            right -= draw_indicator(&mut self.draw, &ctx, icon, label, indicator_y, right);
        }

        if let Some(view) = self.load.view() {
            draw_load_content(&mut self.draw, &ctx, &view);
        }

        self.draw.commands()
    }

    // =========================================================================
    // Render-thread setters
    // =========================================================================

    /// Shows the bottom-left banner.
    pub fn set_message(&mut self, text: &str, duration: Duration) {
        if !self.is_active() {
            return;
        }
        self.banner.set(text, duration, &self.layout, self.metrics.as_ref());
    }

    /// Replaces the fps text. Returns true if it changed; always false
    /// while inactive.
    pub fn set_fps_text(&mut self, text: &str) -> bool {
        self.is_active() && self.fps.set(text)
    }

    /// Shows or hides the fps box.
    pub fn show_fps(&mut self, visible: bool) {
        self.fps.set_visible(visible);
    }

    /// Sets the run-state indicators.
    pub fn set_indicators(&mut self, status: StatusIndicators) {
        self.status = status;
    }

    /// Plays the load-content splash over everything else.
    ///
    /// Returns false while inactive or without an `icon`.
    pub fn start_load_content(
        &mut self,
        content_name: &str,
        remove_extension: bool,
        icon: Option<TextureId>,
    ) -> bool {
        if !self.is_active() {
            return false;
        }
        self.load
            .start(content_name, remove_extension, icon, self.layout.scale_factor)
    }

    /// Stops the load-content splash.
    pub fn cleanup_load_content(&mut self) {
        self.load.cleanup();
    }

    /// Same as [`WidgetsHandle::push_request`].
    pub fn push(&self, request: MessageRequest) -> PushOutcome {
        self.handle.push_request(request)
    }

    /// Same as [`WidgetsHandle::push_achievement`].
    pub fn push_achievement(&self, title: &str, badge_key: Option<&str>) -> PushOutcome {
        self.handle.push_achievement(title, badge_key)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Notifications on screen.
    #[must_use]
    pub fn onscreen_len(&self) -> usize {
        self.queue.onscreen_len()
    }

    /// Notifications waiting to be shown.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queue.pending_len()
    }

    /// True while the queue is moving, unfolding or removing a row.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.queue.is_moving()
    }

    /// The notification queue.
    #[must_use]
    pub fn queue(&self) -> &NotificationQueue {
        &self.queue
    }

    /// The achievement presenter.
    #[must_use]
    pub fn achievements(&self) -> &AchievementPresenter {
        &self.achievements
    }

    /// The banner.
    #[must_use]
    pub fn banner(&self) -> &MessageBanner {
        &self.banner
    }

    /// The load-content splash.
    #[must_use]
    pub fn load_content(&self) -> &LoadContentAnimation {
        &self.load
    }

    /// Current metrics.
    #[must_use]
    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WidgetsConfig {
        &self.config
    }
}

impl Drop for Widgets {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}
