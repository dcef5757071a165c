//! # Achievement Popups
//!
//! A fixed ring of K popups shared between producer threads and the render
//! thread. Producers only write into the ring; the render thread plays the
//! popup at the read cursor through its animation chain:
//!
//! ```text
//! slide in ──> unfold + hold timer ──> fold ──> slide out ──> free, advance, next
//! ```
//!
//! Every index and slot mutation happens under the ring lock.

use std::sync::Arc;
use std::time::Duration;

use herald_core::{TimerHandle, TimerService, Tween, TweenEngine, TweenTarget};
use parking_lot::Mutex;

use crate::assets::{BadgeResolver, TextureId};
use crate::config::WidgetsConfig;
use crate::handle::PushOutcome;
use crate::layout::WidgetLayout;
use crate::text::FontMetrics;

/// One queued popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementPopup {
    /// Achievement title.
    pub title: String,
    /// Resolved badge, `None` draws the default icon.
    pub badge: Option<TextureId>,
}

#[derive(Debug)]
struct Ring {
    slots: Vec<Option<AchievementPopup>>,
    /// `None` until the first push.
    read: Option<usize>,
    write: usize,
    start_requested: bool,
}

impl Ring {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            read: None,
            write: 0,
            start_requested: false,
        }
    }

    fn ensure_init(&mut self, capacity: usize) -> usize {
        match self.read {
            Some(read) => read,
            None => {
                self.slots = vec![None; capacity];
                self.read = Some(0);
                self.write = 0;
                0
            }
        }
    }

    fn current(&self) -> Option<&AchievementPopup> {
        self.read.and_then(|r| self.slots.get(r)).and_then(Option::as_ref)
    }

    fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Producer side of the ring.
#[derive(Clone)]
pub struct AchievementSender {
    ring: Arc<Mutex<Ring>>,
    capacity: usize,
    resolver: Arc<dyn BadgeResolver>,
}

impl AchievementSender {
    /// Queues a popup. Returns [`PushOutcome::Dropped`] when all K slots are taken.
    pub fn push(&self, title: &str, badge_key: Option<&str>) -> PushOutcome {
        let mut ring = self.ring.lock();
        let read = ring.ensure_init(self.capacity);
        let write = ring.write;

        let start = if write == read {
            if ring.slots[write].is_some() {
                tracing::debug!(title, "achievement ring full, dropping popup");
                return PushOutcome::Dropped;
            }
            true
        } else {
            false
        };

        let badge = badge_key.and_then(|key| self.resolver.resolve(key));
        ring.slots[write] = Some(AchievementPopup {
            title: title.to_owned(),
            badge,
        });
        ring.write = (write + 1) % self.capacity;
        if start {
            ring.start_requested = true;
        }

        tracing::debug!(title, queued = ring.occupied(), "achievement queued");
        PushOutcome::Queued
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PopupField {
    Y,
    Unfold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PopupEvent {
    SlideInEnd,
    HoldEnd,
    FoldEnd,
    SlideOutEnd,
}

#[derive(Debug, Default, Clone, Copy)]
struct PopupMotion {
    y: f32,
    unfold: f32,
}

impl TweenTarget<(), PopupField> for PopupMotion {
    fn write(&mut self, _owner: (), field: PopupField, value: f32) -> bool {
        match field {
            PopupField::Y => self.y = value,
            PopupField::Unfold => self.unfold = value,
        }
        true
    }
}

/// What the renderer needs to draw the current popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    /// Popup content.
    pub popup: AchievementPopup,
    /// Top edge; negative while sliding.
    pub y: f32,
    /// 0 folded to the badge, 1 fully open.
    pub unfold: f32,
    /// Width of the text panel.
    pub width: f32,
    /// Popup height (and badge size).
    pub height: f32,
}

/// Render-thread side of the ring: plays the popup at the read cursor.
pub struct AchievementPresenter {
    ring: Arc<Mutex<Ring>>,
    capacity: usize,
    heading: String,
    animation: Duration,
    hold: Duration,

    motion: PopupMotion,
    width: f32,
    height: f32,
    tweens: TweenEngine<(), PopupField, PopupEvent>,
    timers: TimerService<PopupEvent>,
    hold_timer: TimerHandle,
    shown: u64,
}

impl AchievementPresenter {
    /// Creates an uninitialized ring and its presenter.
    #[must_use]
    pub fn new(config: &WidgetsConfig) -> Self {
        Self {
            ring: Arc::new(Mutex::new(Ring::new())),
            capacity: config.achievement_capacity,
            heading: config.achievement_heading.clone(),
            animation: config.animation_duration(),
            hold: config.achievement_hold(),
            motion: PopupMotion::default(),
            width: 0.0,
            height: 0.0,
            tweens: TweenEngine::new(),
            timers: TimerService::new(),
            hold_timer: TimerHandle::new(),
            shown: 0,
        }
    }

    /// Producer handle resolving badges through `resolver`.
    #[must_use]
    pub fn sender(&self, resolver: Arc<dyn BadgeResolver>) -> AchievementSender {
        AchievementSender {
            ring: Arc::clone(&self.ring),
            capacity: self.capacity,
            resolver,
        }
    }

    /// Advances the chain by one frame and picks up popups queued into an
    /// empty ring.
    pub fn advance(&mut self, delta: Duration, layout: &WidgetLayout, metrics: &dyn FontMetrics) {
        for event in self.timers.tick(delta) {
            self.on_event(event, layout, metrics);
        }
        for event in self.tweens.tick(delta, &mut self.motion) {
            self.on_event(event, layout, metrics);
        }

        let ring = Arc::clone(&self.ring);
        let mut guard = ring.lock();
        if std::mem::take(&mut guard.start_requested) {
            if let Some(title) = guard.current().map(|p| p.title.clone()) {
                self.begin(&title, layout, metrics);
            }
        }
    }

    fn on_event(&mut self, event: PopupEvent, layout: &WidgetLayout, metrics: &dyn FontMetrics) {
        match event {
            PopupEvent::SlideInEnd => {
                self.tweens.push(
                    Tween::new((), PopupField::Unfold, self.motion.unfold, 1.0, self.animation),
                );
                self.timers.start(
                    &mut self.hold_timer,
                    self.animation.saturating_add(self.hold),
                    PopupEvent::HoldEnd,
                );
            }
            PopupEvent::HoldEnd => {
                self.tweens.push(
                    Tween::new((), PopupField::Unfold, self.motion.unfold, 0.0, self.animation)
                        .on_complete(PopupEvent::FoldEnd),
                );
            }
            PopupEvent::FoldEnd => {
                self.tweens.push(
                    Tween::new((), PopupField::Y, self.motion.y, -self.height, self.animation)
                        .on_complete(PopupEvent::SlideOutEnd),
                );
            }
            PopupEvent::SlideOutEnd => self.next(layout, metrics),
        }
    }

    /// Frees the current popup, advances the cursor and starts the next one.
    fn next(&mut self, layout: &WidgetLayout, metrics: &dyn FontMetrics) {
        let ring = Arc::clone(&self.ring);
        let mut guard = ring.lock();
        let Some(read) = guard.read else {
            return;
        };

        if guard.slots[read].take().is_some() {
            self.shown += 1;
        }
        let read = (read + 1) % self.capacity;
        guard.read = Some(read);

        if let Some(title) = guard.slots[read].as_ref().map(|p| p.title.clone()) {
            self.begin(&title, layout, metrics);
        }
    }

    fn begin(&mut self, title: &str, layout: &WidgetLayout, metrics: &dyn FontMetrics) {
        self.height = layout.font_size * 4.0;
        self.width = layout
            .text_width(metrics, &self.heading)
            .max(layout.text_width(metrics, title))
            + layout.padding * 2.0;
        self.motion = PopupMotion {
            y: -self.height,
            unfold: 0.0,
        };

        self.tweens.push(
            Tween::new((), PopupField::Y, self.motion.y, 0.0, self.animation)
                .on_complete(PopupEvent::SlideInEnd),
        );
        tracing::debug!(title, "achievement popup shown");
    }

    /// Frees every queued popup and stops the chain.
    pub fn teardown(&mut self) {
        self.tweens.kill_all();
        self.timers.kill_all();
        self.hold_timer = TimerHandle::new();

        let mut ring = self.ring.lock();
        ring.start_requested = false;
        if let Some(mut read) = ring.read {
            while ring.slots[read].take().is_some() {
                read = (read + 1) % self.capacity;
            }
            ring.read = Some(read);
        }
        self.motion = PopupMotion::default();
    }

    /// The popup currently on screen.
    #[must_use]
    pub fn view(&self) -> Option<PopupView> {
        let ring = self.ring.lock();
        ring.current().map(|popup| PopupView {
            popup: popup.clone(),
            y: self.motion.y,
            unfold: self.motion.unfold,
            width: self.width,
            height: self.height,
        })
    }

    /// Popups in the ring, the one on screen included.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.ring.lock().occupied()
    }

    /// True while a popup is animating or held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.tweens.is_empty() || !self.timers.is_empty()
    }

    /// Popups fully played.
    #[must_use]
    pub fn shown(&self) -> u64 {
        self.shown
    }

    /// Heading line drawn above the title.
    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{IconSet, NoBadges};
    use crate::layout::ScreenInfo;
    use crate::text::MonospaceMetrics;

    struct Badges;

    impl BadgeResolver for Badges {
        fn resolve(&self, key: &str) -> Option<TextureId> {
            key.parse().ok().map(TextureId)
        }
    }

    fn layout(config: &WidgetsConfig) -> WidgetLayout {
        WidgetLayout::compute(
            ScreenInfo::new(1280, 720, 1.0),
            config,
            &MonospaceMetrics::default(),
            &IconSet::new(),
        )
    }

    #[test]
    fn test_ring_is_lazy() {
        let presenter = AchievementPresenter::new(&WidgetsConfig::default());
        assert!(presenter.ring.lock().read.is_none());

        let tx = presenter.sender(Arc::new(NoBadges));
        assert_eq!(tx.push("First Blood", None), PushOutcome::Queued);
        assert_eq!(presenter.ring.lock().read, Some(0));
    }

    #[test]
    fn test_only_first_push_requests_start() {
        let presenter = AchievementPresenter::new(&WidgetsConfig::default());
        let tx = presenter.sender(Arc::new(NoBadges));

        tx.push("a", None);
        assert!(presenter.ring.lock().start_requested);
        presenter.ring.lock().start_requested = false;

        tx.push("b", None);
        assert!(!presenter.ring.lock().start_requested);
    }

    #[test]
    fn test_badge_resolved_on_push() {
        let config = WidgetsConfig::default();
        let mut presenter = AchievementPresenter::new(&config);
        let tx = presenter.sender(Arc::new(Badges));
        let layout = layout(&config);
        let metrics = MonospaceMetrics::default();

        tx.push("Speedrunner", Some("42"));
        presenter.advance(Duration::from_millis(1), &layout, &metrics);

        let view = presenter.view().unwrap();
        assert_eq!(view.popup.badge, Some(TextureId(42)));
        assert!((view.height - layout.font_size * 4.0).abs() < 1e-4);
        assert!(view.y < 0.0);
    }

    #[test]
    fn test_width_covers_heading_and_title() {
        let config = WidgetsConfig::default();
        let mut presenter = AchievementPresenter::new(&config);
        let tx = presenter.sender(Arc::new(NoBadges));
        let layout = layout(&config);
        let metrics = MonospaceMetrics::default();

        let long = "A very long achievement title indeed";
        tx.push(long, None);
        presenter.advance(Duration::from_millis(1), &layout, &metrics);

        let expected = layout.text_width(&metrics, long) + layout.padding * 2.0;
        assert!((presenter.view().unwrap().width - expected).abs() < 1e-3);
    }
}
