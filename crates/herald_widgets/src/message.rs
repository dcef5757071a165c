//! Single-line banner in the bottom-left corner.
//!
//! Setting a new message replaces the old one immediately and restarts its
//! timer; when the timer fires the banner fades out.

use std::time::Duration;

use herald_core::{TimerHandle, TimerService, Tween, TweenEngine, TweenTarget};

use crate::layout::WidgetLayout;
use crate::text::FontMetrics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BannerAlpha;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FadeOut;

struct AlphaWriter<'a>(&'a mut f32);

impl TweenTarget<(), BannerAlpha> for AlphaWriter<'_> {
    fn write(&mut self, _owner: (), _field: BannerAlpha, value: f32) -> bool {
        *self.0 = value;
        true
    }
}

/// Generic message banner.
pub struct MessageBanner {
    text: String,
    width: f32,
    alpha: f32,
    backdrop_alpha: f32,
    animation: Duration,
    timer: TimerHandle,
    timers: TimerService<FadeOut>,
    tweens: TweenEngine<(), BannerAlpha, FadeOut>,
}

impl MessageBanner {
    /// Creates a hidden banner.
    #[must_use]
    pub fn new(backdrop_alpha: f32, animation: Duration) -> Self {
        Self {
            text: String::new(),
            width: 0.0,
            alpha: 0.0,
            backdrop_alpha,
            animation,
            timer: TimerHandle::new(),
            timers: TimerService::new(),
            tweens: TweenEngine::new(),
        }
    }

    /// Shows `text` for `duration`, then fades it out.
    pub fn set(
        &mut self,
        text: &str,
        duration: Duration,
        layout: &WidgetLayout,
        metrics: &dyn FontMetrics,
    ) {
        text.clone_into(&mut self.text);
        self.alpha = self.backdrop_alpha;

        self.tweens.kill_all();
        self.timers.start(&mut self.timer, duration, FadeOut);

        self.width = layout.text_width(metrics, text) + layout.padding * 2.0;
    }

    /// Advances the timer and the fade.
    pub fn advance(&mut self, delta: Duration) {
        if !self.timers.tick(delta).is_empty() {
            self.tweens.push(Tween::new((), BannerAlpha, self.alpha, 0.0, self.animation));
        }
        let _ = self.tweens.tick(delta, &mut AlphaWriter(&mut self.alpha));
    }

    /// Hides the banner at once.
    pub fn clear(&mut self) {
        self.timers.kill_all();
        self.tweens.kill_all();
        self.timer = TimerHandle::new();
        self.alpha = 0.0;
        self.text.clear();
    }

    /// True while anything would be drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }

    /// Banner text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Backdrop width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Current opacity.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::IconSet;
    use crate::config::WidgetsConfig;
    use crate::layout::ScreenInfo;
    use crate::text::MonospaceMetrics;

    fn setup() -> (MessageBanner, WidgetLayout, MonospaceMetrics) {
        let config = WidgetsConfig::default();
        let metrics = MonospaceMetrics::default();
        let layout = WidgetLayout::compute(
            ScreenInfo::new(1280, 720, 1.0),
            &config,
            &metrics,
            &IconSet::new(),
        );
        (
            MessageBanner::new(config.backdrop_alpha, config.animation_duration()),
            layout,
            metrics,
        )
    }

    #[test]
    fn test_fades_after_duration() {
        let (mut banner, layout, metrics) = setup();
        banner.set("Core message", Duration::from_millis(100), &layout, &metrics);
        assert!((banner.alpha() - 0.75).abs() < f32::EPSILON);

        banner.advance(Duration::from_millis(50));
        assert!((banner.alpha() - 0.75).abs() < f32::EPSILON);

        banner.advance(Duration::from_millis(60));
        for _ in 0..40 {
            banner.advance(Duration::from_millis(10));
        }
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_set_restarts_timer_and_fade() {
        let (mut banner, layout, metrics) = setup();
        banner.set("first", Duration::from_millis(10), &layout, &metrics);
        banner.advance(Duration::from_millis(20));
        banner.advance(Duration::from_millis(100));
        assert!(banner.alpha() < 0.75);

        banner.set("second", Duration::from_secs(1), &layout, &metrics);
        banner.advance(Duration::from_millis(500));
        assert!((banner.alpha() - 0.75).abs() < f32::EPSILON);
        assert_eq!(banner.text(), "second");
    }
}
