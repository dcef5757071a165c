//! Full-screen splash played while content loads.
//!
//! The stages run on one step length `D`:
//!
//! ```text
//! 0      D          2.5D      4D            7D       9D        10.5D
//! │ icon │ backdrop  │  wait   │ tint→white  │  wait  │ blackout │ end
//! │ grow │ + name    │         │             │        │          │
//! ```
//!
//! Delayed stages are started by timers; the last timer stops the splash.

use std::time::Duration;

use herald_core::{TimerHandle, TimerService, Tween, TweenEngine, TweenTarget};

use crate::assets::TextureId;
use crate::style::{palette, Color};

/// Icon edge at scale factor 1.0 when the splash starts.
pub const INITIAL_ICON_SIZE: f32 = 320.0;
/// Icon edge at scale factor 1.0 once it settled.
pub const TARGET_ICON_SIZE: f32 = 240.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadField {
    IconSize,
    IconAlpha,
    Fade,
    Tint,
    FinalFade,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadStage {
    Fade,
    Tint,
    FinalFade,
    End,
}

/// Animated values of the splash.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LoadValues {
    icon_size: f32,
    icon_alpha: f32,
    fade: f32,
    tint: f32,
    final_fade: f32,
}

impl TweenTarget<(), LoadField> for LoadValues {
    fn write(&mut self, _owner: (), field: LoadField, value: f32) -> bool {
        let slot = match field {
            LoadField::IconSize => &mut self.icon_size,
            LoadField::IconAlpha => &mut self.icon_alpha,
            LoadField::Fade => &mut self.fade,
            LoadField::Tint => &mut self.tint,
            LoadField::FinalFade => &mut self.final_fade,
        };
        *slot = value;
        true
    }
}

/// What the renderer needs for one frame of the splash.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadContentView<'a> {
    /// Content name under the icon.
    pub name: &'a str,
    /// Icon texture.
    pub icon: TextureId,
    /// Icon edge in pixels.
    pub icon_size: f32,
    /// Icon tint, alpha included.
    pub icon_color: Color,
    /// Backdrop and name opacity.
    pub fade: f32,
    /// Opacity of the closing blackout.
    pub final_fade: f32,
}

/// Load-content splash.
pub struct LoadContentAnimation {
    step: Duration,
    running: bool,
    name: String,
    icon: Option<TextureId>,
    values: LoadValues,

    fade_timer: TimerHandle,
    tint_timer: TimerHandle,
    final_timer: TimerHandle,
    end_timer: TimerHandle,
    timers: TimerService<LoadStage>,
    tweens: TweenEngine<(), LoadField, ()>,
}

impl LoadContentAnimation {
    /// Creates an idle splash with step length `step`.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            running: false,
            name: String::new(),
            icon: None,
            values: LoadValues::default(),
            fade_timer: TimerHandle::new(),
            tint_timer: TimerHandle::new(),
            final_timer: TimerHandle::new(),
            end_timer: TimerHandle::new(),
            timers: TimerService::new(),
            tweens: TweenEngine::new(),
        }
    }

    /// Starts the splash for `content_name`, restarting one already running.
    ///
    /// Without an `icon` nothing is shown and false is returned.
    pub fn start(
        &mut self,
        content_name: &str,
        remove_extension: bool,
        icon: Option<TextureId>,
        scale_factor: f32,
    ) -> bool {
        let Some(icon) = icon else {
            tracing::debug!(content = content_name, "load splash skipped, no icon");
            return false;
        };

        self.cleanup();

        self.name = if remove_extension {
            strip_extension(content_name).to_owned()
        } else {
            content_name.to_owned()
        };
        self.icon = Some(icon);
        self.values = LoadValues {
            icon_size: INITIAL_ICON_SIZE * scale_factor,
            ..LoadValues::default()
        };

        let step = self.step;
        let long = step * 3 / 2;

        self.tweens.push(Tween::new(
            (),
            LoadField::IconSize,
            self.values.icon_size,
            TARGET_ICON_SIZE * scale_factor,
            step,
        ));
        self.tweens.push(Tween::new((), LoadField::IconAlpha, 0.0, 1.0, step));

        let fade_at = step;
        let tint_at = fade_at + long + long;
        let final_at = tint_at + step * 3 + step * 2;
        let end_at = final_at + long;

        self.timers.start(&mut self.fade_timer, fade_at, LoadStage::Fade);
        self.timers.start(&mut self.tint_timer, tint_at, LoadStage::Tint);
        self.timers.start(&mut self.final_timer, final_at, LoadStage::FinalFade);
        self.timers.start(&mut self.end_timer, end_at, LoadStage::End);

        self.running = true;
        tracing::debug!(content = %self.name, "load splash started");
        true
    }

    /// Advances the stage timers and tweens.
    pub fn advance(&mut self, delta: Duration) {
        if !self.running {
            return;
        }

        let _ = self.tweens.tick(delta, &mut self.values);

        for stage in self.timers.tick(delta) {
            let long = self.step * 3 / 2;
            match stage {
                LoadStage::Fade => {
                    self.tweens.push(Tween::new((), LoadField::Fade, 0.0, 1.0, long));
                }
                LoadStage::Tint => {
                    self.tweens
                        .push(Tween::new((), LoadField::Tint, 0.0, 1.0, self.step * 3));
                }
                LoadStage::FinalFade => {
                    self.tweens
                        .push(Tween::new((), LoadField::FinalFade, 0.0, 1.0, long));
                }
                LoadStage::End => {
                    tracing::debug!(content = %self.name, "load splash finished");
                    self.cleanup();
                    return;
                }
            }
        }
    }

    /// Stops the splash at once.
    pub fn cleanup(&mut self) {
        self.timers.kill_all();
        self.tweens.kill_all();
        self.fade_timer = TimerHandle::new();
        self.tint_timer = TimerHandle::new();
        self.final_timer = TimerHandle::new();
        self.end_timer = TimerHandle::new();
        self.running = false;
        self.icon = None;
        self.name.clear();
        self.values = LoadValues::default();
    }

    /// True while the splash is drawn.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Content name as displayed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current frame of the splash, `None` when idle.
    #[must_use]
    pub fn view(&self) -> Option<LoadContentView<'_>> {
        if !self.running {
            return None;
        }
        let icon = self.icon?;
        let v = self.values;
        Some(LoadContentView {
            name: &self.name,
            icon,
            icon_size: v.icon_size,
            icon_color: palette::LOAD_ICON
                .lerp(Color::WHITE, v.tint)
                .with_alpha(v.icon_alpha),
            fade: v.fade,
            final_fade: v.final_fade,
        })
    }
}

/// Drops a trailing `.ext` from the last path component.
fn strip_extension(name: &str) -> &str {
    let file_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match name[file_start..].rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..file_start + dot],
    }
}
