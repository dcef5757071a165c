//! Per-frame drawing of every widget into a [`DrawList`].
//!
//! Rows are positioned by their distance from the bottom edge, so a row at
//! `offset_y` has its top edge at `screen_height - offset_y`.

use crate::achievement::PopupView;
use crate::assets::{IconSet, WidgetIcon};
use crate::layout::{Rect, WidgetLayout};
use crate::load::LoadContentView;
use crate::message::MessageBanner;
use crate::notification::{MessageCategory, MessageIcon, Notification};
use crate::render::{DrawList, TextAlign};
use crate::style::{palette, Color};
use crate::text::FontMetrics;

/// Shared inputs of the draw functions.
pub(crate) struct DrawContext<'a> {
    pub layout: &'a WidgetLayout,
    pub metrics: &'a dyn FontMetrics,
    pub icons: &'a IconSet,
    pub backdrop_alpha: f32,
}

impl DrawContext<'_> {
    fn backdrop(&self) -> Color {
        palette::BACKDROP.with_alpha(self.backdrop_alpha)
    }

    /// Baseline of single-line text in a top-right box.
    fn corner_baseline(&self, y: f32) -> f32 {
        y + self.layout.font_size + self.layout.padding / 4.0
    }
}

fn category_color(category: MessageCategory) -> Color {
    match category {
        MessageCategory::Info => palette::MSG_INFO,
        MessageCategory::Error => palette::ERROR,
        MessageCategory::Warning => palette::WARNING,
        MessageCategory::Success => palette::SUCCESS,
    }
}

pub(crate) fn draw_banner(list: &mut DrawList, ctx: &DrawContext<'_>, banner: &MessageBanner) {
    if !banner.is_visible() {
        return;
    }
    let layout = ctx.layout;
    let height = layout.generic_message_height;

    list.quad(
        Rect::new(0.0, layout.screen_height - height, banner.width(), height),
        palette::BACKDROP.with_alpha(banner.alpha()),
    );
    list.text(
        banner.text(),
        layout.padding,
        layout.screen_height - height / 2.0 + layout.font_size / 4.0,
        palette::TEXT.with_alpha(banner.alpha()),
        1.0,
        TextAlign::Left,
    );
}

pub(crate) fn draw_achievement(
    list: &mut DrawList,
    ctx: &DrawContext<'_>,
    view: &PopupView,
    heading: &str,
) {
    let layout = ctx.layout;
    let size = view.height;
    let badge_bounds = Rect::new(0.0, view.y, size, size);

    match view.popup.badge {
        Some(badge) => list.icon(badge_bounds, Some(badge), 0.0, Color::WHITE),
        None => {
            list.quad(badge_bounds, ctx.backdrop());
            list.icon(badge_bounds, ctx.icons.get(WidgetIcon::Achievement), 0.0, Color::WHITE);
        }
    }

    let clipped = (view.unfold - 1.0).abs() > 0.01;
    if clipped {
        list.push_clip(Rect::new(size, 0.0, view.width * view.unfold, size));
    }

    let unfold_offset = (1.0 - view.unfold) * view.width / 2.0;
    let text_x = size + layout.padding - unfold_offset;

    list.quad(Rect::new(size, view.y, view.width, size), ctx.backdrop());
    list.text(
        heading,
        text_x,
        layout.font_size * 1.9 + view.y,
        palette::TEXT_FAINT,
        1.0,
        TextAlign::Left,
    );
    list.text(
        view.popup.title.as_str(),
        text_x,
        layout.font_size * 2.9 + view.y,
        palette::TEXT_INFO,
        1.0,
        TextAlign::Left,
    );

    if clipped {
        list.pop_clip();
    }
}

pub(crate) fn draw_notification(list: &mut DrawList, ctx: &DrawContext<'_>, n: &Notification) {
    if n.is_task() {
        draw_task_row(list, ctx, n);
    } else {
        draw_message_row(list, ctx, n);
    }
}

fn draw_task_row(list: &mut DrawList, ctx: &DrawContext<'_>, n: &Notification) {
    let Some(task) = n.task() else {
        return;
    };
    let layout = ctx.layout;

    let status_chars = if task.error { 12.0 } else { 5.0 };
    let status_offset = layout.glyph_width * status_chars + layout.padding * 1.25;
    let rect_width = layout.padding + n.width() + status_offset;

    let first_title = task.reuse_count <= 1;
    let background = match (task.finished, first_title) {
        (true, true) | (false, false) => palette::TASK_PROGRESS,
        (true, false) => palette::TASK_FINISHED,
        (false, true) => palette::MSG_BACKGROUND,
    };
    let bar_color = if first_title {
        palette::TASK_PROGRESS
    } else {
        palette::TASK_FINISHED
    };

    let top = layout.screen_height - n.offset_y();
    let height = layout.row_height / 2.0;
    let rect = Rect::new(layout.task_rect_start_x, top, rect_width, height);

    list.quad(rect, background.with_alpha(n.alpha()));

    let bar = task.bar_width(rect_width);
    if bar > 0.0 {
        list.quad(
            Rect::new(layout.task_rect_start_x, top, bar, height),
            bar_color.with_alpha(n.alpha()),
        );
    }

    let (icon, rotation) = if task.finished {
        (WidgetIcon::Check, 0.0)
    } else {
        (WidgetIcon::Hourglass, n.hourglass_rotation())
    };
    list.icon(
        Rect::new(layout.task_hourglass_x, top, height, height),
        ctx.icons.get(icon),
        rotation,
        Color::WHITE.with_alpha(n.alpha()),
    );

    let baseline = top + layout.text_scale * layout.font_size + layout.row_height / 4.0
        - layout.font_size / 2.25;
    let text_color = palette::TEXT.with_alpha(n.alpha());

    let incoming = n.incoming_text().filter(|t| *t != n.text());
    if let Some(incoming) = incoming {
        list.push_clip(rect);
        list.text(
            incoming,
            layout.task_text_start_x,
            baseline - layout.row_height / 2.0 + n.text_transition(),
            text_color,
            layout.text_scale,
            TextAlign::Left,
        );
    }
    list.text(
        n.text(),
        layout.task_text_start_x,
        baseline + n.text_transition(),
        text_color,
        layout.text_scale,
        TextAlign::Left,
    );
    if incoming.is_some() {
        list.pop_clip();
    }

    if let Some(status) = task.status_text() {
        list.text(
            status,
            layout.task_rect_start_x + rect_width - layout.msg_glyph_width,
            baseline,
            palette::TEXT.with_alpha(n.alpha() / 2.0),
            layout.text_scale,
            TextAlign::Right,
        );
    }
}

fn draw_message_row(list: &mut DrawList, ctx: &DrawContext<'_>, n: &Notification) {
    let layout = ctx.layout;
    let top = layout.screen_height - n.offset_y();
    let icon_top = top - layout.icon_offset_y;
    let icon_bounds = Rect::new(layout.spacing, icon_top, layout.icon_size_x, layout.icon_size_y);
    let background = palette::MSG_BACKGROUND.with_alpha(n.alpha());

    let clipped = !n.is_unfolded() || n.is_unfolding();
    if clipped {
        let width = (layout.scissor_start_x + n.width() - layout.padding * 2.0) * n.unfold();
        list.push_clip(Rect::new(
            layout.scissor_start_x,
            0.0,
            width.max(0.0),
            layout.screen_height,
        ));
    }

    if layout.has_icons {
        list.icon(
            icon_bounds,
            ctx.icons.get(WidgetIcon::MsgQueueIconRect),
            0.0,
            background,
        );
    }

    list.quad(
        Rect::new(
            layout.rect_start_x,
            top,
            layout.padding + n.width(),
            layout.row_height,
        ),
        background,
    );

    list.text(
        n.text(),
        layout.regular_text_start - (1.0 - n.unfold()) * n.width() / 2.0,
        top + layout.regular_text_base_y - n.text_height() / 2.0,
        palette::TEXT.with_alpha(n.alpha()),
        layout.text_scale,
        TextAlign::Left,
    );

    if clipped {
        list.pop_clip();
    }

    if layout.has_icons {
        let white = Color::WHITE.with_alpha(n.alpha());
        list.icon(
            icon_bounds,
            ctx.icons.get(WidgetIcon::MsgQueueIcon),
            0.0,
            category_color(n.category()).with_alpha(n.alpha()),
        );
        list.icon(
            icon_bounds,
            ctx.icons.get(WidgetIcon::MsgQueueIconOutline),
            0.0,
            white,
        );

        if n.icon() != MessageIcon::None {
            let inner = layout.internal_icon_size;
            let offset = layout.internal_icon_offset;
            list.icon(
                Rect::new(layout.spacing + offset, icon_top + offset, inner, inner),
                ctx.icons.get(WidgetIcon::Info),
                0.0,
                white,
            );
        }
    }
}

pub(crate) fn draw_fps(list: &mut DrawList, ctx: &DrawContext<'_>, text: &str, right: f32) {
    let layout = ctx.layout;
    let text_width = layout.text_width(ctx.metrics, text);
    let total = text_width + layout.padding * 2.0;
    let x = (right - layout.padding - text_width).max(0.0);

    list.quad(
        Rect::new(right - total, 0.0, total, layout.simple_height),
        ctx.backdrop(),
    );
    list.text(text, x, ctx.corner_baseline(0.0), palette::TEXT, 1.0, TextAlign::Left);
}

/// Draws one indicator ending at `right`. Returns its width.
pub(crate) fn draw_indicator(
    list: &mut DrawList,
    ctx: &DrawContext<'_>,
    icon: WidgetIcon,
    label: &str,
    y: f32,
    right: f32,
) -> f32 {
    let layout = ctx.layout;

    if let Some(texture) = ctx.icons.get(icon) {
        let size = layout.simple_height * 2.0;
        let bounds = Rect::new(right - size, y, size, size);
        list.quad(bounds, ctx.backdrop());
        list.icon(bounds, Some(texture), 0.0, Color::WHITE);
        return size;
    }

    let width = layout.text_width(ctx.metrics, label) + layout.padding * 2.0;
    list.quad(
        Rect::new(right - width, y, width, layout.simple_height),
        ctx.backdrop(),
    );
    list.text(
        label,
        right - width + layout.padding,
        ctx.corner_baseline(y),
        palette::TEXT,
        1.0,
        TextAlign::Left,
    );
    width
}

/// Splash text sits this far below the screen center at scale 1.0.
const LOAD_TEXT_DROP: f32 = 200.0;
/// Distance the splash text rises while it fades in.
const LOAD_TEXT_RISE: f32 = 25.0;

pub(crate) fn draw_load_content(list: &mut DrawList, ctx: &DrawContext<'_>, view: &LoadContentView<'_>) {
    let layout = ctx.layout;
    let screen = Rect::new(0.0, 0.0, layout.screen_width, layout.screen_height);
    let center_x = layout.screen_width / 2.0;
    let center_y = layout.screen_height / 2.0;

    if view.fade > 0.0 {
        list.quad(screen, palette::BACKDROP.with_alpha(view.fade));
    }

    let size = view.icon_size;
    list.icon(
        Rect::new(center_x - size / 2.0, center_y - size / 2.0, size, size),
        Some(view.icon),
        0.0,
        view.icon_color,
    );

    let scale = layout.scale_factor;
    list.text(
        view.name,
        center_x,
        center_y + (LOAD_TEXT_DROP - LOAD_TEXT_RISE * view.fade) * scale,
        palette::LOAD_TEXT.with_alpha(view.fade),
        1.0,
        TextAlign::Center,
    );

    if view.final_fade > 0.0 {
        list.quad(screen, palette::BACKDROP.with_alpha(view.final_fade));
    }
}
