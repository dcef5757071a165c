//! Texture handles provided by the host.
//!
//! The widgets never load images. The host uploads textures and hands over
//! opaque ids; a missing id means "draw without it".

/// Opaque GPU texture id owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Icons the widgets know how to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetIcon {
    /// Paused indicator.
    Paused,
    /// Fast-forward indicator.
    FastForward,
    /// Rewind indicator.
    Rewind,
    /// Slow-motion indicator.
    SlowMotion,
    /// Spinning wait icon on running tasks.
    Hourglass,
    /// Check mark on finished tasks.
    Check,
    /// Info glyph on regular messages.
    Info,
    /// Default badge of achievement popups.
    Achievement,
    /// Left cap of a notification row (icon disc).
    MsgQueueIcon,
    /// Outline drawn around the icon disc.
    MsgQueueIconOutline,
    /// Fill drawn inside the icon disc.
    MsgQueueIconRect,
}

impl WidgetIcon {
    /// Number of icons.
    pub const COUNT: usize = 11;

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Optional texture per [`WidgetIcon`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IconSet {
    textures: [Option<TextureId>; WidgetIcon::COUNT],
}

impl IconSet {
    /// Creates an empty set (text-only fallback everywhere).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, icon: WidgetIcon, texture: TextureId) -> Self {
        self.set(icon, Some(texture));
        self
    }

    /// Assigns or clears the texture for `icon`.
    pub fn set(&mut self, icon: WidgetIcon, texture: Option<TextureId>) {
        self.textures[icon.slot()] = texture;
    }

    /// Texture for `icon`, if loaded.
    #[must_use]
    pub fn get(&self, icon: WidgetIcon) -> Option<TextureId> {
        self.textures[icon.slot()]
    }

    /// True when the row cap textures are all present.
    ///
    /// Without them messages are drawn unfolded as plain rows.
    #[must_use]
    pub fn has_msg_queue_icons(&self) -> bool {
        self.get(WidgetIcon::MsgQueueIcon).is_some()
            && self.get(WidgetIcon::MsgQueueIconOutline).is_some()
            && self.get(WidgetIcon::MsgQueueIconRect).is_some()
    }

    /// True when running tasks get a spinning hourglass.
    #[must_use]
    pub fn has_hourglass(&self) -> bool {
        self.get(WidgetIcon::Hourglass).is_some()
    }
}

/// Turns an achievement badge key into a texture.
///
/// Called from whichever thread pushes the achievement.
pub trait BadgeResolver: Send + Sync {
    /// Resolves `key`; `None` draws the popup without a badge.
    fn resolve(&self, key: &str) -> Option<TextureId>;
}

/// Resolver that never finds a badge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBadges;

impl BadgeResolver for NoBadges {
    fn resolve(&self, _key: &str) -> Option<TextureId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_queue_icons_need_all_three() {
        let partial = IconSet::new()
            .with(WidgetIcon::MsgQueueIcon, TextureId(1))
            .with(WidgetIcon::MsgQueueIconOutline, TextureId(2));
        assert!(!partial.has_msg_queue_icons());

        let full = partial.with(WidgetIcon::MsgQueueIconRect, TextureId(3));
        assert!(full.has_msg_queue_icons());
    }

    #[test]
    fn test_last_icon_fits() {
        let set = IconSet::new().with(WidgetIcon::MsgQueueIconRect, TextureId(9));
        assert_eq!(set.get(WidgetIcon::MsgQueueIconRect), Some(TextureId(9)));
        assert_eq!(set.get(WidgetIcon::Paused), None);
    }
}
