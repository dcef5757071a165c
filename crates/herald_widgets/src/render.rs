//! Draw command list.
//!
//! The widgets never talk to the GPU. Each frame they fill a [`DrawList`]
//! that the host's renderer replays in order.

use crate::assets::TextureId;
use crate::layout::Rect;
use crate::style::Color;

/// Horizontal anchoring of a text command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the right edge.
    Right,
    /// `x` is the center.
    Center,
}

/// A render command for the widget layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rectangle.
    Quad {
        /// Bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
    },
    /// Textured quad, rotated around its center.
    Icon {
        /// Bounds.
        bounds: Rect,
        /// Texture.
        texture: TextureId,
        /// Rotation in radians.
        rotation: f32,
        /// Tint color.
        color: Color,
    },
    /// Text, baseline at `y`.
    Text {
        /// Text content.
        text: String,
        /// Anchor x position.
        x: f32,
        /// Baseline y position.
        y: f32,
        /// Text color.
        color: Color,
        /// Scale relative to the widget font.
        scale: f32,
        /// Anchoring.
        align: TextAlign,
    },
    /// Scissor rect (clip until the matching pop).
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// Collects the commands of one frame.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<RenderCommand>,
    clip_stack: Vec<Rect>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(128),
            clip_stack: Vec::with_capacity(4),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    /// Adds a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Adds a filled rectangle.
    pub fn quad(&mut self, bounds: Rect, color: Color) {
        self.push(RenderCommand::Quad { bounds, color });
    }

    /// Adds an icon if the texture is loaded.
    pub fn icon(&mut self, bounds: Rect, texture: Option<TextureId>, rotation: f32, color: Color) {
        if let Some(texture) = texture {
            self.push(RenderCommand::Icon {
                bounds,
                texture,
                rotation,
                color,
            });
        }
    }

    /// Adds a text run.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        color: Color,
        scale: f32,
        align: TextAlign,
    ) {
        self.push(RenderCommand::Text {
            text: text.into(),
            x,
            y,
            color,
            scale,
            align,
        });
    }

    /// Pushes a clip rect.
    pub fn push_clip(&mut self, bounds: Rect) {
        // Intersect with current clip if any
        let actual_clip = if let Some(current) = self.clip_stack.last() {
            current.intersection(&bounds).unwrap_or(Rect::ZERO)
        } else {
            bounds
        };

        self.clip_stack.push(actual_clip);
        self.commands.push(RenderCommand::PushClip { bounds: actual_clip });
    }

    /// Pops the current clip rect.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.commands.push(RenderCommand::PopClip);
        }
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns the total command count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
