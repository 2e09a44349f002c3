//! Renderer interface
//!
//! The Render phase produces an ordered list of [`DrawCommand`]s in screen
//! space. Whatever draws them (a window, a test recorder) implements
//! [`Renderer`]; the core never talks to a graphics API directly.

use crate::asset::{ImageHandle, SourceRect};

use super::body::Rect;

/// One thing to put on screen, in logical viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Copy `source` out of `image` with its top-left at `(x, y)`
    Image {
        image: ImageHandle,
        source: SourceRect,
        x: f32,
        y: f32,
    },
    /// Outline a rectangle, used for the collider overlay
    DebugRect { rect: Rect },
}

impl DrawCommand {
    /// Screen position of the command's top-left corner
    pub fn position(&self) -> (f32, f32) {
        match self {
            DrawCommand::Image { x, y, .. } => (*x, *y),
            DrawCommand::DebugRect { rect } => (rect.x, rect.y),
        }
    }
}

/// Consumer of one frame's commands, drawn in order
pub trait Renderer {
    fn draw(&mut self, commands: &[DrawCommand]);
}

/// Keeps the most recent frame instead of drawing it.
/// The window host presents from it and tests inspect it.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frame: Vec<DrawCommand>,
    frames_seen: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last frame drawn
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.frame
    }

    /// Number of frames drawn so far
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl Renderer for FrameRecorder {
    fn draw(&mut self, commands: &[DrawCommand]) {
        self.frame.clear();
        self.frame.extend_from_slice(commands);
        self.frames_seen += 1;
    }
}

/// Placement of the logical viewport inside a window of any size: the
/// largest uniform scale that fits, centered, with bars on the spare axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Scaled viewport size in window pixels
    pub width: f32,
    pub height: f32,
}

impl Letterbox {
    pub fn fit(viewport: (f32, f32), window: (f32, f32)) -> Self {
        let (vw, vh) = viewport;
        let (ww, wh) = window;
        let scale = (ww / vw).min(wh / vh).max(0.0);
        let (width, height) = (vw * scale, vh * scale);
        Self {
            scale,
            offset_x: ((ww - width) * 0.5).floor(),
            offset_y: ((wh - height) * 0.5).floor(),
            width,
            height,
        }
    }

    /// Viewport point to window pixels
    pub fn to_window(&self, x: f32, y: f32) -> (f32, f32) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }
}
