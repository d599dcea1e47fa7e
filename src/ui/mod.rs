//! Minimal immediate-mode UI for the tool's panels.
//!
//! Widgets draw with macroquad and read one `MouseState` captured at the
//! top of the frame, so every panel sees the same input.

#![allow(dead_code)]

pub mod rect;
pub mod theme;
pub mod widgets;

pub use rect::Rect;

/// Mouse state for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,
    pub scroll: f32,
}

/// Shared state for a frame of UI drawing
#[derive(Debug, Default)]
pub struct UiContext {
    mouse: MouseState,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per frame before drawing any panel
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
    }

    pub fn mouse(&self) -> MouseState {
        self.mouse
    }

    pub fn hovered(&self, rect: Rect) -> bool {
        rect.contains(self.mouse.x, self.mouse.y)
    }

    pub fn clicked(&self, rect: Rect) -> bool {
        self.mouse.left_pressed && self.hovered(rect)
    }
}
