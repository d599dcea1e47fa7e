//! Panel colors and sizes shared by all editor panels

use macroquad::prelude::Color;

/// Window background
pub const BG_COLOR: Color = Color::new(0.10, 0.10, 0.12, 1.0);

/// Panel background
pub const PANEL_COLOR: Color = Color::new(0.14, 0.14, 0.17, 1.0);

/// Panel header strip
pub const HEADER_COLOR: Color = Color::new(0.18, 0.18, 0.22, 1.0);

/// Primary text
pub const TEXT_COLOR: Color = Color::new(0.82, 0.82, 0.86, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.45, 0.45, 0.50, 1.0);

/// Button fill
pub const BUTTON_COLOR: Color = Color::new(0.22, 0.22, 0.27, 1.0);

/// Button fill when hovered
pub const BUTTON_HOVER: Color = Color::new(0.30, 0.30, 0.36, 1.0);

/// Accent for the selected row and active tab
pub const ACCENT_COLOR: Color = Color::new(0.15, 0.55, 0.80, 1.0);

/// Error text and failed-asset badges
pub const ERROR_COLOR: Color = Color::new(0.85, 0.30, 0.28, 1.0);

/// Loaded-asset and active-scene badges
pub const OK_COLOR: Color = Color::new(0.35, 0.70, 0.40, 1.0);

/// Pending/neutral state badges
pub const PENDING_COLOR: Color = Color::new(0.75, 0.65, 0.30, 1.0);

/// Header text size
pub const FONT_SIZE_HEADER: f32 = 16.0;

/// Standard content text size
pub const FONT_SIZE_CONTENT: f32 = 14.0;

/// Row height in list panels
pub const ROW_HEIGHT: f32 = 22.0;
