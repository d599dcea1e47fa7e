//! Basic panel widgets

use macroquad::prelude::*;

use super::theme;
use super::{Rect, UiContext};

/// Draw a filled panel with a header strip; returns the content area
pub fn panel(rect: Rect, title: &str) -> Rect {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme::PANEL_COLOR);
    let (header, content) = rect.split_top(theme::ROW_HEIGHT + 4.0);
    draw_rectangle(header.x, header.y, header.w, header.h, theme::HEADER_COLOR);
    draw_text(
        title,
        (header.x + 8.0).round(),
        (header.y + header.h * 0.72).round(),
        theme::FONT_SIZE_HEADER,
        theme::TEXT_COLOR,
    );
    content.pad(6.0)
}

/// Draw a text button, returns true when clicked
pub fn button(ctx: &UiContext, rect: Rect, label: &str) -> bool {
    let hovered = ctx.hovered(rect);
    let fill = if hovered {
        theme::BUTTON_HOVER
    } else {
        theme::BUTTON_COLOR
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
    let dims = measure_text(label, None, theme::FONT_SIZE_CONTENT as u16, 1.0);
    draw_text(
        label,
        (rect.x + (rect.w - dims.width) * 0.5).round(),
        (rect.y + (rect.h + dims.height) * 0.5).round(),
        theme::FONT_SIZE_CONTENT,
        theme::TEXT_COLOR,
    );
    ctx.clicked(rect)
}

/// Draw a selectable list row, returns true when clicked
pub fn row(ctx: &UiContext, rect: Rect, label: &str, selected: bool) -> bool {
    if selected {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme::ACCENT_COLOR);
    } else if ctx.hovered(rect) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme::BUTTON_COLOR);
    }
    draw_text(
        label,
        (rect.x + 6.0).round(),
        (rect.y + rect.h * 0.72).round(),
        theme::FONT_SIZE_CONTENT,
        theme::TEXT_COLOR,
    );
    ctx.clicked(rect)
}

/// Plain label
pub fn label(rect: Rect, text: &str, color: Color) {
    draw_text(
        text,
        (rect.x + 6.0).round(),
        (rect.y + rect.h * 0.72).round(),
        theme::FONT_SIZE_CONTENT,
        color,
    );
}

/// Small colored status dot with a label next to it
pub fn badge(rect: Rect, text: &str, color: Color) {
    let radius = 4.0;
    draw_circle(
        rect.x + radius + 2.0,
        rect.y + rect.h * 0.5,
        radius,
        color,
    );
    draw_text(
        text,
        (rect.x + radius * 2.0 + 8.0).round(),
        (rect.y + rect.h * 0.72).round(),
        theme::FONT_SIZE_CONTENT,
        theme::TEXT_DIM,
    );
}
