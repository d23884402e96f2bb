//! Basic UI widgets

use macroquad::prelude::*;
use super::{theme::*, Rect, UiContext};

/// Draw text centered in a rect
pub fn draw_text_centered(text: &str, rect: Rect, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    // Round to integer pixels for crisp rendering
    let x = (rect.center_x() - dims.width * 0.5).round();
    let y = (rect.center_y() + dims.offset_y * 0.5).round();
    draw_text(text, x, y, font_size, color);
}

/// Draw a left-aligned label vertically centered in a rect
pub fn label(text: &str, rect: Rect, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    let y = (rect.center_y() + dims.offset_y * 0.5).round();
    draw_text(text, rect.x.round(), y, font_size, color);
}

/// Draw a text button, returns true if clicked.
///
/// Disabled buttons draw dimmed and never report a click.
pub fn text_button(ctx: &UiContext, rect: Rect, text: &str, enabled: bool) -> bool {
    let hovered = ctx.mouse.inside(&rect);
    let pressed = ctx.mouse.clicking(&rect);
    let clicked = ctx.mouse.clicked(&rect);

    let (bg, fg) = if !enabled {
        (BUTTON_LOCKED, TEXT_DIM)
    } else if pressed {
        (BUTTON_PRESSED, WHITE)
    } else if hovered {
        (BUTTON_HOVER, WHITE)
    } else {
        (BUTTON_BG, TEXT_COLOR)
    };

    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, 6.0, bg);
    draw_text_centered(text, rect, FONT_SIZE_HEADER, fg);

    enabled && clicked
}

/// Modal message with an OK button, drawn over everything else.
/// Returns true when OK is clicked.
pub fn message_box(ctx: &UiContext, screen: Rect, message: &str) -> bool {
    draw_rectangle(screen.x, screen.y, screen.w, screen.h, OVERLAY_COLOR);

    let text_w = measure_text(message, None, FONT_SIZE_HEADER as u16, 1.0).width;
    let box_rect = screen.centered((text_w + 64.0).max(320.0), 150.0);
    draw_rounded_rect(box_rect.x - 1.0, box_rect.y - 1.0, box_rect.w + 2.0, box_rect.h + 2.0, 8.0, MODAL_BORDER);
    draw_rounded_rect(box_rect.x, box_rect.y, box_rect.w, box_rect.h, 8.0, MODAL_BG);

    let inner = box_rect.pad(16.0);
    draw_text_centered(message, inner.slice_top(60.0), FONT_SIZE_HEADER, WHITE);

    let ok = inner.slice_bottom(40.0).centered(120.0, 40.0);
    text_button(ctx, ok, "OK", true)
}

/// Draw a rounded rectangle (simple approximation using overlapping rects)
fn draw_rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    // Main body
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    // Corners (circles)
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}
