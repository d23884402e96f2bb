//! Menu screens and the in-level HUD
//!
//! Each screen draws itself and returns the action the player picked this
//! frame, if any. Navigation happens in `AppState::apply`.

use macroquad::prelude::*;
use crate::app::AppAction;
use crate::config::GameConfig;
use crate::game::ProgressionManager;
use crate::level::LevelCatalog;
use super::{draw_text_centered, label, text_button, theme::*, Rect, UiContext};

const MENU_BUTTON_W: f32 = 260.0;
const MENU_BUTTON_H: f32 = 48.0;
const LEVEL_BUTTON_W: f32 = 240.0;
const LEVEL_COLUMNS: usize = 3;
const TITLE_BAR_H: f32 = 44.0;
const HUD_BAR_H: f32 = 72.0;

pub const INSTRUCTIONS: &str =
    "Click two dots of the SAME color to connect them. Multiple connections allowed!";
pub const CAMERA_HINT: &str = "Right-drag to orbit, scroll to zoom";

/// Button label on the level select grid
pub fn level_button_label(name: &str, unlocked: bool) -> String {
    if unlocked {
        name.to_string()
    } else {
        format!("{} (Locked)", name)
    }
}

/// Area of the screen that belongs to the 3D view while in a level
pub fn viewport_area(screen: Rect) -> Rect {
    screen.remaining_after_top(TITLE_BAR_H).remaining_after_bottom(HUD_BAR_H)
}

fn title(screen: Rect, y: f32, text: &str) {
    draw_text_centered(text, Rect::new(screen.x, y, screen.w, 60.0), FONT_SIZE_TITLE, WHITE);
}

fn back_button(ctx: &UiContext, screen: Rect, text: &str) -> bool {
    let rect = screen.slice_bottom(100.0).centered(MENU_BUTTON_W, MENU_BUTTON_H);
    text_button(ctx, rect, text, true)
}

pub fn draw_main_menu(ctx: &UiContext, screen: Rect) -> Option<AppAction> {
    let column = screen.centered(MENU_BUTTON_W, 220.0);
    title(screen, column.y - 20.0, "Dot Connect 3D");

    let buttons = column.remaining_after_top(80.0).grid(2, 1, MENU_BUTTON_W, MENU_BUTTON_H, 16.0);
    if text_button(ctx, buttons[0], "Play", true) {
        return Some(AppAction::Play);
    }
    if text_button(ctx, buttons[1], "Options", true) {
        return Some(AppAction::Options);
    }
    None
}

pub fn draw_level_select(
    ctx: &UiContext,
    screen: Rect,
    catalog: &LevelCatalog,
    progression: &ProgressionManager,
) -> Option<AppAction> {
    title(screen, 40.0, "Select Level");

    let grid_area = screen.remaining_after_top(130.0);
    let cells = grid_area.grid(catalog.len(), LEVEL_COLUMNS, LEVEL_BUTTON_W, MENU_BUTTON_H, 14.0);
    let mut action = None;
    for (level, cell) in catalog.levels().iter().zip(cells) {
        let unlocked = progression.is_unlocked(&level.id);
        let text = level_button_label(&level.name, unlocked);
        if text_button(ctx, cell, &text, unlocked) {
            action = Some(AppAction::SelectLevel(level.id.clone()));
        }
    }

    if catalog.is_empty() {
        draw_text_centered("No levels available", grid_area.slice_top(60.0), FONT_SIZE_CONTENT, TEXT_DIM);
    }

    if back_button(ctx, screen, "Back to Main Menu") {
        action = Some(AppAction::BackToMenu);
    }
    action
}

pub fn draw_options(ctx: &UiContext, screen: Rect, config: &GameConfig) -> Option<AppAction> {
    title(screen, 40.0, "Options");

    let catalog = match &config.catalog_path {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };
    let lines = [
        format!("Completion delay: {} ms", config.settle_delay_ms),
        format!("Levels unlocked at start: {}", config.initial_unlocked),
        format!("Field of view: {:.0} degrees", config.fov_degrees),
        format!("Level catalog: {}", catalog),
    ];
    let rows = screen.remaining_after_top(130.0).grid(lines.len(), 1, 420.0, 30.0, 6.0);
    for (line, row) in lines.iter().zip(rows) {
        label(line, row, FONT_SIZE_CONTENT, TEXT_COLOR);
    }

    if back_button(ctx, screen, "Back to Main Menu") {
        return Some(AppAction::BackToMenu);
    }
    None
}

/// What the HUD shows while a level is open
pub struct HudInfo<'a> {
    pub level_name: &'a str,
    pub connections: usize,
    pub expected: usize,
    pub status: Option<&'a str>,
}

pub fn draw_level_hud(ctx: &UiContext, screen: Rect, hud: &HudInfo) -> Option<AppAction> {
    let title_bar = screen.slice_top(TITLE_BAR_H);
    draw_rectangle(title_bar.x, title_bar.y, title_bar.w, title_bar.h, HEADER_COLOR);
    label(
        &format!("Playing Level: {}", hud.level_name),
        title_bar.pad(12.0),
        FONT_SIZE_HEADER,
        WHITE,
    );
    let count = format!("Connections: {} / {}", hud.connections, hud.expected);
    let count_w = measure_text(&count, None, FONT_SIZE_CONTENT as u16, 1.0).width;
    label(
        &count,
        Rect::new(title_bar.right() - count_w - 16.0, title_bar.y, count_w, title_bar.h),
        FONT_SIZE_CONTENT,
        ACCENT_COLOR,
    );

    let bar = screen.slice_bottom(HUD_BAR_H);
    draw_rectangle(bar.x, bar.y, bar.w, bar.h, HEADER_COLOR);
    let inner = bar.pad(8.0);
    let text_area = Rect::new(inner.x + 4.0, inner.y, inner.w - MENU_BUTTON_W - 16.0, inner.h);
    label(INSTRUCTIONS, text_area.slice_top(20.0), FONT_SIZE_CONTENT, TEXT_COLOR);
    label(
        hud.status.unwrap_or(CAMERA_HINT),
        text_area.slice_bottom(20.0),
        FONT_SIZE_SMALL,
        TEXT_DIM,
    );

    let back = Rect::new(inner.right() - MENU_BUTTON_W, inner.center_y() - 20.0, MENU_BUTTON_W, 40.0);
    if text_button(ctx, back, "Back to Levels", true) {
        return Some(AppAction::BackToLevels);
    }
    None
}
