//! Dot Connect 3D: a casual connect-the-dots puzzle in 3D
//!
//! Dots of matching colors float in space. Click two of the same color to
//! draw a line between them; once every color has a connection the level
//! is complete and the next one unlocks.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod game;
mod level;
mod math;
mod scene;
mod ui;

use macroquad::prelude::*;
use app::{AppAction, AppState, Screen};
use config::GameConfig;
use level::LevelCatalog;
use ui::{
    draw_level_hud, draw_level_select, draw_main_menu, draw_options, message_box, theme,
    viewport_area, HudInfo, MouseState, Rect, UiContext,
};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Dot Connect 3D v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Install the global tracing subscriber. RUST_LOG wins over the config file.
#[cfg(not(target_arch = "wasm32"))]
fn init_logging(config: &GameConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Catalog from the configured file, falling back to the built-in levels
fn load_levels(config: &GameConfig) -> LevelCatalog {
    if let Some(path) = &config.catalog_path {
        match level::load_catalog(path) {
            Ok(catalog) if !catalog.is_empty() => return catalog,
            Ok(_) => tracing::warn!("{} has no levels, using built-in levels", path.display()),
            Err(e) => tracing::warn!("Failed to load {}: {}, using built-in levels", path.display(), e),
        }
    }

    match LevelCatalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Built-in level catalog is invalid: {}", e);
            LevelCatalog::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    // Config decides the log filter, so discovery logs to a temporary stderr subscriber
    #[cfg(not(target_arch = "wasm32"))]
    let config = {
        let bootstrap = tracing_subscriber::fmt().with_target(false).finish();
        let config = tracing::subscriber::with_default(bootstrap, GameConfig::discover);
        init_logging(&config);
        config
    };
    #[cfg(target_arch = "wasm32")]
    let config = GameConfig::default();

    let catalog = load_levels(&config);
    let mut app = AppState::new(config, catalog);
    let mut ui_ctx = UiContext::new();
    let mut viewport = scene::Viewport::new();

    tracing::info!("=== Dot Connect 3D v{} ===", VERSION);

    loop {
        let now = get_time();
        let (mouse_x, mouse_y) = mouse_position();
        ui_ctx.begin_frame(MouseState {
            x: mouse_x,
            y: mouse_y,
            left_down: is_mouse_button_down(MouseButton::Left),
            right_down: is_mouse_button_down(MouseButton::Right),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            scroll: mouse_wheel().1,
        });
        viewport.track(&ui_ctx.mouse);

        clear_background(theme::BG_COLOR);
        let screen = Rect::screen(screen_width(), screen_height());

        let mut action = match app.screen {
            Screen::MainMenu => draw_main_menu(&ui_ctx, screen),
            Screen::LevelSelect => draw_level_select(&ui_ctx, screen, &app.catalog, &app.progression),
            Screen::Options => draw_options(&ui_ctx, screen, &app.config),
            Screen::InLevel => {
                if app.message.is_none() {
                    let area = viewport_area(screen);
                    if let Some(id) = viewport.handle_input(&mut app.play, &app.config, area, screen, &ui_ctx.mouse) {
                        app.click_dot(&id, now);
                    }
                }
                app.update(now);

                let camera = app.play.camera();
                scene::draw_level(&app.play.session, &camera, &app.config);

                let session = &app.play.session;
                let hud = HudInfo {
                    level_name: &session.level().name,
                    connections: session.connections().len(),
                    expected: session.expected_connections(),
                    status: app.status.as_deref(),
                };
                draw_level_hud(&ui_ctx, screen, &hud)
            }
        };

        if let Some(message) = app.message.clone() {
            // Modal wins over anything drawn under it
            action = None;
            if message_box(&ui_ctx, screen, &message) {
                action = Some(AppAction::CloseMessage);
            }
        }

        if let Some(action) = action {
            app.apply(action);
        }

        next_frame().await;
    }
}
