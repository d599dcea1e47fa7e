//! DREAM TOOL: scene engine with a live authoring tool
//!
//! Opens a JSON project directory, builds the project runtime, and
//! drives one update/render pass per frame. The left panel lists
//! scenes, the right panels show cache contents and the entity
//! inspector, and the center viewport draws the active scene's
//! submitted frame.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod components;
mod defs;
mod editor;
mod math;
mod prefs;
mod runtime;
mod storage;
mod ui;

use std::collections::HashSet;
use std::path::PathBuf;

use macroquad::prelude::*;

use app::AppState;
use components::input::{InputSnapshot, Key};
use defs::project::PROJECT_FILE;
use defs::ProjectDefinition;
use editor::{draw_editor, draw_status_bar};
use prefs::EditorPrefs;
use runtime::ProjectRuntime;
use storage::Storage;
use ui::{theme, MouseState, Rect, UiContext};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Dream Tool v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let mut prefs = EditorPrefs::load();
    let project_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| prefs.last_project.clone())
        .unwrap_or_else(|| PathBuf::from("dream-project"));
    log::info!("opening project directory {}", project_dir.display());

    let storage = Storage::new(&project_dir);
    let definition = load_or_create_project(&storage);

    prefs.last_project = Some(project_dir);
    prefs.save();

    let mut runtime = ProjectRuntime::new(definition, storage);
    if let Err(e) = runtime.open_startup_scene() {
        log::error!("startup scene failed: {}", e);
    }
    let mut app = AppState::new(runtime, prefs);
    let mut ui_ctx = UiContext::new();

    loop {
        // Advance the runtime with this frame's polled input
        let snapshot = poll_input();
        app.runtime.update_all(&snapshot, get_frame_time());

        // Fly the active scene's camera while the right button is held
        if is_mouse_button_down(MouseButton::Right) {
            fly_camera(&mut app, &snapshot, get_frame_time());
        }

        // Draw the tool
        let mouse = mouse_position();
        ui_ctx.begin_frame(MouseState {
            x: mouse.0,
            y: mouse.1,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            scroll: mouse_wheel().1,
        });

        clear_background(theme::BG_COLOR);
        let screen = Rect::new(0.0, 0.0, screen_width(), screen_height());
        let (content, status) = screen.split_bottom(24.0);
        let action = draw_editor(
            &ui_ctx,
            content,
            &app.runtime,
            &mut app.editor,
            app.prefs.show_caches,
            app.prefs.show_inspector,
        );
        draw_status_bar(status, &app.runtime, &mut app.editor, get_time());
        app.apply_action(action, get_time());

        // Panel toggles
        if is_key_pressed(KeyCode::F1) {
            app.prefs.show_caches = !app.prefs.show_caches;
            app.prefs.save();
        }
        if is_key_pressed(KeyCode::F2) {
            app.prefs.show_inspector = !app.prefs.show_inspector;
            app.prefs.save();
        }

        next_frame().await
    }
}

/// Open the project manifest, or create a starter project when the
/// directory has none. A manifest that fails to parse is left on disk
/// untouched; the tool runs with an in-memory starter instead.
fn load_or_create_project(storage: &Storage) -> ProjectDefinition {
    if storage.exists(PROJECT_FILE) {
        match ProjectDefinition::load(storage) {
            Ok(definition) => return definition,
            Err(e) => {
                log::error!("project manifest unreadable: {}", e);
                return ProjectDefinition::starter();
            }
        }
    }
    log::info!("no project found, creating starter project");
    let definition = ProjectDefinition::starter();
    if let Err(e) = ProjectDefinition::write_starter_files(storage) {
        log::warn!("starter payload files not written: {}", e);
    }
    if let Err(e) = definition.save(storage) {
        log::warn!("starter manifest not written: {}", e);
    }
    definition
}

/// Build the engine's input snapshot from macroquad's polled state
fn poll_input() -> InputSnapshot {
    const KEY_MAP: [(KeyCode, Key); 13] = [
        (KeyCode::W, Key::W),
        (KeyCode::A, Key::A),
        (KeyCode::S, Key::S),
        (KeyCode::D, Key::D),
        (KeyCode::Q, Key::Q),
        (KeyCode::E, Key::E),
        (KeyCode::Up, Key::Up),
        (KeyCode::Down, Key::Down),
        (KeyCode::Left, Key::Left),
        (KeyCode::Right, Key::Right),
        (KeyCode::Space, Key::Space),
        (KeyCode::LeftShift, Key::Shift),
        (KeyCode::Escape, Key::Escape),
    ];
    let mut keys_down = HashSet::new();
    for (code, key) in KEY_MAP {
        if is_key_down(code) {
            keys_down.insert(key);
        }
    }
    let mouse = mouse_position();
    InputSnapshot {
        keys_down,
        mouse_x: mouse.0,
        mouse_y: mouse.1,
        mouse_left: is_mouse_button_down(MouseButton::Left),
        mouse_right: is_mouse_button_down(MouseButton::Right),
        scroll: mouse_wheel().1,
    }
}

/// WASD fly controls for the active scene's camera
fn fly_camera(app: &mut AppState, snapshot: &InputSnapshot, dt: f32) {
    let Some(scene) = app.runtime.active_scene_runtime_mut() else {
        return;
    };
    let camera = scene.camera_mut();
    let speed = camera.movement_speed * dt;
    let forward = camera.transform.forward();
    let right = forward.cross(macroquad::math::Vec3::Y).normalize_or_zero();
    let mut delta = macroquad::math::Vec3::ZERO;
    if snapshot.is_key_down(Key::W) {
        delta += forward;
    }
    if snapshot.is_key_down(Key::S) {
        delta -= forward;
    }
    if snapshot.is_key_down(Key::D) {
        delta += right;
    }
    if snapshot.is_key_down(Key::A) {
        delta -= right;
    }
    if snapshot.is_key_down(Key::E) {
        delta += macroquad::math::Vec3::Y;
    }
    if snapshot.is_key_down(Key::Q) {
        delta -= macroquad::math::Vec3::Y;
    }
    camera.transform.position += delta * speed;
}
