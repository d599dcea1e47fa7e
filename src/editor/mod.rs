//! Editor
//!
//! Thin glue between the tool's panels and the project runtime. Panels
//! emit `EditorAction`s; the main loop applies them through the
//! runtime's public API and reports the outcome on the status line.

pub mod panels;
pub mod state;

pub use state::EditorState;

use macroquad::prelude::*;

use crate::components::graphics::DrawList;
use crate::defs::{AssetType, Uuid};
use crate::runtime::ProjectRuntime;
use crate::ui::{theme, widgets, Rect, UiContext};

/// What a panel asked the main loop to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    None,
    SelectScene(Uuid),
    SelectEntity(Uuid),
    AddScene(Uuid),
    ActivateScene(Uuid),
    DeactivateScene(Uuid),
    DestroyScene(Uuid),
    ReloadAsset(AssetType, Uuid),
    ClearCaches,
}

/// Draw all panels around the viewport; returns the first action
/// triggered this frame.
pub fn draw_editor(
    ctx: &UiContext,
    content: Rect,
    project: &ProjectRuntime,
    state: &mut EditorState,
    show_caches: bool,
    show_inspector: bool,
) -> EditorAction {
    let (left, rest) = content.split_left(240.0);
    let (center, right) = rest.split_right(300.0);

    let mut action = panels::draw_scene_panel(ctx, left, project, state);

    draw_viewport(center, project.draw_list());

    if show_caches || show_inspector {
        let (top, bottom) = if show_caches && show_inspector {
            let (top, bottom) = right.split_top(right.h * 0.5);
            (Some(top), Some(bottom))
        } else if show_caches {
            (Some(right), None)
        } else {
            (None, Some(right))
        };
        if let Some(top) = top {
            let cache_action = panels::draw_cache_panel(ctx, top, project);
            if action == EditorAction::None {
                action = cache_action;
            }
        }
        if let Some(bottom) = bottom {
            let inspector_action = panels::draw_inspector_panel(ctx, bottom, project, state);
            if action == EditorAction::None {
                action = inspector_action;
            }
        }
    }

    action
}

/// Draw the active scene's submitted frame into the center area.
fn draw_viewport(rect: Rect, draw_list: &DrawList) {
    let [r, g, b, a] = draw_list.clear_color;
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, Color::new(r, g, b, a.max(1.0)));

    if draw_list.view.is_none() {
        // Empty default frame: no scene is active
        widgets::label(
            rect.pad(8.0),
            "no active scene",
            theme::TEXT_DIM,
        );
        return;
    }

    set_camera(&Camera3D {
        position: draw_list.camera_position,
        target: draw_list.camera_target,
        up: macroquad::math::Vec3::Y,
        fovy: draw_list.camera_fov_degrees.to_radians(),
        ..Default::default()
    });

    // Ground grid for orientation
    let grid_color = Color::new(0.3, 0.3, 0.35, 1.0);
    for i in -10..=10 {
        let i = i as f32;
        draw_line_3d(vec3(i, 0.0, -10.0), vec3(i, 0.0, 10.0), grid_color);
        draw_line_3d(vec3(-10.0, 0.0, i), vec3(10.0, 0.0, i), grid_color);
    }

    for call in &draw_list.calls {
        let [r, g, b, a] = call.color;
        draw_cube_wires(
            call.bounding_box.center(),
            call.bounding_box.size(),
            Color::new(r, g, b, a),
        );
    }

    set_default_camera();
}

/// Status strip along the bottom: frame timing, faults, status message.
pub fn draw_status_bar(
    rect: Rect,
    project: &ProjectRuntime,
    state: &mut EditorState,
    now: f64,
) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme::HEADER_COLOR);
    let profile = project.frame_profile();
    let mut text = format!(
        "frame {} | {:.2} ms | {} runtime(s) cached",
        profile.frame,
        profile.total_millis(),
        project.caches().total_runtime_count()
    );
    if profile.fault_count() > 0 {
        text.push_str(&format!(" | {} fault(s)", profile.fault_count()));
    }
    if let Some(status) = state.status(now) {
        text.push_str(" | ");
        text.push_str(status);
    }
    widgets::label(rect, &text, theme::TEXT_COLOR);
}
