//! Editor Panels
//!
//! Read-only views over the runtime's introspection API plus buttons
//! that route through the public lifecycle operations. Panels never
//! construct or destroy runtimes themselves; they emit actions the main
//! loop applies.

use macroquad::prelude::Color;

use crate::defs::{format_uuid, AssetType, Uuid};
use crate::runtime::{AssetRuntime, ProjectRuntime, SceneState, SharedRuntime};
use crate::ui::{theme, widgets, Rect, UiContext};

use super::state::EditorState;
use super::EditorAction;

fn state_color(state: SceneState) -> Color {
    match state {
        SceneState::Active => theme::OK_COLOR,
        SceneState::Loaded => theme::ACCENT_COLOR,
        SceneState::ToLoad => theme::PENDING_COLOR,
        SceneState::ToDestroy | SceneState::Destroyed => theme::ERROR_COLOR,
    }
}

/// Scene list with lifecycle buttons for the selected scene.
pub fn draw_scene_panel(
    ctx: &UiContext,
    rect: Rect,
    project: &ProjectRuntime,
    state: &mut EditorState,
) -> EditorAction {
    let mut action = EditorAction::None;
    let content = widgets::panel(rect, "Scenes");
    let mut cursor = content;

    for scene_def in &project.definition().scenes {
        let (row_rect, rest) = cursor.split_top(theme::ROW_HEIGHT);
        cursor = rest;
        let runtime = project.scene_runtime(scene_def.uuid);
        let selected = state.selected_scene == Some(scene_def.uuid);
        let label = match runtime {
            Some(runtime) => format!("{} [{}]", scene_def.name, runtime.state()),
            None => format!("{} [-]", scene_def.name),
        };
        let (badge_rect, text_rect) = row_rect.split_left(14.0);
        if let Some(runtime) = runtime {
            widgets::badge(badge_rect, "", state_color(runtime.state()));
        }
        if widgets::row(ctx, text_rect, &label, selected) {
            state.selected_scene = Some(scene_def.uuid);
            state.selected_entity = None;
            action = EditorAction::SelectScene(scene_def.uuid);
        }
    }

    // Lifecycle buttons for the selected scene
    if let Some(uuid) = state.selected_scene {
        let (_, buttons) = cursor.split_bottom(theme::ROW_HEIGHT * 2.0 + 6.0);
        let (top_row, bottom_row) = buttons.split_top(theme::ROW_HEIGHT);
        let half = top_row.w * 0.5 - 2.0;
        let (add_rect, rest) = top_row.split_left(half);
        let (_, activate_rect) = rest.split_left(4.0);
        if widgets::button(ctx, add_rect, "Load") {
            action = EditorAction::AddScene(uuid);
        }
        if widgets::button(ctx, activate_rect, "Activate") {
            action = EditorAction::ActivateScene(uuid);
        }
        let (_, bottom_row) = bottom_row.split_top(4.0);
        let (deactivate_rect, rest) = bottom_row.split_left(half);
        let (_, destroy_rect) = rest.split_left(4.0);
        if widgets::button(ctx, deactivate_rect, "Deactivate") {
            action = EditorAction::DeactivateScene(uuid);
        }
        if widgets::button(ctx, destroy_rect, "Destroy") {
            action = EditorAction::DestroyScene(uuid);
        }
    }

    action
}

/// One cache section: heading plus a row per runtime with its flags.
fn draw_cache_section<'a>(
    ctx: &UiContext,
    cursor: &mut Rect,
    label: &str,
    count: usize,
    constructions: u64,
    runtimes: impl Iterator<Item = &'a SharedRuntime>,
) -> Option<Uuid> {
    let mut clicked = None;
    let (heading, rest) = cursor.split_top(theme::ROW_HEIGHT);
    *cursor = rest;
    widgets::label(
        heading,
        &format!("{}: {} ({} built)", label, count, constructions),
        theme::TEXT_COLOR,
    );
    for shared in runtimes {
        let (row_rect, rest) = cursor.split_top(theme::ROW_HEIGHT);
        *cursor = rest;
        let (badge_rect, text_rect) = row_rect.split_left(14.0);
        let color = if shared.load_error() {
            theme::ERROR_COLOR
        } else if shared.loaded() {
            theme::OK_COLOR
        } else {
            theme::PENDING_COLOR
        };
        widgets::badge(badge_rect, "", color);
        let flags = if shared.load_error() {
            "error"
        } else if shared.reload_flag() {
            "reload"
        } else if shared.loaded() {
            "loaded"
        } else {
            "pending"
        };
        if widgets::row(ctx, text_rect, &format!("{} [{}]", shared.name(), flags), false) {
            clicked = Some(shared.uuid());
        }
    }
    clicked
}

/// Cache contents: per-type counts and per-runtime flags. Clicking a
/// runtime row flags it for reload on the next update pass.
pub fn draw_cache_panel(ctx: &UiContext, rect: Rect, project: &ProjectRuntime) -> EditorAction {
    let mut action = EditorAction::None;
    let content = widgets::panel(rect, "Cache Contents");
    let (list, clear_rect) = content.split_bottom(theme::ROW_HEIGHT);
    let mut cursor = list;

    let caches = project.caches();
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Models",
        caches.models.runtime_count(),
        caches.models.constructions(),
        caches.models.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Model, uuid);
    }
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Shaders",
        caches.shaders.runtime_count(),
        caches.shaders.constructions(),
        caches.shaders.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Shader, uuid);
    }
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Textures",
        caches.textures.runtime_count(),
        caches.textures.constructions(),
        caches.textures.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Texture, uuid);
    }
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Audio",
        caches.audio.runtime_count(),
        caches.audio.constructions(),
        caches.audio.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Audio, uuid);
    }
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Scripts",
        caches.scripts.runtime_count(),
        caches.scripts.constructions(),
        caches.scripts.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Script, uuid);
    }
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Fonts",
        caches.fonts.runtime_count(),
        caches.fonts.constructions(),
        caches.fonts.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Font, uuid);
    }
    if let Some(uuid) = draw_cache_section(
        ctx,
        &mut cursor,
        "Materials",
        caches.materials.runtime_count(),
        caches.materials.constructions(),
        caches.materials.runtimes().map(|r| r.shared()),
    ) {
        action = EditorAction::ReloadAsset(AssetType::Material, uuid);
    }

    if widgets::button(ctx, clear_rect, "Clear All Caches") {
        action = EditorAction::ClearCaches;
    }
    action
}

/// Entity tree of the selected scene plus details for the selection.
pub fn draw_inspector_panel(
    ctx: &UiContext,
    rect: Rect,
    project: &ProjectRuntime,
    state: &mut EditorState,
) -> EditorAction {
    let mut action = EditorAction::None;
    let content = widgets::panel(rect, "Inspector");
    let mut cursor = content;

    let Some(scene) = state.selected_scene.and_then(|uuid| project.scene_runtime(uuid)) else {
        widgets::label(
            cursor.split_top(theme::ROW_HEIGHT).0,
            "no scene selected",
            theme::TEXT_DIM,
        );
        return action;
    };

    // Entity tree, indented by depth
    for entity in scene.entities() {
        let (row_rect, rest) = cursor.split_top(theme::ROW_HEIGHT);
        cursor = rest;
        let mut depth = 0;
        let mut parent = entity.parent();
        while let Some(uuid) = parent {
            depth += 1;
            parent = scene.entity(uuid).and_then(|e| e.parent());
        }
        let (_, indented) = row_rect.split_left(depth as f32 * 12.0);
        let marker = if entity.has_load_error() { "!" } else { "" };
        let selected = state.selected_entity == Some(entity.uuid());
        if widgets::row(
            ctx,
            indented,
            &format!("{}{}", entity.name(), marker),
            selected,
        ) {
            state.selected_entity = Some(entity.uuid());
            action = EditorAction::SelectEntity(entity.uuid());
        }
    }

    // Selected entity details
    if let Some(entity) = state.selected_entity.and_then(|uuid| scene.entity(uuid)) {
        let mut line = |text: &str, color: Color| {
            let (row_rect, rest) = cursor.split_top(theme::ROW_HEIGHT);
            cursor = rest;
            widgets::label(row_rect, text, color);
        };
        line(&format!("uuid {}", format_uuid(entity.uuid())), theme::TEXT_DIM);
        let p = entity.transform.position;
        line(
            &format!("pos {:.2} {:.2} {:.2}", p.x, p.y, p.z),
            theme::TEXT_COLOR,
        );
        if let Some(model) = entity.model() {
            line(&format!("model {}", format_uuid(model)), theme::TEXT_DIM);
        }
        if let Some(script) = entity.script() {
            line(&format!("script {}", format_uuid(script)), theme::TEXT_DIM);
        }
        for error in entity.load_errors() {
            line(error, theme::ERROR_COLOR);
        }
    }

    action
}
