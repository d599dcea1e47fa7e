//! Runtimes
//!
//! The loaded, executable side of the definitions: asset runtimes owned by
//! per-type caches, entity runtimes owned by their scene, scene runtimes
//! owned by the project. Load failures are recorded on the runtime object
//! rather than propagated, so a broken asset degrades what it touches and
//! nothing else.

#![allow(dead_code)]

pub mod audio;
pub mod cache;
pub mod caches;
pub mod entity;
pub mod font;
pub mod material;
pub mod model;
pub mod project;
pub mod scene;
pub mod script;
pub mod shader;
pub mod texture;

pub use cache::Cache;
pub use caches::AssetCaches;
pub use entity::EntityRuntime;
pub use project::ProjectRuntime;
pub use scene::{SceneRuntime, SceneState};

use std::fmt;

use crate::defs::{AssetDefinition, Uuid};
use crate::storage::Storage;

/// Flags and identity shared by every asset runtime.
///
/// `loaded` and `load_error` are mutually exclusive in practice; callers
/// must check them before using the runtime's payload. `reload_flag` is
/// the only way to re-attempt a failed load.
#[derive(Debug, Clone)]
pub struct SharedRuntime {
    uuid: Uuid,
    name: String,
    loaded: bool,
    load_error: bool,
    reload_flag: bool,
    error: Option<String>,
}

impl SharedRuntime {
    pub fn new(definition: &AssetDefinition) -> Self {
        Self {
            uuid: definition.uuid,
            name: definition.name.clone(),
            loaded: false,
            load_error: false,
            reload_flag: false,
            error: None,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn load_error(&self) -> bool {
        self.load_error
    }

    pub fn reload_flag(&self) -> bool {
        self.reload_flag
    }

    /// Request a reload on the next update pass
    pub fn set_reload_flag(&mut self, flag: bool) {
        self.reload_flag = flag;
    }

    /// Last recorded load error message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record a successful load
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
        self.load_error = false;
        self.error = None;
    }

    /// Record a failed load; the runtime stays registered but inert
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: load failed: {}", self.name, message);
        self.loaded = false;
        self.load_error = true;
        self.error = Some(message);
    }

    /// Reset flags before a reload attempt
    pub fn reset_for_reload(&mut self) {
        self.loaded = false;
        self.load_error = false;
        self.reload_flag = false;
        self.error = None;
    }
}

/// A cached, shared runtime built from an asset definition.
///
/// `load` never fails at the call site: a broken payload produces a
/// runtime with `load_error` set, which the cache registers like any
/// other so the load is not re-attempted every frame.
pub trait AssetRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self
    where
        Self: Sized;

    /// Rebuild internal state in place, keeping cache identity
    fn reload(&mut self, definition: &AssetDefinition, storage: &Storage);

    fn shared(&self) -> &SharedRuntime;

    fn shared_mut(&mut self) -> &mut SharedRuntime;
}

/// Error type for runtime lifecycle operations
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Cache clear refused while scenes are loaded or active
    ScenesStillLoaded { count: usize },
    /// No scene runtime or scene definition with this uuid
    UnknownScene(Uuid),
    /// A state change that the scene lifecycle does not allow
    InvalidTransition { from: SceneState, to: SceneState },
    /// Scene is not in a state the operation requires
    SceneNotReady { uuid: Uuid, state: SceneState },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::ScenesStillLoaded { count } => {
                write!(f, "{} scene(s) still loaded or active", count)
            }
            RuntimeError::UnknownScene(uuid) => {
                write!(f, "unknown scene {}", crate::defs::format_uuid(*uuid))
            }
            RuntimeError::InvalidTransition { from, to } => {
                write!(f, "invalid scene transition {} -> {}", from, to)
            }
            RuntimeError::SceneNotReady { uuid, state } => write!(
                f,
                "scene {} is {}, operation needs a loaded scene",
                crate::defs::format_uuid(*uuid),
                state
            ),
        }
    }
}

impl std::error::Error for RuntimeError {}
