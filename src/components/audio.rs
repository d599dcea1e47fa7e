//! Audio Update
//!
//! Drains the play/pause/stop queues of every cached audio runtime once
//! per frame. Runs after scripting and physics because audio only
//! consumes state; nothing downstream reads it back this frame.

use crate::runtime::{AssetCaches, SceneRuntime};

use super::ComponentError;

#[derive(Debug, Default)]
pub struct AudioComponent;

impl AudioComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn update(
        &mut self,
        _scene: &mut SceneRuntime,
        caches: &mut AssetCaches,
    ) -> Result<(), ComponentError> {
        let mut applied = 0;
        for runtime in caches.audio.runtimes_mut() {
            applied += runtime.drain_actions();
        }
        if applied > 0 {
            log::trace!("audio: applied {} action(s)", applied);
        }
        Ok(())
    }
}
