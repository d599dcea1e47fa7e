//! Audio Runtime
//!
//! Playback state for one audio definition. Play, pause, and stop are
//! queued as actions and drained once per frame by the audio subsystem,
//! so scripts and editor buttons can request playback at any point in
//! the frame without racing the device backend.

#![allow(dead_code)]

use crate::defs::{AssetAttributes, AssetDefinition};
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

/// Current playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl AudioStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AudioStatus::Stopped => "Stopped",
            AudioStatus::Playing => "Playing",
            AudioStatus::Paused => "Paused",
        }
    }
}

/// Queued playback request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    Play,
    Pause,
    Stop,
}

pub struct AudioRuntime {
    shared: SharedRuntime,
    payload_size: usize,
    looping: bool,
    volume: f32,
    status: AudioStatus,
    queued: Vec<AudioAction>,
}

impl AudioRuntime {
    pub fn status(&self) -> AudioStatus {
        self.status
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn payload_size(&self) -> usize {
        self.payload_size
    }

    pub fn mark_to_play(&mut self) {
        self.queued.push(AudioAction::Play);
    }

    pub fn mark_to_pause(&mut self) {
        self.queued.push(AudioAction::Pause);
    }

    pub fn mark_to_stop(&mut self) {
        self.queued.push(AudioAction::Stop);
    }

    pub fn queued_actions(&self) -> usize {
        self.queued.len()
    }

    /// Drain queued actions into status transitions. Returns how many
    /// actions were applied; invalid requests (pausing a stopped sound)
    /// are dropped.
    pub fn drain_actions(&mut self) -> usize {
        let mut applied = 0;
        for action in std::mem::take(&mut self.queued) {
            let next = match (self.status, action) {
                (_, AudioAction::Stop) => Some(AudioStatus::Stopped),
                (AudioStatus::Playing, AudioAction::Pause) => Some(AudioStatus::Paused),
                (AudioStatus::Stopped, AudioAction::Play)
                | (AudioStatus::Paused, AudioAction::Play) => Some(AudioStatus::Playing),
                _ => None,
            };
            if let Some(next) = next {
                if next != self.status {
                    log::debug!(
                        "audio {}: {} -> {}",
                        self.shared.name(),
                        self.status.label(),
                        next.label()
                    );
                }
                self.status = next;
                applied += 1;
            }
        }
        applied
    }

    fn load_into(&mut self, definition: &AssetDefinition, storage: &Storage) {
        let AssetAttributes::Audio {
            path,
            looping,
            volume,
        } = &definition.attributes
        else {
            self.shared.mark_failed("definition is not audio");
            return;
        };
        self.looping = *looping;
        self.volume = *volume;
        match storage.read(path) {
            Ok(bytes) => {
                self.payload_size = bytes.len();
                self.shared.mark_loaded();
            }
            Err(e) => self.shared.mark_failed(e.to_string()),
        }
    }
}

impl AssetRuntime for AudioRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            payload_size: 0,
            looping: false,
            volume: 1.0,
            status: AudioStatus::Stopped,
            queued: Vec::new(),
        };
        runtime.load_into(definition, storage);
        runtime
    }

    fn reload(&mut self, definition: &AssetDefinition, storage: &Storage) {
        self.shared.reset_for_reload();
        self.status = AudioStatus::Stopped;
        self.queued.clear();
        self.payload_size = 0;
        self.load_into(definition, storage);
    }

    fn shared(&self) -> &SharedRuntime {
        &self.shared
    }

    fn shared_mut(&mut self) -> &mut SharedRuntime {
        &mut self.shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loaded_runtime() -> AudioRuntime {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("a.wav", &[0u8; 64]).unwrap();
        let def = AssetDefinition::new(
            "a",
            AssetAttributes::Audio {
                path: "a.wav".to_string(),
                looping: true,
                volume: 0.5,
            },
        );
        AudioRuntime::load(&def, &storage)
    }

    #[test]
    fn play_pause_stop_transitions() {
        let mut runtime = loaded_runtime();
        assert_eq!(runtime.status(), AudioStatus::Stopped);

        runtime.mark_to_play();
        runtime.drain_actions();
        assert_eq!(runtime.status(), AudioStatus::Playing);

        runtime.mark_to_pause();
        runtime.drain_actions();
        assert_eq!(runtime.status(), AudioStatus::Paused);

        runtime.mark_to_stop();
        runtime.drain_actions();
        assert_eq!(runtime.status(), AudioStatus::Stopped);
    }

    #[test]
    fn pausing_a_stopped_sound_is_dropped() {
        let mut runtime = loaded_runtime();
        runtime.mark_to_pause();
        assert_eq!(runtime.drain_actions(), 0);
        assert_eq!(runtime.status(), AudioStatus::Stopped);
    }
}
