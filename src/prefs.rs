//! Editor Preferences
//!
//! Small per-user settings persisted as RON under the platform config
//! directory. Losing this file costs nothing but convenience, so load
//! failures fall back to defaults and only log.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory name under the user config root
const PREFS_DIR: &str = "dream-tool";
/// Preferences file name
const PREFS_FILE: &str = "prefs.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorPrefs {
    /// Project directory opened last time
    #[serde(default)]
    pub last_project: Option<PathBuf>,

    /// Show the cache contents panel
    #[serde(default = "default_true")]
    pub show_caches: bool,

    /// Show the entity inspector panel
    #[serde(default = "default_true")]
    pub show_inspector: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EditorPrefs {
    fn default() -> Self {
        Self {
            last_project: None,
            show_caches: true,
            show_inspector: true,
        }
    }
}

impl EditorPrefs {
    fn prefs_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PREFS_DIR).join(PREFS_FILE))
    }

    /// Load preferences, falling back to defaults on any failure
    pub fn load() -> Self {
        let Some(path) = Self::prefs_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => match ron::from_str(&text) {
                Ok(prefs) => prefs,
                Err(e) => {
                    log::warn!("prefs: parse failed, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist preferences; failures only log
    pub fn save(&self) {
        let Some(path) = Self::prefs_path() else {
            return;
        };
        let text = match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("prefs: serialize failed: {}", e);
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("prefs: cannot create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, text) {
            log::warn!("prefs: save failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefs_round_trip_through_ron() {
        let prefs = EditorPrefs {
            last_project: Some(PathBuf::from("/tmp/proj")),
            show_caches: false,
            show_inspector: true,
        };
        let text = ron::ser::to_string_pretty(&prefs, ron::ser::PrettyConfig::default()).unwrap();
        let back: EditorPrefs = ron::from_str(&text).unwrap();
        assert_eq!(back.last_project, prefs.last_project);
        assert!(!back.show_caches);
    }
}
