//! Editor State
//!
//! Selection and status line shared by all panels. Pure data; panels
//! read and write it, the main loop owns it.

use crate::defs::Uuid;

#[derive(Debug, Default)]
pub struct EditorState {
    pub selected_scene: Option<Uuid>,
    pub selected_entity: Option<Uuid>,

    /// Status message and the time it expires at
    status: Option<(String, f64)>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a status message for `duration` seconds
    pub fn set_status(&mut self, message: &str, duration: f64, now: f64) {
        self.status = Some((message.to_string(), now + duration));
    }

    /// Current status message, if it has not expired
    pub fn status(&mut self, now: f64) -> Option<&str> {
        if let Some((_, until)) = self.status {
            if now > until {
                self.status = None;
            }
        }
        self.status.as_ref().map(|(message, _)| message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_expires() {
        let mut state = EditorState::new();
        state.set_status("saved", 2.0, 10.0);
        assert_eq!(state.status(11.0), Some("saved"));
        assert_eq!(state.status(12.5), None);
    }
}
