//! Font Runtime
//!
//! Holds the raw font payload and point size for text-displaying
//! entities. Glyph rasterization is the renderer backend's job.

#![allow(dead_code)]

use crate::defs::{AssetAttributes, AssetDefinition};
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

/// Smallest plausible font file; anything shorter is rejected outright
const MIN_FONT_BYTES: usize = 12;

pub struct FontRuntime {
    shared: SharedRuntime,
    payload: Vec<u8>,
    size: f32,
}

impl FontRuntime {
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn load_into(&mut self, definition: &AssetDefinition, storage: &Storage) {
        let AssetAttributes::Font { path, size } = &definition.attributes else {
            self.shared.mark_failed("definition is not a font");
            return;
        };
        self.size = *size;
        match storage.read(path) {
            Ok(bytes) if bytes.len() < MIN_FONT_BYTES => {
                self.shared.mark_failed(format!("font file too small: {}", path));
            }
            Ok(bytes) => {
                self.payload = bytes;
                self.shared.mark_loaded();
            }
            Err(e) => self.shared.mark_failed(e.to_string()),
        }
    }
}

impl AssetRuntime for FontRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            payload: Vec::new(),
            size: 0.0,
        };
        runtime.load_into(definition, storage);
        runtime
    }

    fn reload(&mut self, definition: &AssetDefinition, storage: &Storage) {
        self.shared.reset_for_reload();
        self.payload.clear();
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

    #[test]
    fn tiny_payload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("f.ttf", &[0u8; 4]).unwrap();

        let def = AssetDefinition::new(
            "f",
            AssetAttributes::Font {
                path: "f.ttf".to_string(),
                size: 14.0,
            },
        );
        let runtime = FontRuntime::load(&def, &storage);
        assert!(runtime.shared().load_error());
    }
}
