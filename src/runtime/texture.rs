//! Texture Runtime
//!
//! Decodes the referenced image file into RGBA8 pixels. The renderer
//! backend uploads these to the GPU when it draws; the runtime only
//! holds the decoded payload and its dimensions.

#![allow(dead_code)]

use crate::defs::{AssetAttributes, AssetDefinition};
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

pub struct TextureRuntime {
    shared: SharedRuntime,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureRuntime {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    fn load_into(&mut self, definition: &AssetDefinition, storage: &Storage) {
        let AssetAttributes::Texture { path } = &definition.attributes else {
            self.shared.mark_failed("definition is not a texture");
            return;
        };
        let bytes = match storage.read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.shared.mark_failed(e.to_string());
                return;
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                self.width = rgba.width();
                self.height = rgba.height();
                self.rgba = rgba.into_raw();
                self.shared.mark_loaded();
            }
            Err(e) => self.shared.mark_failed(format!("decode: {}", e)),
        }
    }
}

impl AssetRuntime for TextureRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            width: 0,
            height: 0,
            rgba: Vec::new(),
        };
        runtime.load_into(definition, storage);
        runtime
    }

    fn reload(&mut self, definition: &AssetDefinition, storage: &Storage) {
        self.shared.reset_for_reload();
        self.rgba.clear();
        self.width = 0;
        self.height = 0;
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

    // 1x1 white PNG
    const WHITE_PX: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0xF8, 0xFF, 0xFF, 0xFF, 0x7F, 0x00, 0x09, 0xFB, 0x03, 0xFD, 0x2A, 0x86,
        0xE3, 0x8A, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn decodes_dimensions_and_pixels() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("t.png", WHITE_PX).unwrap();

        let def = AssetDefinition::new(
            "t",
            AssetAttributes::Texture {
                path: "t.png".to_string(),
            },
        );
        let runtime = TextureRuntime::load(&def, &storage);
        assert!(runtime.shared().loaded());
        assert_eq!((runtime.width(), runtime.height()), (1, 1));
        assert_eq!(runtime.rgba(), &[255, 255, 255, 255]);
    }

    #[test]
    fn garbage_bytes_mark_error() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("t.png", b"not an image").unwrap();

        let def = AssetDefinition::new(
            "t",
            AssetAttributes::Texture {
                path: "t.png".to_string(),
            },
        );
        let runtime = TextureRuntime::load(&def, &storage);
        assert!(runtime.shared().load_error());
    }
}
