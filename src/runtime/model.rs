//! Model Runtime
//!
//! Loaded form of a model definition: the raw mesh payload plus the
//! bounding box entities inherit. Mesh decoding beyond the payload read
//! is left to the renderer backend.

#![allow(dead_code)]

use macroquad::math::Vec3;

use crate::defs::{AssetAttributes, AssetDefinition};
use crate::math::BoundingBox;
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

pub struct ModelRuntime {
    shared: SharedRuntime,
    payload: Vec<u8>,
    bounding_box: BoundingBox,
}

impl ModelRuntime {
    /// Bounding box from the definition's half extents
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Size of the mesh payload in bytes
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    fn load_into(&mut self, definition: &AssetDefinition, storage: &Storage) {
        let AssetAttributes::Model { path, half_extents } = &definition.attributes else {
            self.shared.mark_failed("definition is not a model");
            return;
        };
        self.bounding_box = BoundingBox::from_half_extents(Vec3::from_array(*half_extents));
        match storage.read(path) {
            Ok(bytes) if bytes.is_empty() => {
                self.shared.mark_failed(format!("empty model payload: {}", path));
            }
            Ok(bytes) => {
                self.payload = bytes;
                self.shared.mark_loaded();
            }
            Err(e) => self.shared.mark_failed(e.to_string()),
        }
    }
}

impl AssetRuntime for ModelRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            payload: Vec::new(),
            bounding_box: BoundingBox::UNIT,
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
    use crate::defs::AssetAttributes;
    use tempfile::TempDir;

    #[test]
    fn load_reads_payload_and_extents() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("m.obj", b"v 0 0 0").unwrap();

        let def = AssetDefinition::new(
            "m",
            AssetAttributes::Model {
                path: "m.obj".to_string(),
                half_extents: [1.0, 2.0, 3.0],
            },
        );
        let runtime = ModelRuntime::load(&def, &storage);
        assert!(runtime.shared().loaded());
        assert_eq!(runtime.payload_size(), 7);
        assert_eq!(runtime.bounding_box().half_extents(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn missing_payload_marks_error() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        let def = AssetDefinition::new(
            "m",
            AssetAttributes::Model {
                path: "gone.obj".to_string(),
                half_extents: [0.5; 3],
            },
        );
        let runtime = ModelRuntime::load(&def, &storage);
        assert!(runtime.shared().load_error());
        assert!(runtime.shared().error().is_some());
    }
}
