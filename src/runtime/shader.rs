//! Shader Runtime
//!
//! Holds the vertex and fragment source for a shader definition. Actual
//! GPU compilation belongs to the renderer backend; the runtime tracks
//! whether usable source is present and supports in-place reload so an
//! edited shader can be picked up without changing cache identity.

#![allow(dead_code)]

use crate::defs::{AssetAttributes, AssetDefinition};
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

pub struct ShaderRuntime {
    shared: SharedRuntime,
    vertex_source: String,
    fragment_source: String,
}

impl ShaderRuntime {
    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    fn load_into(&mut self, definition: &AssetDefinition, storage: &Storage) {
        let AssetAttributes::Shader {
            vertex_path,
            fragment_path,
        } = &definition.attributes
        else {
            self.shared.mark_failed("definition is not a shader");
            return;
        };
        let vertex = match storage.read_to_string(vertex_path) {
            Ok(src) => src,
            Err(e) => {
                self.shared.mark_failed(format!("vertex: {}", e));
                return;
            }
        };
        let fragment = match storage.read_to_string(fragment_path) {
            Ok(src) => src,
            Err(e) => {
                self.shared.mark_failed(format!("fragment: {}", e));
                return;
            }
        };
        if vertex.trim().is_empty() || fragment.trim().is_empty() {
            self.shared.mark_failed("empty shader source");
            return;
        }
        self.vertex_source = vertex;
        self.fragment_source = fragment;
        self.shared.mark_loaded();
    }
}

impl AssetRuntime for ShaderRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            vertex_source: String::new(),
            fragment_source: String::new(),
        };
        runtime.load_into(definition, storage);
        runtime
    }

    fn reload(&mut self, definition: &AssetDefinition, storage: &Storage) {
        self.shared.reset_for_reload();
        self.vertex_source.clear();
        self.fragment_source.clear();
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

    fn shader_def() -> AssetDefinition {
        AssetDefinition::new(
            "s",
            AssetAttributes::Shader {
                vertex_path: "v.vert".to_string(),
                fragment_path: "f.frag".to_string(),
            },
        )
    }

    #[test]
    fn load_requires_both_stages() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("v.vert", b"void main() {}").unwrap();

        let runtime = ShaderRuntime::load(&shader_def(), &storage);
        assert!(runtime.shared().load_error());

        storage.write("f.frag", b"void main() {}").unwrap();
        let runtime = ShaderRuntime::load(&shader_def(), &storage);
        assert!(runtime.shared().loaded());
    }

    #[test]
    fn reload_recomputes_state_in_place() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        let def = shader_def();

        let mut runtime = ShaderRuntime::load(&def, &storage);
        assert!(runtime.shared().load_error());

        storage.write("v.vert", b"void main() {}").unwrap();
        storage.write("f.frag", b"void main() {}").unwrap();
        runtime.shared_mut().set_reload_flag(true);
        runtime.reload(&def, &storage);

        assert!(runtime.shared().loaded());
        assert!(!runtime.shared().load_error());
        assert!(!runtime.shared().reload_flag());
    }
}
