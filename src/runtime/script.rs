//! Script Runtime
//!
//! Source plus compiled AST for a script definition. Loading reads the
//! source; compilation is deferred to the scripting subsystem, which owns
//! the engine. A compile error is recorded on the runtime like any other
//! load failure. The runtime also remembers which entities have run
//! their init entry point so it fires once per entity.

use std::collections::HashSet;

use rhai::AST;

use crate::defs::{AssetAttributes, AssetDefinition, Uuid};
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

pub struct ScriptRuntime {
    shared: SharedRuntime,
    source: String,
    ast: Option<AST>,
    initialized: HashSet<Uuid>,
}

impl ScriptRuntime {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> Option<&AST> {
        self.ast.as_ref()
    }

    pub fn has_ast(&self) -> bool {
        self.ast.is_some()
    }

    /// Store the compiled AST produced by the scripting subsystem
    pub fn set_ast(&mut self, ast: AST) {
        self.ast = Some(ast);
    }

    pub fn is_initialized(&self, entity: Uuid) -> bool {
        self.initialized.contains(&entity)
    }

    pub fn mark_initialized(&mut self, entity: Uuid) {
        self.initialized.insert(entity);
    }

    /// Forget init marks, e.g. when the owning scene is destroyed
    pub fn reset_initialized(&mut self) {
        self.initialized.clear();
    }

    fn load_into(&mut self, definition: &AssetDefinition, storage: &Storage) {
        let AssetAttributes::Script { path } = &definition.attributes else {
            self.shared.mark_failed("definition is not a script");
            return;
        };
        match storage.read_to_string(path) {
            Ok(source) => {
                self.source = source;
                self.shared.mark_loaded();
            }
            Err(e) => self.shared.mark_failed(e.to_string()),
        }
    }
}

impl AssetRuntime for ScriptRuntime {
    fn load(definition: &AssetDefinition, storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            source: String::new(),
            ast: None,
            initialized: HashSet::new(),
        };
        runtime.load_into(definition, storage);
        runtime
    }

    fn reload(&mut self, definition: &AssetDefinition, storage: &Storage) {
        self.shared.reset_for_reload();
        self.source.clear();
        self.ast = None;
        self.initialized.clear();
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
    fn load_reads_source_without_compiling() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("s.rhai", b"fn on_update(e, dt) {}").unwrap();

        let def = AssetDefinition::new(
            "s",
            AssetAttributes::Script {
                path: "s.rhai".to_string(),
            },
        );
        let runtime = ScriptRuntime::load(&def, &storage);
        assert!(runtime.shared().loaded());
        assert!(!runtime.has_ast());
        assert!(runtime.source().contains("on_update"));
    }

    #[test]
    fn reload_discards_compiled_state() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("s.rhai", b"fn on_update(e, dt) {}").unwrap();

        let def = AssetDefinition::new(
            "s",
            AssetAttributes::Script {
                path: "s.rhai".to_string(),
            },
        );
        let mut runtime = ScriptRuntime::load(&def, &storage);
        runtime.set_ast(rhai::Engine::new().compile(runtime.source()).unwrap());
        runtime.mark_initialized(42);

        runtime.reload(&def, &storage);
        assert!(!runtime.has_ast());
        assert!(!runtime.is_initialized(42));
        assert!(runtime.shared().loaded());
    }
}
