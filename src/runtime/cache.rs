//! Asset Runtime Cache
//!
//! One cache per asset kind. The cache owns every runtime it constructs
//! and guarantees at most one runtime per definition uuid: a second
//! lookup for the same definition returns the first construction, even
//! when both happen during a single scene load. Entities hold uuids into
//! the cache, never owning references.

#![allow(dead_code)]

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::defs::{format_uuid, AssetDefinition, ProjectDefinition, Uuid};
use crate::storage::Storage;

use super::AssetRuntime;

/// Registry of shared runtimes for one asset kind.
pub struct Cache<T> {
    /// Runtimes keyed by definition uuid
    runtimes: HashMap<Uuid, T>,
    /// Uuids in construction order, for stable panel display
    order: Vec<Uuid>,
    /// Total constructions since the cache was created
    constructions: u64,
}

impl<T: AssetRuntime> Cache<T> {
    pub fn new() -> Self {
        Self {
            runtimes: HashMap::new(),
            order: Vec::new(),
            constructions: 0,
        }
    }

    /// Get the runtime for a definition, constructing it on first request.
    ///
    /// Construction failure still registers the runtime (with its
    /// `load_error` flag set) so repeated lookups do not retry the load;
    /// a retry only happens through the runtime's own reload flag.
    pub fn get_runtime(&mut self, definition: &AssetDefinition, storage: &Storage) -> &mut T {
        match self.runtimes.entry(definition.uuid) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(slot) => {
                log::debug!(
                    "cache: constructing {} runtime for {} ({})",
                    definition.asset_type().label(),
                    definition.name,
                    format_uuid(definition.uuid)
                );
                self.order.push(definition.uuid);
                self.constructions += 1;
                slot.insert(T::load(definition, storage))
            }
        }
    }

    /// Remove and drop the runtime for a definition. No-op when absent.
    pub fn remove_runtime(&mut self, definition: &AssetDefinition) {
        self.remove_by_uuid(definition.uuid);
    }

    /// Remove and drop the runtime with this uuid. No-op when absent.
    pub fn remove_by_uuid(&mut self, uuid: Uuid) {
        if self.runtimes.remove(&uuid).is_some() {
            self.order.retain(|u| *u != uuid);
            log::debug!("cache: removed runtime {}", format_uuid(uuid));
        }
    }

    /// Drop every runtime. Callers guard against clearing while a scene
    /// still references this cache.
    pub fn clear(&mut self) {
        self.runtimes.clear();
        self.order.clear();
    }

    pub fn contains(&self, uuid: Uuid) -> bool {
        self.runtimes.contains_key(&uuid)
    }

    pub fn get_by_uuid(&self, uuid: Uuid) -> Option<&T> {
        self.runtimes.get(&uuid)
    }

    pub fn get_mut_by_uuid(&mut self, uuid: Uuid) -> Option<&mut T> {
        self.runtimes.get_mut(&uuid)
    }

    pub fn runtime_count(&self) -> usize {
        self.runtimes.len()
    }

    /// Runtimes in construction order
    pub fn runtimes(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|uuid| self.runtimes.get(uuid))
    }

    pub fn runtimes_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.runtimes.values_mut()
    }

    /// Constructions performed over the cache's lifetime
    pub fn constructions(&self) -> u64 {
        self.constructions
    }

    /// Re-run loads for every runtime whose reload flag is set.
    ///
    /// Reload happens in place: the runtime keeps its cache slot and
    /// uuid, only its internal state and flags are recomputed. A runtime
    /// whose definition has vanished from the project is marked failed.
    pub fn process_reloads(&mut self, project: &ProjectDefinition, storage: &Storage) {
        for uuid in self.order.clone() {
            let Some(runtime) = self.runtimes.get_mut(&uuid) else {
                continue;
            };
            if !runtime.shared().reload_flag() {
                continue;
            }
            match project.asset_definition(uuid) {
                Some(definition) => {
                    log::debug!("cache: reloading {}", format_uuid(uuid));
                    runtime.reload(definition, storage);
                }
                None => {
                    runtime.shared_mut().set_reload_flag(false);
                    runtime
                        .shared_mut()
                        .mark_failed("definition no longer in project");
                }
            }
        }
    }
}

impl<T: AssetRuntime> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::AssetAttributes;
    use crate::runtime::script::ScriptRuntime;
    use crate::runtime::AssetRuntime;
    use tempfile::TempDir;

    fn script_def(path: &str) -> AssetDefinition {
        AssetDefinition::new(
            "test script",
            AssetAttributes::Script {
                path: path.to_string(),
            },
        )
    }

    #[test]
    fn repeated_lookups_construct_once() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("s.rhai", b"fn on_update(e, dt) {}").unwrap();

        let mut cache: Cache<ScriptRuntime> = Cache::new();
        let def = script_def("s.rhai");
        for _ in 0..5 {
            let runtime = cache.get_runtime(&def, &storage);
            assert_eq!(runtime.shared().uuid(), def.uuid);
        }
        assert_eq!(cache.runtime_count(), 1);
        assert_eq!(cache.constructions(), 1);
    }

    #[test]
    fn failed_load_is_registered_and_not_retried() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());

        let mut cache: Cache<ScriptRuntime> = Cache::new();
        let def = script_def("missing.rhai");
        assert!(cache.get_runtime(&def, &storage).shared().load_error());
        // Create the file afterwards; without a reload flag the failed
        // runtime must be reused as-is.
        storage.write("missing.rhai", b"fn on_update(e, dt) {}").unwrap();
        assert!(cache.get_runtime(&def, &storage).shared().load_error());
        assert_eq!(cache.constructions(), 1);
    }

    #[test]
    fn remove_is_idempotent_and_allows_fresh_construction() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("s.rhai", b"fn on_update(e, dt) {}").unwrap();

        let mut cache: Cache<ScriptRuntime> = Cache::new();
        let def = script_def("s.rhai");
        cache.get_runtime(&def, &storage);
        cache.remove_runtime(&def);
        cache.remove_runtime(&def);
        assert_eq!(cache.runtime_count(), 0);

        cache.get_runtime(&def, &storage);
        assert_eq!(cache.runtime_count(), 1);
        assert_eq!(cache.constructions(), 2);
    }

    #[test]
    fn reload_flag_retries_in_place() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());

        let mut project = ProjectDefinition::new("p");
        let def = script_def("late.rhai");
        project.assets.push(def.clone());

        let mut cache: Cache<ScriptRuntime> = Cache::new();
        cache.get_runtime(&def, &storage);
        assert!(cache.get_by_uuid(def.uuid).unwrap().shared().load_error());

        storage.write("late.rhai", b"fn on_update(e, dt) {}").unwrap();
        cache
            .get_mut_by_uuid(def.uuid)
            .unwrap()
            .shared_mut()
            .set_reload_flag(true);
        cache.process_reloads(&project, &storage);

        let runtime = cache.get_by_uuid(def.uuid).unwrap();
        assert!(runtime.shared().loaded());
        assert!(!runtime.shared().reload_flag());
        // Identity preserved: still a single runtime, no new construction
        assert_eq!(cache.runtime_count(), 1);
        assert_eq!(cache.constructions(), 1);
    }
}
