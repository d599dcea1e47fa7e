//! Entity Definitions
//!
//! A scene's content is a tree of entity definitions. Each node carries a
//! local transform and the uuids of the assets the entity uses; children
//! are nested inline so the JSON mirrors the scenegraph.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use super::{generate_uuid, TransformDef, Uuid};

/// One node of a scene's entity tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    #[serde(default = "generate_uuid")]
    pub uuid: Uuid,

    pub name: String,

    /// Local transform relative to the parent entity
    #[serde(default)]
    pub transform: TransformDef,

    /// Uuids of asset definitions this entity uses (at most one per kind)
    #[serde(default)]
    pub assets: Vec<Uuid>,

    /// Child entities, instantiated after this one
    #[serde(default)]
    pub children: Vec<EntityDefinition>,
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: generate_uuid(),
            name: name.into(),
            transform: TransformDef::default(),
            assets: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Number of entities in this subtree, including self
    pub fn count_recursive(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(EntityDefinition::count_recursive)
            .sum::<usize>()
    }

    /// Depth-first walk over the subtree, parents before children
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a EntityDefinition)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_includes_nested_children() {
        let mut root = EntityDefinition::new("root");
        let mut a = EntityDefinition::new("a");
        a.children.push(EntityDefinition::new("a1"));
        root.children.push(a);
        root.children.push(EntityDefinition::new("b"));
        assert_eq!(root.count_recursive(), 4);
    }

    #[test]
    fn walk_visits_parents_first() {
        let mut root = EntityDefinition::new("root");
        let mut a = EntityDefinition::new("a");
        a.children.push(EntityDefinition::new("a1"));
        root.children.push(a);

        let mut names = Vec::new();
        root.walk(&mut |def| names.push(def.name.clone()));
        assert_eq!(names, vec!["root", "a", "a1"]);
    }
}
