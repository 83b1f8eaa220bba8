//! Study groups and their parent/sub-group hierarchy.
//!
//! Groups live in an arena keyed by group id. Parent and child links are ids,
//! not references, and every walk keeps a visited set, so a malformed cycle in
//! the source (`A` declared a sub-group of `B` and `B` of `A`) terminates.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

impl Group {
    /// A group with no relations; its name doubles as its id.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupTree {
    groups: IndexMap<String, Group>,
}

impl GroupTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group unless one with the same id already exists.
    pub fn insert(&mut self, group: Group) {
        self.groups.entry(group.id.clone()).or_insert(group);
    }

    /// Make `parent` the parent of `child`. Both must already be in the tree.
    pub fn link(&mut self, child: &str, parent: &str) -> bool {
        if child == parent || !self.groups.contains_key(child) {
            return false;
        }
        let Some(parent_group) = self.groups.get_mut(parent) else {
            return false;
        };
        if !parent_group.children.iter().any(|c| c == child) {
            parent_group.children.push(child.to_string());
        }
        if let Some(child_group) = self.groups.get_mut(child) {
            child_group.parent = Some(parent.to_string());
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Groups without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Group> {
        self.groups.values().filter(|g| g.parent.is_none())
    }

    /// Parent, grandparent, ... nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<&Group> {
        let mut visited = HashSet::from([id]);
        let mut out = Vec::new();
        let mut current = self.groups.get(id).and_then(|g| g.parent.as_deref());

        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = self.groups.get(parent_id) else {
                break;
            };
            out.push(parent);
            current = parent.parent.as_deref();
        }

        out
    }

    /// All sub-groups below `id`, depth first in declaration order.
    pub fn descendants(&self, id: &str) -> Vec<&Group> {
        let mut visited = HashSet::from([id]);
        let mut out = Vec::new();
        let mut stack: Vec<&str> = self
            .groups
            .get(id)
            .map(|g| g.children.iter().rev().map(String::as_str).collect())
            .unwrap_or_default();

        while let Some(child_id) = stack.pop() {
            if !visited.insert(child_id) {
                continue;
            }
            let Some(child) = self.groups.get(child_id) else {
                continue;
            };
            out.push(child);
            stack.extend(child.children.iter().rev().map(String::as_str));
        }

        out
    }
}
