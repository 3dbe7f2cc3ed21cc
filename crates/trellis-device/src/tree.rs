//! The control tree
//!
//! Objects live in a tree of named roles rooted at handle 1. Children keep
//! insertion order; role-path lookup walks depth-first in that order, so
//! with duplicate roles the earliest-added object wins.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use trellis_core::{Command, Error, MethodId, ObjectHandle, Params, Result, Status};

use crate::traits::{Controller, Device, ResolvedObject};

/// Per-class behavior of a tree object
pub trait Behavior: Send + Sync {
    /// Class identifier, shared by all objects of this class
    fn class_id(&self) -> &'static str;

    /// Execute a method against this object
    fn execute(&self, method: MethodId, params: &Params) -> Status;
}

struct Node {
    role: String,
    behavior: Arc<dyn Behavior>,
    /// Child handles in insertion order
    children: Vec<ObjectHandle>,
}

/// An in-memory control tree
pub struct DeviceTree {
    nodes: DashMap<ObjectHandle, Node>,
    next_handle: Mutex<u32>,
}

impl DeviceTree {
    /// Create a tree containing only the root block
    pub fn new() -> Self {
        let nodes = DashMap::new();
        nodes.insert(
            ObjectHandle::ROOT,
            Node {
                role: "Root".to_string(),
                behavior: Arc::new(crate::actuators::Block),
                children: Vec::new(),
            },
        );

        Self {
            nodes,
            next_handle: Mutex::new(ObjectHandle::ROOT.0 + 1),
        }
    }

    /// The root block
    pub fn root(&self) -> ObjectHandle {
        ObjectHandle::ROOT
    }

    /// Add an object under `parent`
    pub fn add(
        &self,
        parent: ObjectHandle,
        role: &str,
        behavior: Arc<dyn Behavior>,
    ) -> Result<ObjectHandle> {
        if !self.nodes.contains_key(&parent) {
            return Err(Error::NotFound(format!("parent object {parent}")));
        }

        let handle = {
            let mut next = self.next_handle.lock();
            let handle = ObjectHandle(*next);
            *next += 1;
            handle
        };

        self.nodes.insert(
            handle,
            Node {
                role: role.to_string(),
                behavior,
                children: Vec::new(),
            },
        );

        // Parent existed above; re-check in case of concurrent removal
        match self.nodes.get_mut(&parent) {
            Some(mut node) => node.children.push(handle),
            None => {
                self.nodes.remove(&handle);
                return Err(Error::NotFound(format!("parent object {parent}")));
            }
        }

        Ok(handle)
    }

    /// Add a structural block under `parent`
    pub fn add_block(&self, parent: ObjectHandle, role: &str) -> Result<ObjectHandle> {
        self.add(parent, role, Arc::new(crate::actuators::Block))
    }

    /// All objects whose role path (relative to the root block) matches,
    /// in tree-traversal order.
    pub fn find_all_by_role_path(&self, path: &[String]) -> Vec<ResolvedObject> {
        let mut matches = Vec::new();
        if path.is_empty() {
            return matches;
        }

        // (object, how many leading path segments its own chain has matched)
        let mut stack: Vec<(ObjectHandle, usize)> = self
            .children_of(ObjectHandle::ROOT)
            .into_iter()
            .rev()
            .map(|h| (h, 0))
            .collect();

        while let Some((handle, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&handle) else {
                continue;
            };

            if node.role != path[depth] {
                continue;
            }

            if depth + 1 == path.len() {
                matches.push(ResolvedObject {
                    handle,
                    class_id: node.behavior.class_id(),
                });
                continue;
            }

            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }

        matches
    }

    /// Role of an object
    pub fn role_of(&self, handle: ObjectHandle) -> Option<String> {
        self.nodes.get(&handle).map(|n| n.role.clone())
    }

    /// Class id of an object
    pub fn class_of(&self, handle: ObjectHandle) -> Option<&'static str> {
        self.nodes.get(&handle).map(|n| n.behavior.class_id())
    }

    /// Number of objects, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn children_of(&self, handle: ObjectHandle) -> Vec<ObjectHandle> {
        self.nodes
            .get(&handle)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }
}

impl Default for DeviceTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Device for DeviceTree {
    async fn find_by_role_path(&self, path: &[String]) -> Option<ResolvedObject> {
        self.find_all_by_role_path(path).into_iter().next()
    }

    async fn execute(&self, command: Command, _controller: &dyn Controller) -> Status {
        let behavior = match self.nodes.get(&command.target) {
            Some(node) => node.behavior.clone(),
            None => {
                debug!(target = %command.target, "execute: no such object");
                return Status::NotFound;
            }
        };

        let status = behavior.execute(command.method, &command.params);
        debug!(
            target = %command.target,
            method = %command.method,
            ?status,
            "executed command"
        );
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::{Block, GainActuator};

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_by_role_path() {
        let tree = DeviceTree::new();
        let mixer = tree.add_block(tree.root(), "Mixer").unwrap();
        let gain_block = tree.add_block(mixer, "Gain").unwrap();
        let gain = tree
            .add(gain_block, "1", Arc::new(GainActuator::new(-120.0, 12.0)))
            .unwrap();

        let found = tree.find_all_by_role_path(&path(&["Mixer", "Gain", "1"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, gain);
        assert_eq!(found[0].class_id, GainActuator::CLASS_ID);
    }

    #[test]
    fn test_find_miss() {
        let tree = DeviceTree::new();
        tree.add_block(tree.root(), "Mixer").unwrap();

        assert!(tree.find_all_by_role_path(&path(&["Mixer", "Gain"])).is_empty());
        assert!(tree.find_all_by_role_path(&path(&["Amp"])).is_empty());
        assert!(tree.find_all_by_role_path(&[]).is_empty());
    }

    #[test]
    fn test_first_match_wins_in_tree_order() {
        let tree = DeviceTree::new();
        let first = tree.add(tree.root(), "Out", Arc::new(Block)).unwrap();
        let second = tree.add(tree.root(), "Out", Arc::new(Block)).unwrap();
        assert_ne!(first, second);

        let found = tree.find_all_by_role_path(&path(&["Out"]));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].handle, first);
        assert_eq!(found[1].handle, second);
    }

    #[test]
    fn test_partial_path_is_not_a_match() {
        let tree = DeviceTree::new();
        let mixer = tree.add_block(tree.root(), "Mixer").unwrap();
        tree.add_block(mixer, "Gain").unwrap();

        // "Mixer" alone matches the block itself, not its children
        let found = tree.find_all_by_role_path(&path(&["Mixer"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, mixer);
    }

    #[test]
    fn test_add_to_missing_parent() {
        let tree = DeviceTree::new();
        let err = tree.add_block(ObjectHandle(99), "Orphan");
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_execute_unknown_target() {
        let tree = DeviceTree::new();
        let cmd = Command::new(ObjectHandle(42), MethodId::new(4, 2), Params::empty());
        let status = tree.execute(cmd, &NullController).await;
        assert_eq!(status, Status::NotFound);
    }

    struct NullController;

    #[async_trait]
    impl Controller for NullController {
        async fn add_subscription(&self, _s: crate::traits::Subscription) -> trellis_core::Result<()> {
            Ok(())
        }
        async fn remove_subscription(
            &self,
            _s: crate::traits::Subscription,
        ) -> trellis_core::Result<()> {
            Ok(())
        }
        async fn send_notification(
            &self,
            _n: crate::traits::Notification,
        ) -> trellis_core::Result<()> {
            Ok(())
        }
    }
}
