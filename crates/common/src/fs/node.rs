use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Shared handle to a directory node.
pub type NodeRef = Arc<DirNode>;

/// A single directory in the namespace.
///
/// Nodes are only ever created as fresh children of an existing node, so the
/// structure is a strict tree. The root carries no name and no parent.
/// `residents` counts the sessions whose working directory is this node;
/// removal is refused while it is non-zero.
pub struct DirNode {
    name: String,
    parent: Weak<DirNode>,
    pub(super) children: RwLock<BTreeMap<String, NodeRef>>,
    residents: AtomicUsize,
}

impl DirNode {
    /// Create the namespace root.
    pub(super) fn root() -> NodeRef {
        Arc::new(DirNode {
            name: String::new(),
            parent: Weak::new(),
            children: RwLock::new(BTreeMap::new()),
            residents: AtomicUsize::new(0),
        })
    }

    /// Create a fresh child of `parent`. The caller is responsible for
    /// inserting it into the parent's children map.
    pub(super) fn child_of(name: &str, parent: &NodeRef) -> NodeRef {
        Arc::new(DirNode {
            name: name.to_owned(),
            parent: Arc::downgrade(parent),
            children: RwLock::new(BTreeMap::new()),
            residents: AtomicUsize::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.parent.strong_count() == 0
    }

    /// Absolute path from the root, `/`-joined. The root renders as `/`.
    pub fn path(&self) -> String {
        if self.is_root() {
            return "/".to_owned();
        }
        let mut parts = vec![self.name.clone()];
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            if !node.is_root() {
                parts.push(node.name.clone());
            }
            cursor = node.parent();
        }
        parts.reverse();
        format!("/{}", parts.join("/"))
    }

    /// Number of sessions currently resident in this node.
    pub fn residents(&self) -> usize {
        self.residents.load(Ordering::Acquire)
    }

    /// Record a session arriving. Paired with [`DirNode::leave`].
    pub fn enter(&self) {
        self.residents.fetch_add(1, Ordering::AcqRel);
    }

    /// Record a session departing.
    pub fn leave(&self) {
        self.residents.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for DirNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirNode")
            .field("name", &self.name)
            .field("children", &self.children.read().len())
            .field("residents", &self.residents())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_root_has_no_parent() {
        let root = DirNode::root();
        assert!(root.is_root());
        assert!(root.parent().is_none());
        assert_eq!(root.path(), "/");
    }

    #[test]
    fn test_path_walks_to_root() {
        let root = DirNode::root();
        let a = DirNode::child_of("a", &root);
        root.children.write().insert("a".into(), a.clone());
        let b = DirNode::child_of("b", &a);
        a.children.write().insert("b".into(), b.clone());

        assert_eq!(a.path(), "/a");
        assert_eq!(b.path(), "/a/b");
        assert!(!b.is_root());
    }

    #[test]
    fn test_residents_counting() {
        let root = DirNode::root();
        assert_eq!(root.residents(), 0);
        root.enter();
        root.enter();
        assert_eq!(root.residents(), 2);
        root.leave();
        assert_eq!(root.residents(), 1);
    }
}
