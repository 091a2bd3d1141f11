use std::collections::btree_map::Entry;

mod node;

pub use node::{DirNode, NodeRef};

/// Longest directory name the namespace accepts, in bytes.
pub const MAX_NAME_BYTES: usize = 255;

/// What `step` with `..` does when the session already sits at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentAtRoot {
    /// Succeed and stay at the root.
    #[default]
    Stay,
    /// Fail as if the parent did not exist.
    Deny,
}

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("directory already exists: {0}")]
    AlreadyExists(String),
    #[error("directory not found: {0}")]
    NotFound(String),
    #[error("directory not empty: {0}")]
    NotEmpty(String),
    #[error("directory in use: {0}")]
    InUse(String),
    #[error("invalid directory name: {0}")]
    InvalidName(String),
}

/// The shared directory tree.
///
/// One `Namespace` exists per process and is handed by shared reference to
/// every connection. All synchronization is per node: mutation takes the
/// parent's children write lock, navigation and listing take the read lock.
/// There is no tree-wide lock, so operations under unrelated parents never
/// serialize each other.
#[derive(Clone)]
pub struct Namespace {
    root: NodeRef,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        Self {
            root: DirNode::root(),
        }
    }

    /// The root node. Lives as long as the process.
    pub fn root(&self) -> NodeRef {
        self.root.clone()
    }

    /// Create a child named `name` under `cwd`.
    ///
    /// The existence check and the insert happen under one write lock on the
    /// parent's children map, so concurrent calls with the same parent and
    /// name resolve to exactly one success; the rest observe
    /// [`FsError::AlreadyExists`].
    pub fn mkdir(&self, cwd: &NodeRef, name: &str) -> Result<NodeRef, FsError> {
        validate_name(name)?;
        let mut children = cwd.children.write();
        match children.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(FsError::AlreadyExists(name.to_owned())),
            Entry::Vacant(slot) => {
                let child = DirNode::child_of(name, cwd);
                slot.insert(child.clone());
                Ok(child)
            }
        }
    }

    /// Resolve a single navigation step from `cwd`: `..` moves to the
    /// parent (subject to `at_root` when already at the root), anything else
    /// moves into the named child.
    ///
    /// On success the returned node's residency is already acquired, under
    /// the same lock that [`Namespace::rmdir`] takes, so the target cannot
    /// be removed out from under the caller. The caller owns releasing the
    /// residency of whatever node it came from.
    pub fn step(
        &self,
        cwd: &NodeRef,
        name: &str,
        at_root: ParentAtRoot,
    ) -> Result<NodeRef, FsError> {
        if name == ".." {
            return match cwd.parent() {
                Some(parent) => {
                    // A non-empty node cannot be removed, and cwd keeps the
                    // parent non-empty until the move completes.
                    parent.enter();
                    Ok(parent)
                }
                None => match at_root {
                    ParentAtRoot::Stay => {
                        cwd.enter();
                        Ok(cwd.clone())
                    }
                    ParentAtRoot::Deny => Err(FsError::NotFound("..".to_owned())),
                },
            };
        }

        let children = cwd.children.read();
        match children.get(name) {
            Some(child) => {
                child.enter();
                Ok(child.clone())
            }
            None => Err(FsError::NotFound(name.to_owned())),
        }
    }

    /// Remove the child named `name` under `cwd`.
    ///
    /// Fails while the child has entries of its own or a session resident in
    /// it. Both checks and the removal run under the parent's children write
    /// lock, which excludes concurrent `step` into the child.
    pub fn rmdir(&self, cwd: &NodeRef, name: &str) -> Result<(), FsError> {
        let mut children = cwd.children.write();
        let child = children
            .get(name)
            .ok_or_else(|| FsError::NotFound(name.to_owned()))?;
        if !child.children.read().is_empty() {
            return Err(FsError::NotEmpty(name.to_owned()));
        }
        if child.residents() > 0 {
            return Err(FsError::InUse(name.to_owned()));
        }
        children.remove(name);
        Ok(())
    }

    /// Child names under `cwd`, in lexicographic order.
    pub fn list(&self, cwd: &NodeRef) -> Vec<String> {
        cwd.children.read().keys().cloned().collect()
    }
}

fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() {
        return Err(FsError::InvalidName("empty".to_owned()));
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(FsError::InvalidName(format!(
            "longer than {} bytes",
            MAX_NAME_BYTES
        )));
    }
    if name == "." || name == ".." {
        return Err(FsError::InvalidName(name.to_owned()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(FsError::InvalidName(name.to_owned()));
    }
    Ok(())
}
