use uuid::Uuid;

use crate::fs::NodeRef;

/// Per-connection state: authentication plus a working directory.
///
/// A session is created when its connection is accepted and dropped when the
/// connection goes away; it is owned by exactly one connection task and never
/// shared. The working directory always refers to a live, attached node:
/// the session holds a residency on it for its whole stay, which blocks
/// removal of that directory.
pub struct Session {
    id: Uuid,
    user: Option<String>,
    cwd: NodeRef,
}

impl Session {
    /// Open a session rooted at `root`.
    pub fn new(root: NodeRef) -> Self {
        root.enter();
        Self {
            id: Uuid::new_v4(),
            user: None,
            cwd: root,
        }
    }

    /// Connection-scoped identifier, for log correlation only.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Mark the session authenticated as `username`. Re-login simply
    /// replaces the user; the working directory is left where it is.
    pub fn login(&mut self, username: &str) {
        self.user = Some(username.to_owned());
    }

    /// Drop authentication. Idempotent.
    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn cwd(&self) -> &NodeRef {
        &self.cwd
    }

    /// Move the working directory to `target`, whose residency the caller
    /// has already acquired (see [`crate::fs::Namespace::step`]). The
    /// residency of the previous directory is released here.
    pub fn move_to(&mut self, target: NodeRef) {
        self.cwd.leave();
        self.cwd = target;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cwd.leave();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::{Namespace, ParentAtRoot};

    #[test]
    fn test_session_residency_lifecycle() {
        let ns = Namespace::new();
        let root = ns.root();

        let session = Session::new(root.clone());
        assert_eq!(root.residents(), 1);

        drop(session);
        assert_eq!(root.residents(), 0);
    }

    #[test]
    fn test_move_transfers_residency() {
        let ns = Namespace::new();
        let root = ns.root();
        let docs = ns.mkdir(&root, "docs").unwrap();

        let mut session = Session::new(root.clone());
        let target = ns.step(session.cwd(), "docs", ParentAtRoot::Stay).unwrap();
        session.move_to(target);

        assert_eq!(root.residents(), 0);
        assert_eq!(docs.residents(), 1);
        assert_eq!(session.cwd().path(), "/docs");

        drop(session);
        assert_eq!(docs.residents(), 0);
    }

    #[test]
    fn test_login_logout() {
        let ns = Namespace::new();
        let mut session = Session::new(ns.root());

        assert!(!session.is_authenticated());
        session.login("alice");
        assert_eq!(session.user(), Some("alice"));

        session.login("bob");
        assert_eq!(session.user(), Some("bob"));

        session.logout();
        assert!(!session.is_authenticated());
        session.logout();
        assert!(!session.is_authenticated());
    }
}
