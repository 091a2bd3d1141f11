use std::sync::Arc;

use crate::auth::{AccountStore, AccountStoreError};
use crate::fs::{FsError, Namespace, ParentAtRoot};
use crate::session::Session;

use super::messages::{ParseError, Reply, Request};

/// Per-deployment protocol behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policy {
    /// When set, filesystem verbs answer `ERROR not authenticated` until
    /// the session has logged in.
    pub require_auth: bool,
    /// What `cd ..` does at the root.
    pub parent_at_root: ParentAtRoot,
}

/// Routes parsed commands against the shared namespace and account store
/// on behalf of one session.
///
/// A single dispatcher is shared by every connection; all per-connection
/// state lives in the [`Session`] handed to [`Dispatcher::dispatch`].
#[derive(Clone)]
pub struct Dispatcher {
    namespace: Namespace,
    accounts: Arc<dyn AccountStore>,
    policy: Policy,
}

impl Dispatcher {
    pub fn new(namespace: Namespace, accounts: Arc<dyn AccountStore>, policy: Policy) -> Self {
        Self {
            namespace,
            accounts,
            policy,
        }
    }

    /// Open a fresh session rooted at the top of the namespace.
    pub fn open_session(&self) -> Session {
        Session::new(self.namespace.root())
    }

    /// Process one request line and produce the response line, if any.
    ///
    /// Every failure is answered on the wire and leaves the session
    /// unchanged; blank lines are swallowed.
    pub async fn dispatch(&self, session: &mut Session, line: &str) -> Option<Reply> {
        let request = match Request::parse(line) {
            Ok(Some(request)) => request,
            Ok(None) => return None,
            Err(ParseError::UnknownCommand(verb)) => {
                tracing::debug!(session = %session.id(), verb, "unknown command");
                return Some(Reply::UnknownCommand);
            }
            Err(ParseError::Malformed(verb)) => {
                tracing::debug!(session = %session.id(), verb, "malformed command");
                return Some(Reply::MalformedCommand);
            }
        };

        Some(self.handle(session, request).await)
    }

    async fn handle(&self, session: &mut Session, request: Request) -> Reply {
        match request {
            Request::Login { username, password } => {
                match self.accounts.verify(&username, &password).await {
                    Ok(true) => {
                        session.login(&username);
                        tracing::debug!(session = %session.id(), user = %username, "login");
                        Reply::Ok
                    }
                    Ok(false) => Reply::InvalidCredentials,
                    Err(e) => {
                        tracing::error!(session = %session.id(), "account verify failed: {e}");
                        Reply::Internal
                    }
                }
            }
            Request::Signup { username, password } => {
                match self.accounts.create(&username, &password).await {
                    Ok(()) => {
                        tracing::debug!(session = %session.id(), user = %username, "signup");
                        Reply::Ok
                    }
                    Err(AccountStoreError::DuplicateUsername(_)) => Reply::UsernameTaken,
                    Err(AccountStoreError::InvalidUsername(_)) => Reply::MalformedCommand,
                    Err(AccountStoreError::Backend(e)) => {
                        tracing::error!(session = %session.id(), "account create failed: {e}");
                        Reply::Internal
                    }
                }
            }
            Request::Logout => {
                session.logout();
                Reply::Ok
            }
            Request::Mkdir { name } => {
                if let Some(denied) = self.auth_gate(session) {
                    return denied;
                }
                match self.namespace.mkdir(session.cwd(), &name) {
                    Ok(_) => Reply::Ok,
                    Err(FsError::AlreadyExists(_)) => Reply::Exists,
                    Err(FsError::InvalidName(_)) => Reply::InvalidName,
                    Err(_) => Reply::Internal,
                }
            }
            Request::Cd { name } => {
                if let Some(denied) = self.auth_gate(session) {
                    return denied;
                }
                match self
                    .namespace
                    .step(session.cwd(), &name, self.policy.parent_at_root)
                {
                    Ok(target) => {
                        session.move_to(target);
                        Reply::Ok
                    }
                    Err(FsError::NotFound(_)) => Reply::NotFound,
                    Err(_) => Reply::Internal,
                }
            }
            Request::Rmdir { name } => {
                if let Some(denied) = self.auth_gate(session) {
                    return denied;
                }
                match self.namespace.rmdir(session.cwd(), &name) {
                    Ok(()) => Reply::Ok,
                    Err(FsError::NotFound(_)) => Reply::NotFound,
                    Err(FsError::NotEmpty(_)) => Reply::NotEmpty,
                    Err(FsError::InUse(_)) => Reply::InUse,
                    Err(_) => Reply::Internal,
                }
            }
            Request::Pwd => {
                if let Some(denied) = self.auth_gate(session) {
                    return denied;
                }
                Reply::Path(session.cwd().path())
            }
            Request::Ls => {
                if let Some(denied) = self.auth_gate(session) {
                    return denied;
                }
                Reply::Entries(self.namespace.list(session.cwd()))
            }
        }
    }

    fn auth_gate(&self, session: &Session) -> Option<Reply> {
        if self.policy.require_auth && !session.is_authenticated() {
            return Some(Reply::NotAuthenticated);
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auth::MemoryAccountStore;

    fn dispatcher(policy: Policy) -> Dispatcher {
        Dispatcher::new(
            Namespace::new(),
            Arc::new(MemoryAccountStore::new()),
            policy,
        )
    }

    async fn send(d: &Dispatcher, session: &mut Session, line: &str) -> String {
        d.dispatch(session, line)
            .await
            .expect("expected a response line")
            .to_string()
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let d = dispatcher(Policy::default());
        let mut s = d.open_session();

        assert_eq!(send(&d, &mut s, "signup alice secret").await, "OK");
        // Signup does not log the session in.
        assert!(!s.is_authenticated());

        assert_eq!(
            send(&d, &mut s, "login alice wrong").await,
            "ERROR invalid credentials"
        );
        assert_eq!(send(&d, &mut s, "login alice secret").await, "OK");
        assert_eq!(s.user(), Some("alice"));

        assert_eq!(send(&d, &mut s, "logout").await, "OK");
        assert!(!s.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_duplicate() {
        let d = dispatcher(Policy::default());
        let mut s = d.open_session();

        assert_eq!(send(&d, &mut s, "signup alice one").await, "OK");
        assert_eq!(
            send(&d, &mut s, "signup alice two").await,
            "ERROR username taken"
        );
    }

    #[tokio::test]
    async fn test_mkdir_cd_pwd_ls() {
        let d = dispatcher(Policy::default());
        let mut s = d.open_session();

        assert_eq!(send(&d, &mut s, "pwd").await, "OK /");
        assert_eq!(send(&d, &mut s, "mkdir docs").await, "OK");
        assert_eq!(send(&d, &mut s, "mkdir docs").await, "ERROR exists");
        assert_eq!(send(&d, &mut s, "ls").await, "OK docs");

        assert_eq!(send(&d, &mut s, "cd docs").await, "OK");
        assert_eq!(send(&d, &mut s, "pwd").await, "OK /docs");
        assert_eq!(send(&d, &mut s, "ls").await, "OK");

        assert_eq!(send(&d, &mut s, "cd missing").await, "ERROR not found");
        assert_eq!(send(&d, &mut s, "cd ..").await, "OK");
        assert_eq!(send(&d, &mut s, "pwd").await, "OK /");
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_keep_session_usable() {
        let d = dispatcher(Policy::default());
        let mut s = d.open_session();

        assert_eq!(send(&d, &mut s, "foobar").await, "ERROR unknown command");
        assert_eq!(
            send(&d, &mut s, "mkdir one two").await,
            "ERROR malformed command"
        );
        assert_eq!(send(&d, &mut s, "mkdir fine").await, "OK");
    }

    #[tokio::test]
    async fn test_blank_line_has_no_reply() {
        let d = dispatcher(Policy::default());
        let mut s = d.open_session();
        assert!(d.dispatch(&mut s, "   ").await.is_none());
    }

    #[tokio::test]
    async fn test_require_auth_gates_fs_commands() {
        let d = dispatcher(Policy {
            require_auth: true,
            ..Policy::default()
        });
        let mut s = d.open_session();

        for line in ["mkdir a", "cd a", "rmdir a", "pwd", "ls"] {
            assert_eq!(
                send(&d, &mut s, line).await,
                "ERROR not authenticated",
                "expected auth gate for {line:?}"
            );
        }

        assert_eq!(send(&d, &mut s, "signup alice secret").await, "OK");
        assert_eq!(send(&d, &mut s, "login alice secret").await, "OK");
        assert_eq!(send(&d, &mut s, "mkdir a").await, "OK");
    }

    #[tokio::test]
    async fn test_cd_parent_at_root_policies() {
        let stay = dispatcher(Policy::default());
        let mut s = stay.open_session();
        assert_eq!(send(&stay, &mut s, "cd ..").await, "OK");
        assert_eq!(send(&stay, &mut s, "pwd").await, "OK /");

        let deny = dispatcher(Policy {
            parent_at_root: ParentAtRoot::Deny,
            ..Policy::default()
        });
        let mut s = deny.open_session();
        assert_eq!(send(&deny, &mut s, "cd ..").await, "ERROR not found");
    }

    #[tokio::test]
    async fn test_rmdir_flow() {
        let d = dispatcher(Policy::default());
        let mut owner = d.open_session();
        let mut visitor = d.open_session();

        assert_eq!(send(&d, &mut owner, "mkdir attic").await, "OK");
        assert_eq!(send(&d, &mut visitor, "cd attic").await, "OK");

        // A resident session blocks removal.
        assert_eq!(send(&d, &mut owner, "rmdir attic").await, "ERROR in use");

        assert_eq!(send(&d, &mut visitor, "cd ..").await, "OK");
        assert_eq!(send(&d, &mut owner, "rmdir attic").await, "OK");
        assert_eq!(send(&d, &mut owner, "rmdir attic").await, "ERROR not found");
    }
}
