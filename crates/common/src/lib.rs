/**
 * Account registry and password handling.
 *  - Salted SHA-256 password records
 *  - The `AccountStore` contract durable backends implement
 *  - An in-memory reference store
 */
pub mod auth;
/**
 * The shared namespace: a tree of named directory
 *  nodes supporting creation, single-step navigation,
 *  listing, and removal under concurrent mutation.
 */
pub mod fs;
/**
 * Line-oriented wire protocol.
 * Command parsing, response rendering, and the
 *  dispatcher that routes commands against shared
 *  state on behalf of a session.
 */
pub mod proto;
/**
 * Per-connection session state: who is logged in,
 *  and where in the namespace the connection sits.
 */
pub mod session;
/**
 * Helper for reporting build version information
 *  at startup.
 */
pub mod version;

pub mod prelude {
    pub use crate::auth::{AccountStore, AccountStoreError, MemoryAccountStore, PasswordRecord};
    pub use crate::fs::{FsError, Namespace, NodeRef};
    pub use crate::proto::{Dispatcher, ParentAtRoot, Policy, Reply, Request};
    pub use crate::session::Session;
    pub use crate::version::build_info;
}
