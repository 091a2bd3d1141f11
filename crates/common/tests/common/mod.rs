//! Shared test utilities for protocol integration tests
#![allow(dead_code)]

use std::sync::Arc;

use common::auth::MemoryAccountStore;
use common::fs::Namespace;
use common::proto::{Dispatcher, Policy};
use common::session::Session;

/// Set up a dispatcher over a fresh namespace and an in-memory account store.
pub fn setup_dispatcher(policy: Policy) -> (Dispatcher, MemoryAccountStore) {
    let accounts = MemoryAccountStore::new();
    let dispatcher = Dispatcher::new(Namespace::new(), Arc::new(accounts.clone()), policy);
    (dispatcher, accounts)
}

/// Send one line and return the rendered response.
pub async fn send(dispatcher: &Dispatcher, session: &mut Session, line: &str) -> String {
    dispatcher
        .dispatch(session, line)
        .await
        .expect("expected a response line")
        .to_string()
}
