use std::sync::Arc;

use common::auth::AccountStore;
use common::fs::Namespace;
use common::proto::{Dispatcher, Policy};

use crate::database::{Database, DatabaseSetupError, SqliteAccountStore};
use crate::service_config::Config;

/// Shared service state: the dispatcher every connection routes through,
/// plus the database handle behind it.
#[derive(Clone)]
pub struct State {
    dispatcher: Dispatcher,
    database: Database,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let database_url = match &config.sqlite_path {
            Some(path) => url::Url::parse(&format!("sqlite://{}", path.display()))?,
            None => url::Url::parse("sqlite::memory:")?,
        };
        let database = Database::connect(&database_url).await?;

        let accounts: Arc<dyn AccountStore> = Arc::new(SqliteAccountStore::new(database.clone()));
        let policy = Policy {
            require_auth: config.require_auth,
            parent_at_root: config.parent_at_root,
        };
        let dispatcher = Dispatcher::new(Namespace::new(), accounts, policy);

        Ok(Self {
            dispatcher,
            database,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The pool behind the account store, for operational queries.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),

    #[error("database setup failed: {0}")]
    Database(#[from] DatabaseSetupError),
}
