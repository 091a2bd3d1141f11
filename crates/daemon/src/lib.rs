// Daemon internals
pub mod database;
pub mod process;
pub mod service_config;
pub mod service_state;
pub mod wire_server;

// The on-disk app directory and its config file
pub mod state;

// Re-exports for embedding the service
pub use database::{Database, SqliteAccountStore};
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, ParentAtRootSetting, StateError};
