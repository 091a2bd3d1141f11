use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use common::proto::ParentAtRoot;

#[derive(Debug, Clone)]
pub struct Config {
    // wire server configuration
    /// address the wire server listens on
    pub listen_addr: SocketAddr,
    /// upper bound on concurrently served connections; further
    ///  connections wait for a slot rather than being refused
    pub max_connections: usize,

    // protocol policy
    /// whether filesystem verbs require a logged-in session
    pub require_auth: bool,
    /// what `cd ..` does at the namespace root
    pub parent_at_root: ParentAtRoot,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8080),
            max_connections: 1024,
            require_auth: false,
            parent_at_root: ParentAtRoot::default(),
            sqlite_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
