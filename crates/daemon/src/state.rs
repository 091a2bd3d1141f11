use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::proto::ParentAtRoot;

pub const APP_NAME: &str = "stash";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the wire server
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether filesystem commands require a logged-in session
    #[serde(default)]
    pub require_auth: bool,
    /// What `cd ..` does at the namespace root
    #[serde(default)]
    pub parent_at_root: ParentAtRootSetting,
    /// Upper bound on concurrently served connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> usize {
    1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            require_auth: false,
            parent_at_root: ParentAtRootSetting::default(),
            max_connections: default_max_connections(),
        }
    }
}

/// Config-file spelling of the `cd ..`-at-root policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParentAtRootSetting {
    /// `cd ..` at the root succeeds and stays put
    #[default]
    Stay,
    /// `cd ..` at the root answers not found
    Deny,
}

impl From<ParentAtRootSetting> for ParentAtRoot {
    fn from(setting: ParentAtRootSetting) -> Self {
        match setting {
            ParentAtRootSetting::Stay => ParentAtRoot::Stay,
            ParentAtRootSetting::Deny => ParentAtRoot::Deny,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the stash directory (~/.stash)
    pub stash_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the stash directory path (custom or default ~/.stash)
    pub fn stash_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Check if the stash directory exists
    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;
        Ok(stash_dir.exists())
    }

    /// Initialize a new stash state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;

        if stash_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&stash_dir)?;

        // Create config (use provided or default)
        let config = config.unwrap_or_default();
        let config_path = stash_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (just touch the file, it will be
        // initialized by the service)
        let db_path = stash_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            stash_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the stash directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let stash_dir = Self::stash_dir(custom_path)?;

        if !stash_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = stash_dir.join(DB_FILE_NAME);
        let config_path = stash_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            stash_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("stash directory not initialized. Run 'stash init' first")]
    NotInitialized,

    #[error("stash directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
