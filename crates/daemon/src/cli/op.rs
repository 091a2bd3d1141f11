use std::error::Error;
use std::path::PathBuf;

/// Context handed to every CLI operation.
#[derive(Clone)]
pub struct OpContext {
    /// Custom config directory, when the default `~/.stash` is not wanted.
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

/// One CLI operation: takes the shared context, produces printable output.
#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}
