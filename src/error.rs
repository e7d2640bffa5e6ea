use std::path::PathBuf;
use std::sync::Arc;

/// Cloneable so every caller waiting on one resolution gets the same outcome.
#[derive(thiserror::Error, Debug, Clone)]
pub enum InitError {
    /// The credential chain couldn't produce credentials or a region.
    #[error("couldn't resolve AWS credentials: {0}")]
    CredentialResolution(String),

    #[error("couldn't load env file {}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: Arc<dotenvy::Error>,
    },
}

impl InitError {
    pub(crate) fn resolution(msg: impl Into<String>) -> Self {
        InitError::CredentialResolution(msg.into())
    }
}
