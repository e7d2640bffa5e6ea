use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::log::{debug, info};

use crate::error::InitError;

/// Loads `path` into the process environment without overriding anything
/// already set. A missing file is fine and yields `Ok(false)`.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, InitError> {
    let path = path.as_ref();

    match dotenvy::from_path(path) {
        Ok(()) => {
            info!("Loaded env file {}", path.display());
            Ok(true)
        }
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!("No env file at {}", path.display());
            Ok(false)
        }
        Err(source) => Err(InitError::EnvFile {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }),
    }
}
