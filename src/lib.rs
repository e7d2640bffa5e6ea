//! One-time AWS credential bootstrap for test suites.
//!
//! Resolves credentials and region through the SDK's default chain, publishes
//! them as `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`
//! and `AWS_REGION`, and sets `AWS_XRAY_CONTEXT_MISSING=LOG_ERROR`.
//!
//! ```no_run
//! # async fn run() -> Result<(), aws_env_bootstrap::InitError> {
//! let env = aws_env_bootstrap::init().await?;
//! assert_eq!(std::env::var("AWS_REGION").ok().as_deref(), Some(env.config().region.as_str()));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::OnceCell;

pub mod aws;
pub mod dotenv;
pub mod env;
mod error;
mod init;
pub mod logging;
mod settings;
pub mod sink;

pub use crate::aws::{ChainSource, CredentialSource, ResolvedCredentials, StaticSource};
pub use crate::env::{ConfigStore, EnvConfig, MemoryEnv, ProcessEnv};
pub use crate::error::InitError;
pub use crate::init::{Initializer, TestEnv};
pub use crate::settings::Settings;
pub use crate::sink::{ErrorSink, MutedSink, StderrSink};

/// Loads the env file and builds an [`Initializer`] over the default chain and
/// the process environment. Nothing is resolved until [`Initializer::init`].
pub fn setup(settings: &Settings) -> Result<Initializer, InitError> {
    dotenv::load_env_file(&settings.env_file)?;
    Ok(Initializer::new(ChainSource::new(settings), ProcessEnv))
}

static SHARED: OnceCell<Initializer> = OnceCell::const_new();

/// Process-wide initializer built from [`Settings::default`], for suites that
/// want a single call at the top of every test.
///
/// No subscriber is installed here; call [`logging::init_for_tests`] first to
/// see the bootstrap's output.
pub async fn init() -> Result<Arc<TestEnv>, InitError> {
    let initializer = SHARED
        .get_or_try_init(|| async { setup(&Settings::default()) })
        .await?;
    initializer.init().await
}
