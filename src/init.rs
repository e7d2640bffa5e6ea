use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tokio::sync::OnceCell;
use tracing::info;

use crate::aws::CredentialSource;
use crate::env::{ConfigStore, EnvConfig};
use crate::error::InitError;
use crate::sink::{ErrorSink, MutedSink};

type Attempt = Shared<BoxFuture<'static, Result<Arc<TestEnv>, InitError>>>;

/// What a finished initialization hands to the code under test.
#[derive(Clone)]
pub struct TestEnv {
    config: EnvConfig,
    errors: Arc<dyn ErrorSink>,
}

impl TestEnv {
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// The stand-in that code under test should log errors to.
    pub fn error_sink(&self) -> Arc<dyn ErrorSink> {
        Arc::clone(&self.errors)
    }
}

/// Resolves credentials at most once and publishes them into a [`ConfigStore`].
///
/// Concurrent callers share the in-flight resolution and all see its outcome,
/// success or failure. A failed resolution leaves the store untouched and the
/// next call tries again.
pub struct Initializer {
    source: Arc<dyn CredentialSource>,
    store: Arc<dyn ConfigStore>,
    sink: Arc<dyn ErrorSink>,
    state: OnceCell<Arc<TestEnv>>,
    in_flight: Mutex<Option<Attempt>>,
}

impl Initializer {
    pub fn new(
        source: impl CredentialSource + 'static,
        store: impl ConfigStore + 'static,
    ) -> Self {
        Initializer {
            source: Arc::new(source),
            store: Arc::new(store),
            sink: Arc::new(MutedSink::new()),
            state: OnceCell::new(),
            in_flight: Mutex::new(None),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized()
    }

    pub async fn init(&self) -> Result<Arc<TestEnv>, InitError> {
        if let Some(env) = self.state.get() {
            return Ok(Arc::clone(env));
        }

        let attempt = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            // The winner fills `state` before clearing the slot.
            if let Some(env) = self.state.get() {
                return Ok(Arc::clone(env));
            }
            slot.get_or_insert_with(|| self.start()).clone()
        };

        let res = attempt.clone().await;
        if let Ok(env) = &res {
            let _ = self.state.set(Arc::clone(env));
        }

        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&attempt)) {
            *slot = None;
        }
        res
    }

    fn start(&self) -> Attempt {
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);

        async move { load(source.as_ref(), store.as_ref(), sink).await }
            .boxed()
            .shared()
    }
}

async fn load(
    source: &dyn CredentialSource,
    store: &dyn ConfigStore,
    sink: Arc<dyn ErrorSink>,
) -> Result<Arc<TestEnv>, InitError> {
    let resolved = source.resolve().await?.validate()?;

    let config = EnvConfig::from_resolved(resolved);
    config.apply(store);
    info!("AWS credential loaded");

    Ok(Arc::new(TestEnv {
        config,
        errors: sink,
    }))
}
