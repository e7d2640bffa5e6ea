use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::aws::ResolvedCredentials;

pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const REGION: &str = "AWS_REGION";
pub const XRAY_CONTEXT_MISSING: &str = "AWS_XRAY_CONTEXT_MISSING";

/// Log and carry on when a segment is recorded without an active trace.
pub const CONTEXT_MISSING_POLICY: &str = "LOG_ERROR";

/// Where the resolved variables end up.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// The real process environment, visible to every SDK client in the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        std::env::set_var(key, value)
    }
}

/// An isolated map, for suites that must not touch the process environment.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<BTreeMap<String, String>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        MemoryEnv {
            vars: Mutex::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConfigStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

/// The variables written by a successful initialization.
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: String,
    #[serde(rename = "AWS_SESSION_TOKEN", skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(rename = "AWS_REGION")]
    pub region: String,
    #[serde(rename = "AWS_XRAY_CONTEXT_MISSING")]
    pub xray_context_missing: String,
}

impl EnvConfig {
    pub fn from_resolved(resolved: ResolvedCredentials) -> Self {
        EnvConfig {
            access_key_id: resolved.access_key_id,
            secret_access_key: resolved.secret_access_key,
            session_token: resolved.session_token,
            region: resolved.region,
            xray_context_missing: CONTEXT_MISSING_POLICY.to_string(),
        }
    }

    /// Key/value pairs in write order. The session token is only listed when present.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![
            (ACCESS_KEY_ID, self.access_key_id.as_str()),
            (SECRET_ACCESS_KEY, self.secret_access_key.as_str()),
            (REGION, self.region.as_str()),
        ];
        if let Some(token) = &self.session_token {
            entries.push((SESSION_TOKEN, token.as_str()));
        }
        entries.push((XRAY_CONTEXT_MISSING, self.xray_context_missing.as_str()));
        entries
    }

    pub fn apply(&self, store: &dyn ConfigStore) {
        for (key, value) in self.entries() {
            store.set(key, value);
        }
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("region", &self.region)
            .field("xray_context_missing", &self.xray_context_missing)
            .finish()
    }
}
