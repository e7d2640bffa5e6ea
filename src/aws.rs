use std::fmt;
use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use tracing::log::debug;

use crate::error::InitError;
use crate::settings::Settings;

/// Credentials plus the region they should be used in.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

impl ResolvedCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        ResolvedCredentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            region: region.into(),
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Rejects blank values; an empty token counts as no token.
    pub(crate) fn validate(mut self) -> Result<Self, InitError> {
        for (name, value) in [
            ("access key id", &self.access_key_id),
            ("secret access key", &self.secret_access_key),
            ("region", &self.region),
        ] {
            if value.trim().is_empty() {
                return Err(InitError::resolution(format!("empty {name}")));
            }
        }
        if self.session_token.as_deref().is_some_and(str::is_empty) {
            self.session_token = None;
        }
        Ok(self)
    }
}

impl fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("region", &self.region)
            .finish()
    }
}

/// Anything that can produce credentials and a region, possibly after I/O.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self) -> BoxFuture<'_, Result<ResolvedCredentials, InitError>>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Arc<T> {
    fn resolve(&self) -> BoxFuture<'_, Result<ResolvedCredentials, InitError>> {
        (**self).resolve()
    }
}

/// The SDK's default chain: env vars, shared config files, SSO, container and
/// instance metadata.
#[derive(Debug, Clone, Default)]
pub struct ChainSource {
    profile: Option<String>,
    default_region: Option<String>,
}

impl ChainSource {
    pub fn new(settings: &Settings) -> Self {
        ChainSource {
            profile: settings.profile.clone(),
            default_region: settings.default_region.clone(),
        }
    }

    async fn get_conf(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        loader.load().await
    }

    async fn load(&self) -> Result<ResolvedCredentials, InitError> {
        let conf = self.get_conf().await;

        let region = match conf.region() {
            Some(region) => region.to_string(),
            None => match &self.default_region {
                Some(region) => {
                    debug!("No region in the chain, using {region}");
                    region.clone()
                }
                None => return Err(InitError::resolution("no region configured")),
            },
        };

        let provider = conf
            .credentials_provider()
            .ok_or_else(|| InitError::resolution("no credentials provider configured"))?;
        let creds = provider
            .provide_credentials()
            .await
            .map_err(|err| InitError::resolution(err.to_string()))?;

        ResolvedCredentials {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().map(str::to_string),
            region,
        }
        .validate()
    }
}

impl CredentialSource for ChainSource {
    fn resolve(&self) -> BoxFuture<'_, Result<ResolvedCredentials, InitError>> {
        self.load().boxed()
    }
}

/// Hands back the same outcome every time.
#[derive(Debug, Clone)]
pub struct StaticSource {
    outcome: Result<ResolvedCredentials, String>,
}

impl StaticSource {
    pub fn new(creds: ResolvedCredentials) -> Self {
        StaticSource { outcome: Ok(creds) }
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        StaticSource {
            outcome: Err(msg.into()),
        }
    }
}

impl CredentialSource for StaticSource {
    fn resolve(&self) -> BoxFuture<'_, Result<ResolvedCredentials, InitError>> {
        let res = match &self.outcome {
            Ok(creds) => creds.clone().validate(),
            Err(msg) => Err(InitError::resolution(msg.as_str())),
        };
        future::ready(res).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_returns_its_credentials() {
        let creds = ResolvedCredentials::new("AKIDEXAMPLE", "secret", "us-west-2")
            .with_session_token("tok");
        let source = StaticSource::new(creds.clone());

        assert_eq!(source.resolve().await.unwrap(), creds);
        assert_eq!(source.resolve().await.unwrap(), creds);
    }

    #[tokio::test]
    async fn static_source_failure() {
        let source = StaticSource::failing("no credentials found");

        match source.resolve().await {
            Err(InitError::CredentialResolution(msg)) => assert_eq!(msg, "no credentials found"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_values_are_rejected() {
        let res = ResolvedCredentials::new("AKIDEXAMPLE", "secret", " ").validate();
        assert!(matches!(res, Err(InitError::CredentialResolution(_))));

        let res = ResolvedCredentials::new("", "secret", "us-east-1").validate();
        assert!(matches!(res, Err(InitError::CredentialResolution(_))));
    }

    #[test]
    fn empty_token_is_dropped() {
        let creds = ResolvedCredentials::new("AKIDEXAMPLE", "secret", "us-east-1")
            .with_session_token("")
            .validate()
            .unwrap();

        assert_eq!(creds.session_token, None);
    }

    #[test]
    fn chain_source_takes_settings() {
        let settings = Settings::default().profile("ci").default_region("us-east-1");
        let source = ChainSource::new(&settings);

        assert_eq!(source.profile.as_deref(), Some("ci"));
        assert_eq!(source.default_region.as_deref(), Some("us-east-1"));
    }
}
