use std::env;
use std::sync::Arc;

use aws_env_bootstrap::{ChainSource, CredentialSource, InitError, Settings};

// Keeps the chain on the environment provider: no shared files, no IMDS.
fn isolate_from_host() {
    let dir = env::temp_dir().join("aws-env-bootstrap-missing");
    env::set_var("AWS_CONFIG_FILE", dir.join("config"));
    env::set_var("AWS_SHARED_CREDENTIALS_FILE", dir.join("credentials"));
    env::set_var("AWS_EC2_METADATA_DISABLED", "true");
    env::remove_var("AWS_PROFILE");
    env::remove_var("AWS_WEB_IDENTITY_TOKEN_FILE");
    env::remove_var("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI");
    env::remove_var("AWS_CONTAINER_CREDENTIALS_FULL_URI");
}

// Single test: everything here shares the process environment.
#[tokio::test]
async fn resolves_from_environment_once() {
    aws_env_bootstrap::logging::init_for_tests();
    isolate_from_host();
    env::set_var("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE");
    env::set_var("AWS_SECRET_ACCESS_KEY", "wJalrXUtnFEMI");
    env::set_var("AWS_SESSION_TOKEN", "session");
    env::set_var("AWS_REGION", "eu-central-1");
    env::remove_var("AWS_XRAY_CONTEXT_MISSING");

    let resolved = ChainSource::new(&Settings::default())
        .resolve()
        .await
        .unwrap();
    assert_eq!(resolved.access_key_id, "AKIDEXAMPLE");
    assert_eq!(resolved.secret_access_key, "wJalrXUtnFEMI");
    assert_eq!(resolved.session_token.as_deref(), Some("session"));
    assert_eq!(resolved.region, "eu-central-1");

    let first = aws_env_bootstrap::init().await.unwrap();
    assert_eq!(first.config().region, "eu-central-1");
    assert_eq!(env::var("AWS_XRAY_CONTEXT_MISSING").unwrap(), "LOG_ERROR");

    env::set_var("AWS_REGION", "ap-south-1");
    let second = aws_env_bootstrap::init().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.config().region, "eu-central-1");

    env::remove_var("AWS_REGION");
    env::remove_var("AWS_DEFAULT_REGION");
    let res = ChainSource::new(&Settings::default()).resolve().await;
    assert!(matches!(res, Err(InitError::CredentialResolution(_))));

    let resolved = ChainSource::new(&Settings::default().default_region("us-east-1"))
        .resolve()
        .await
        .unwrap();
    assert_eq!(resolved.region, "us-east-1");
}
