//! Profile resolution against real shared config files.
//!
//! Everything runs in a single test because the AWS loaders read process
//! environment variables.

use route53_dnssec_audit::{AwsCredentialProvider, CredentialError, CredentialProvider};
use tempfile::tempdir;

#[tokio::test]
async fn test_named_profile_ignores_environment_credentials() {
    let dir = tempdir().unwrap();
    let config_file = dir.path().join("config");
    let credentials_file = dir.path().join("credentials");
    std::fs::write(&config_file, "").unwrap();
    std::fs::write(&credentials_file, "").unwrap();

    std::env::set_var("AWS_CONFIG_FILE", &config_file);
    std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", &credentials_file);
    std::env::set_var("AWS_REGION", "us-east-1");
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");
    std::env::set_var("AWS_ACCESS_KEY_ID", "AKIDENVIRONMENT");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "environment-secret");

    let provider = AwsCredentialProvider::new();

    // No profiles at all: the environment account must not stand in.
    let err = provider.resolve("staging").await.err().unwrap();
    assert!(matches!(
        err,
        CredentialError::ProfileNotFound { ref profile } if profile == "staging"
    ));

    std::fs::write(
        &credentials_file,
        "[prod]\naws_access_key_id = AKIDPROD\naws_secret_access_key = prod-secret\n",
    )
    .unwrap();

    assert!(provider.resolve("prod").await.is_ok());

    let err = provider.resolve("staging").await.err().unwrap();
    assert!(matches!(err, CredentialError::ProfileNotFound { .. }));
}
