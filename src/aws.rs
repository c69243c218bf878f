//! AWS Backend
//!
//! Implements the cloud API contracts on top of the AWS SDK:
//! - STS `GetCallerIdentity` for the account id
//! - Route53 Domains `ListDomains` for registrar knowledge
//! - Route53 `ListHostedZones` / `GetDNSSEC` for zones and signing status
//!
//! Credentials come only from the named profile in the shared config files
//! (`~/.aws/config`, `~/.aws/credentials`). Environment credentials are never
//! consulted, so a missing profile cannot silently resolve to another account.
//! All calls are read-only.

use async_trait::async_trait;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::debug;

use crate::api::{
    CallerIdentity, CloudSession, CredentialProvider, DnsApi, DnssecResponse, DomainPage,
    HostedZonePage, IdentityApi, RawHostedZone, RegistrarApi,
};
use crate::error::{ApiError, CredentialError, DnssecQueryError};

/// Error code Route53 returns for zones without DNSSEC configuration
const DNSSEC_NOT_FOUND: &str = "DNSSECNotFound";

/// Resolves named profiles from the AWS shared config files
#[derive(Debug, Clone, Default)]
pub struct AwsCredentialProvider;

impl AwsCredentialProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialProvider for AwsCredentialProvider {
    async fn resolve(&self, profile: &str) -> Result<Arc<dyn CloudSession>, CredentialError> {
        debug!(profile = %profile, "Loading AWS profile");

        let profile_credentials = ProfileFileCredentialsProvider::builder()
            .profile_name(profile)
            .build();

        // The profile still drives region and other settings.
        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .credentials_provider(profile_credentials)
            .load()
            .await;

        let credentials = config
            .credentials_provider()
            .ok_or_else(|| CredentialError::ProfileNotFound {
                profile: profile.to_string(),
            })?;

        // A profile without usable credentials aborts the account here.
        credentials
            .provide_credentials()
            .await
            .map_err(|e| credential_error(profile, e))?;

        Ok(Arc::new(AwsSession::new(config)))
    }
}

fn credential_error(profile: &str, err: CredentialsError) -> CredentialError {
    match err {
        CredentialsError::CredentialsNotLoaded(_) | CredentialsError::InvalidConfiguration(_) => {
            CredentialError::ProfileNotFound {
                profile: profile.to_string(),
            }
        }
        other => CredentialError::Provider {
            profile: profile.to_string(),
            message: DisplayErrorContext(&other).to_string(),
        },
    }
}

/// Map an SDK failure to an [`ApiError`], keeping the service error code
fn api_error<E, R>(err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err.as_service_error() {
        Some(service) => ApiError::Service {
            code: service.code().unwrap_or("Unknown").to_string(),
            message: service.message().unwrap_or_default().to_string(),
        },
        None => ApiError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

/// Authenticated AWS session for one profile
pub struct AwsSession {
    config: SdkConfig,
    identity: Arc<StsIdentity>,
    dns: Arc<Route53Dns>,
}

impl AwsSession {
    pub fn new(config: SdkConfig) -> Self {
        let identity = Arc::new(StsIdentity {
            client: aws_sdk_sts::Client::new(&config),
        });
        let dns = Arc::new(Route53Dns {
            client: aws_sdk_route53::Client::new(&config),
        });

        Self {
            config,
            identity,
            dns,
        }
    }
}

impl CloudSession for AwsSession {
    fn identity(&self) -> Arc<dyn IdentityApi> {
        self.identity.clone()
    }

    fn registrar(&self, region: &str) -> Result<Arc<dyn RegistrarApi>, ApiError> {
        if region.trim().is_empty() {
            return Err(ApiError::ClientConstruction(
                "registrar region is empty".to_string(),
            ));
        }

        let conf = aws_sdk_route53domains::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();

        Ok(Arc::new(Route53DomainsRegistrar {
            client: aws_sdk_route53domains::Client::from_conf(conf),
        }))
    }

    fn dns(&self) -> Arc<dyn DnsApi> {
        self.dns.clone()
    }
}

struct StsIdentity {
    client: aws_sdk_sts::Client,
}

#[async_trait]
impl IdentityApi for StsIdentity {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, ApiError> {
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(api_error)?;

        Ok(CallerIdentity {
            account_id: output.account().map(str::to_string),
        })
    }
}

struct Route53DomainsRegistrar {
    client: aws_sdk_route53domains::Client,
}

#[async_trait]
impl RegistrarApi for Route53DomainsRegistrar {
    async fn list_domains(&self, marker: Option<&str>) -> Result<DomainPage, ApiError> {
        let output = self
            .client
            .list_domains()
            .set_marker(marker.map(str::to_string))
            .send()
            .await
            .map_err(api_error)?;

        let domains = output
            .domains()
            .iter()
            .filter_map(|d| d.domain_name())
            .map(str::to_string)
            .collect();

        Ok(DomainPage {
            domains,
            next_marker: output.next_page_marker().map(str::to_string),
        })
    }
}

struct Route53Dns {
    client: aws_sdk_route53::Client,
}

#[async_trait]
impl DnsApi for Route53Dns {
    async fn list_hosted_zones(&self, marker: Option<&str>) -> Result<HostedZonePage, ApiError> {
        let output = self
            .client
            .list_hosted_zones()
            .set_marker(marker.map(str::to_string))
            .send()
            .await
            .map_err(api_error)?;

        let zones = output
            .hosted_zones()
            .iter()
            .map(|hz| RawHostedZone {
                id: hz.id().to_string(),
                name: hz.name().to_string(),
                private_zone: hz.config().map(|c| c.private_zone()),
            })
            .collect();

        let next_marker = if output.is_truncated() {
            output.next_marker().map(str::to_string)
        } else {
            None
        };

        Ok(HostedZonePage { zones, next_marker })
    }

    async fn get_dnssec(&self, hosted_zone_id: &str) -> Result<DnssecResponse, DnssecQueryError> {
        match self
            .client
            .get_dnssec()
            .hosted_zone_id(hosted_zone_id)
            .send()
            .await
        {
            Ok(output) => Ok(DnssecResponse {
                status: output
                    .status()
                    .and_then(|s| s.serve_signature())
                    .map(str::to_string),
            }),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .and_then(|e| e.code())
                    .map(|code| code == DNSSEC_NOT_FOUND)
                    .unwrap_or(false);

                if not_found {
                    Err(DnssecQueryError::NotFound)
                } else {
                    Err(DnssecQueryError::Other(api_error(err)))
                }
            }
        }
    }
}
