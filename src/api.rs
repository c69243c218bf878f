//! Cloud API Contracts
//!
//! Trait-based abstractions over the credential chain and the three remote
//! capabilities an audit needs: caller identity, registrar domain listing
//! and hosted-zone / DNSSEC listing. The AWS SDK implementation lives in
//! [`crate::aws`]; tests plug in in-memory fakes.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ApiError, CredentialError, DnssecQueryError};

/// Resolves a named profile to an authenticated session
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn resolve(&self, profile: &str) -> Result<Arc<dyn CloudSession>, CredentialError>;
}

/// Authenticated session for one account
pub trait CloudSession: Send + Sync {
    fn identity(&self) -> Arc<dyn IdentityApi>;

    /// Registrar client pinned to the given region
    fn registrar(&self, region: &str) -> Result<Arc<dyn RegistrarApi>, ApiError>;

    fn dns(&self) -> Arc<dyn DnsApi>;
}

/// Caller identity lookup
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, ApiError>;
}

/// Paginated registrar domain listing
#[async_trait]
pub trait RegistrarApi: Send + Sync {
    async fn list_domains(&self, marker: Option<&str>) -> Result<DomainPage, ApiError>;
}

/// Hosted-zone listing and DNSSEC status lookup
#[async_trait]
pub trait DnsApi: Send + Sync {
    async fn list_hosted_zones(&self, marker: Option<&str>) -> Result<HostedZonePage, ApiError>;

    async fn get_dnssec(&self, hosted_zone_id: &str) -> Result<DnssecResponse, DnssecQueryError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainPage {
    pub domains: Vec<String>,
    pub next_marker: Option<String>,
}

/// Raw hosted zone entry as returned by the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHostedZone {
    /// Path-like id, e.g. "/hostedzone/Z123"
    pub id: String,
    pub name: String,
    /// `None` when the zone has no config block
    pub private_zone: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostedZonePage {
    pub zones: Vec<RawHostedZone>,
    pub next_marker: Option<String>,
}

/// Successful DNSSEC query; `status` is the nested signing state, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnssecResponse {
    pub status: Option<String>,
}

/// Page of a marker-paginated listing
pub trait MarkerPage {
    type Item;

    fn next_marker(&self) -> Option<&str>;

    fn into_items(self) -> Vec<Self::Item>;
}

impl MarkerPage for DomainPage {
    type Item = String;

    fn next_marker(&self) -> Option<&str> {
        self.next_marker.as_deref()
    }

    fn into_items(self) -> Vec<String> {
        self.domains
    }
}

impl MarkerPage for HostedZonePage {
    type Item = RawHostedZone;

    fn next_marker(&self) -> Option<&str> {
        self.next_marker.as_deref()
    }

    fn into_items(self) -> Vec<RawHostedZone> {
        self.zones
    }
}

/// Upper bound applied to every remote call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallTimeout(Option<Duration>);

impl CallTimeout {
    /// `0` disables the timeout
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Self(None)
        } else {
            Self(Some(Duration::from_secs(secs)))
        }
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.0
    }

    /// Run a remote call, failing with [`ApiError::Timeout`] once the limit elapses
    pub async fn run<T, E, F>(&self, operation: &'static str, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<ApiError>,
    {
        match self.0 {
            None => call.await,
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout {
                    operation,
                    secs: limit.as_secs(),
                }
                .into()),
            },
        }
    }
}
