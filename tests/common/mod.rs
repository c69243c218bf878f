//! In-memory cloud backend shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use route53_dnssec_audit::api::{
    CallerIdentity, DnssecResponse, DomainPage, HostedZonePage, RawHostedZone,
};
use route53_dnssec_audit::{
    ApiError, CloudSession, CredentialError, CredentialProvider, DnsApi, DnssecQueryError,
    IdentityApi, RegistrarApi,
};

fn marker_for(page: usize) -> String {
    format!("page-{}", page)
}

fn page_index(marker: Option<&str>) -> usize {
    marker
        .and_then(|m| m.strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn next_marker(page: usize, total: usize) -> Option<String> {
    if page + 1 < total {
        Some(marker_for(page + 1))
    } else {
        None
    }
}

pub fn public_zone(id: &str, name: &str) -> RawHostedZone {
    RawHostedZone {
        id: format!("/hostedzone/{}", id),
        name: name.to_string(),
        private_zone: Some(false),
    }
}

pub fn private_zone(id: &str, name: &str) -> RawHostedZone {
    RawHostedZone {
        id: format!("/hostedzone/{}", id),
        name: name.to_string(),
        private_zone: Some(true),
    }
}

/// One fake AWS account; every call is recorded
#[derive(Default)]
pub struct FakeAccount {
    pub account_id: Option<String>,
    pub identity_fails: bool,
    pub identity_delay: Option<Duration>,
    pub registrar_client_fails: bool,
    pub domain_pages: Vec<Vec<String>>,
    pub domain_page_failure: Option<usize>,
    pub zone_pages: Vec<Vec<RawHostedZone>>,
    pub zone_page_failure: Option<usize>,
    pub dnssec: HashMap<String, Result<DnssecResponse, DnssecQueryError>>,
    pub dnssec_calls: Mutex<Vec<String>>,
    pub domain_calls: Mutex<Vec<Option<String>>>,
    pub zone_calls: Mutex<Vec<Option<String>>>,
    pub registrar_regions: Mutex<Vec<String>>,
}

impl FakeAccount {
    pub fn new(account_id: &str) -> Self {
        Self {
            account_id: Some(account_id.to_string()),
            ..Default::default()
        }
    }

    pub fn domains(mut self, page: &[&str]) -> Self {
        self.domain_pages
            .push(page.iter().map(|d| d.to_string()).collect());
        self
    }

    pub fn zones(mut self, page: Vec<RawHostedZone>) -> Self {
        self.zone_pages.push(page);
        self
    }

    pub fn dnssec_status(mut self, zone_id: &str, status: &str) -> Self {
        self.dnssec.insert(
            zone_id.to_string(),
            Ok(DnssecResponse {
                status: Some(status.to_string()),
            }),
        );
        self
    }

    pub fn dnssec_result(
        mut self,
        zone_id: &str,
        result: Result<DnssecResponse, DnssecQueryError>,
    ) -> Self {
        self.dnssec.insert(zone_id.to_string(), result);
        self
    }

    pub fn dnssec_call_count(&self) -> usize {
        self.dnssec_calls.lock().unwrap().len()
    }

    pub fn dnssec_called_for(&self, zone_id: &str) -> bool {
        self.dnssec_calls
            .lock()
            .unwrap()
            .iter()
            .any(|z| z == zone_id)
    }
}

#[async_trait]
impl IdentityApi for FakeAccount {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, ApiError> {
        if let Some(delay) = self.identity_delay {
            tokio::time::sleep(delay).await;
        }
        if self.identity_fails {
            return Err(ApiError::Service {
                code: "AccessDenied".to_string(),
                message: "not authorized to perform sts:GetCallerIdentity".to_string(),
            });
        }
        Ok(CallerIdentity {
            account_id: self.account_id.clone(),
        })
    }
}

#[async_trait]
impl RegistrarApi for FakeAccount {
    async fn list_domains(&self, marker: Option<&str>) -> Result<DomainPage, ApiError> {
        self.domain_calls
            .lock()
            .unwrap()
            .push(marker.map(str::to_string));

        let page = page_index(marker);
        if self.domain_page_failure == Some(page) {
            return Err(ApiError::Transport("connection reset".to_string()));
        }

        Ok(DomainPage {
            domains: self.domain_pages.get(page).cloned().unwrap_or_default(),
            next_marker: next_marker(page, self.domain_pages.len()),
        })
    }
}

#[async_trait]
impl DnsApi for FakeAccount {
    async fn list_hosted_zones(&self, marker: Option<&str>) -> Result<HostedZonePage, ApiError> {
        self.zone_calls
            .lock()
            .unwrap()
            .push(marker.map(str::to_string));

        let page = page_index(marker);
        if self.zone_page_failure == Some(page) {
            return Err(ApiError::Service {
                code: "Throttling".to_string(),
                message: "Rate exceeded".to_string(),
            });
        }

        Ok(HostedZonePage {
            zones: self.zone_pages.get(page).cloned().unwrap_or_default(),
            next_marker: next_marker(page, self.zone_pages.len()),
        })
    }

    async fn get_dnssec(&self, hosted_zone_id: &str) -> Result<DnssecResponse, DnssecQueryError> {
        self.dnssec_calls
            .lock()
            .unwrap()
            .push(hosted_zone_id.to_string());

        self.dnssec
            .get(hosted_zone_id)
            .cloned()
            .unwrap_or_else(|| {
                Ok(DnssecResponse {
                    status: Some("SIGNING".to_string()),
                })
            })
    }
}

pub struct FakeSession {
    pub account: Arc<FakeAccount>,
}

impl CloudSession for FakeSession {
    fn identity(&self) -> Arc<dyn IdentityApi> {
        self.account.clone()
    }

    fn registrar(&self, region: &str) -> Result<Arc<dyn RegistrarApi>, ApiError> {
        self.account
            .registrar_regions
            .lock()
            .unwrap()
            .push(region.to_string());

        if self.account.registrar_client_fails {
            return Err(ApiError::ClientConstruction("no region".to_string()));
        }
        Ok(self.account.clone())
    }

    fn dns(&self) -> Arc<dyn DnsApi> {
        self.account.clone()
    }
}

/// Credential provider over a fixed set of fake accounts
#[derive(Default)]
pub struct FakeProvider {
    accounts: HashMap<String, Arc<FakeAccount>>,
    pub resolved: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, profile: &str, account: FakeAccount) -> Self {
        self.accounts.insert(profile.to_string(), Arc::new(account));
        self
    }

    pub fn account(&self, profile: &str) -> Arc<FakeAccount> {
        self.accounts[profile].clone()
    }
}

#[async_trait]
impl CredentialProvider for FakeProvider {
    async fn resolve(&self, profile: &str) -> Result<Arc<dyn CloudSession>, CredentialError> {
        self.resolved.lock().unwrap().push(profile.to_string());

        match self.accounts.get(profile) {
            Some(account) => Ok(Arc::new(FakeSession {
                account: account.clone(),
            })),
            None => Err(CredentialError::ProfileNotFound {
                profile: profile.to_string(),
            }),
        }
    }
}

/// Collects formatted log lines emitted on the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's events into the capture until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
