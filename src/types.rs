//! DNSSEC Audit Types
//!
//! Core types for representing hosted zones, registrar knowledge and the
//! report rows produced for each audited account.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::CloudSession;

/// Sentinel used whenever a value could not be resolved
pub const UNKNOWN: &str = "UNKNOWN";

/// Strip a single trailing dot from a DNS name.
///
/// Already normalized names are returned unchanged.
pub fn normalize_domain(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Public or private hosted zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoneType {
    Public,
    Private,
}

impl ZoneType {
    pub fn from_private_flag(private_zone: bool) -> Self {
        if private_zone {
            ZoneType::Private
        } else {
            ZoneType::Public
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, ZoneType::Private)
    }
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneType::Public => write!(f, "PUBLIC"),
            ZoneType::Private => write!(f, "PRIVATE"),
        }
    }
}

/// DNSSEC signing status of a hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnssecStatus {
    /// Signing state reported by the DNS API (e.g. SIGNING, NOT_SIGNING)
    Reported(String),
    /// The zone has no DNSSEC signing configured
    NotConfigured,
    /// Private zones are never queried
    NotSupportedPrivateZone,
    /// The query failed or returned an unexpected shape
    Unknown,
}

impl DnssecStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DnssecStatus::Reported(status) => status,
            DnssecStatus::NotConfigured => "NOT_CONFIGURED",
            DnssecStatus::NotSupportedPrivateZone => "NOT_SUPPORTED_PRIVATE_ZONE",
            DnssecStatus::Unknown => UNKNOWN,
        }
    }
}

impl std::fmt::Display for DnssecStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DnssecStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whether a zone's domain is registered through the account's registrar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationVerdict {
    Yes,
    No,
    Unknown,
}

impl std::fmt::Display for RegistrationVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationVerdict::Yes => write!(f, "YES"),
            RegistrationVerdict::No => write!(f, "NO"),
            RegistrationVerdict::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A hosted zone as produced by the zone enumerator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// Final path segment of the API zone id (e.g. "Z123" from "/hostedzone/Z123")
    pub hosted_zone_id: String,
    /// Domain name without trailing dot
    pub domain_name: String,
    pub zone_type: ZoneType,
}

impl ZoneRecord {
    /// Normalize a raw API entry.
    ///
    /// A missing private flag is treated as a public zone.
    pub fn from_raw(id: &str, name: &str, private_zone: Option<bool>) -> Self {
        let hosted_zone_id = id.rsplit('/').next().unwrap_or(id).to_string();

        Self {
            hosted_zone_id,
            domain_name: normalize_domain(name).to_string(),
            zone_type: ZoneType::from_private_flag(private_zone.unwrap_or(false)),
        }
    }
}

/// Domains registered through the registrar, plus whether the listing succeeded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrarIndex {
    domains: HashSet<String>,
    available: bool,
}

impl RegistrarIndex {
    /// Index built from a complete registrar listing
    pub fn available<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| normalize_domain(d.as_ref()).to_string())
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            domains,
            available: true,
        }
    }

    /// Index for an account whose registrar listing failed
    pub fn unavailable() -> Self {
        Self {
            domains: HashSet::new(),
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(normalize_domain(domain))
    }

    /// Registration verdict for a zone's domain
    pub fn verdict(&self, domain: &str) -> RegistrationVerdict {
        if !self.available {
            RegistrationVerdict::Unknown
        } else if self.contains(domain) {
            RegistrationVerdict::Yes
        } else {
            RegistrationVerdict::No
        }
    }
}

/// Authenticated context for one audited account
#[derive(Clone)]
pub struct AccountContext {
    pub profile: String,
    /// Resolved account id, or "UNKNOWN"
    pub account_id: String,
    pub session: Arc<dyn CloudSession>,
}

impl std::fmt::Debug for AccountContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountContext")
            .field("profile", &self.profile)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

/// One report row per (account, hosted zone)
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    pub profile: String,
    pub account_id: String,
    pub hosted_zone_id: String,
    pub domain_name: String,
    pub zone_type: ZoneType,
    pub registered_in_route53: RegistrationVerdict,
    pub dnssec_status: DnssecStatus,
}

impl InventoryRow {
    pub fn new(
        account: &AccountContext,
        zone: ZoneRecord,
        registered_in_route53: RegistrationVerdict,
        dnssec_status: DnssecStatus,
    ) -> Self {
        Self {
            profile: account.profile.clone(),
            account_id: account.account_id.clone(),
            hosted_zone_id: zone.hosted_zone_id,
            domain_name: zone.domain_name,
            zone_type: zone.zone_type,
            registered_in_route53,
            dnssec_status,
        }
    }
}

/// How an account's audit pass ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountStatus {
    /// Every hosted zone was enumerated
    Completed,
    /// No session could be created; the account contributed no rows
    Aborted { reason: String },
    /// Zone listing failed part-way; rows emitted before the failure are kept
    Partial { reason: String },
}

/// Per-account summary of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOutcome {
    pub profile: String,
    pub account_id: String,
    pub zones: usize,
    pub status: AccountStatus,
}

impl AccountOutcome {
    pub fn is_failed(&self) -> bool {
        !matches!(self.status, AccountStatus::Completed)
    }
}

/// Result of a full audit run
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Rows in configured account order, then zone listing order
    pub rows: Vec<InventoryRow>,
    pub accounts: Vec<AccountOutcome>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl AuditReport {
    pub fn failed_accounts(&self) -> usize {
        self.accounts.iter().filter(|a| a.is_failed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_is_idempotent() {
        assert_eq!(normalize_domain("example.com."), "example.com");
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain(normalize_domain("example.com.")), "example.com");
    }

    #[test]
    fn test_zone_record_from_raw() {
        let zone = ZoneRecord::from_raw("/hostedzone/Z0123ABC", "example.com.", Some(false));

        assert_eq!(zone.hosted_zone_id, "Z0123ABC");
        assert_eq!(zone.domain_name, "example.com");
        assert_eq!(zone.zone_type, ZoneType::Public);
    }

    #[test]
    fn test_zone_record_missing_config_is_public() {
        let zone = ZoneRecord::from_raw("Z9", "internal.example.", None);
        assert_eq!(zone.hosted_zone_id, "Z9");
        assert_eq!(zone.zone_type, ZoneType::Public);

        let private = ZoneRecord::from_raw("/hostedzone/Z10", "corp.local.", Some(true));
        assert_eq!(private.zone_type, ZoneType::Private);
    }

    #[test]
    fn test_registrar_verdicts() {
        let index = RegistrarIndex::available(["example.com.", "example.org", ""]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.verdict("example.com"), RegistrationVerdict::Yes);
        assert_eq!(index.verdict("example.org."), RegistrationVerdict::Yes);
        assert_eq!(index.verdict("example.net"), RegistrationVerdict::No);

        let unavailable = RegistrarIndex::unavailable();
        assert_eq!(unavailable.verdict("example.com"), RegistrationVerdict::Unknown);
    }

    #[test]
    fn test_dnssec_status_strings() {
        assert_eq!(DnssecStatus::Reported("SIGNING".into()).to_string(), "SIGNING");
        assert_eq!(DnssecStatus::NotConfigured.to_string(), "NOT_CONFIGURED");
        assert_eq!(
            DnssecStatus::NotSupportedPrivateZone.to_string(),
            "NOT_SUPPORTED_PRIVATE_ZONE"
        );
        assert_eq!(DnssecStatus::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_enum_display() {
        assert_eq!(ZoneType::Private.to_string(), "PRIVATE");
        assert_eq!(RegistrationVerdict::Unknown.to_string(), "UNKNOWN");
    }
}
