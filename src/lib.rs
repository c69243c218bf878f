//! Route53 DNSSEC Inventory
//!
//! Read-only audit of DNSSEC coverage across AWS accounts. For every
//! configured profile the auditor enumerates hosted zones, resolves each
//! public zone's DNSSEC signing status, cross-references Route53 Domains
//! registrations and emits one report row per zone.
//!
//! ## Failure model
//!
//! - Missing profile: the account contributes no rows, the run continues
//! - Identity / registrar / DNSSEC failures: the affected value becomes `UNKNOWN`
//! - Report serialization failure: fatal

pub mod api;
pub mod aws;
pub mod config;
pub mod dnssec;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod pagination;
pub mod registrar;
pub mod report;
pub mod types;
pub mod zones;

pub use api::{CallTimeout, CloudSession, CredentialProvider, DnsApi, IdentityApi, RegistrarApi};
pub use aws::AwsCredentialProvider;
pub use config::{AuditConfig, ConfigOverrides};
pub use error::{ApiError, ConfigError, CredentialError, DnssecQueryError, ReportError};
pub use orchestrator::Auditor;
pub use types::{
    AccountOutcome, AccountStatus, AuditReport, DnssecStatus, InventoryRow, RegistrarIndex,
    RegistrationVerdict, ZoneRecord, ZoneType,
};
