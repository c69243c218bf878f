//! DNSSEC Audit Orchestrator
//!
//! Drives one audit pass per configured profile: session, identity,
//! registrar index, zone enumeration, then one row per hosted zone.
//! Failures are isolated per call and per account so the run always
//! completes.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::{CallTimeout, CredentialProvider, DnsApi};
use crate::config::AuditConfig;
use crate::types::{
    AccountContext, AccountOutcome, AccountStatus, AuditReport, DnssecStatus, InventoryRow,
    RegistrarIndex, ZoneRecord, UNKNOWN,
};
use crate::{dnssec, identity, registrar, zones};

/// DNSSEC inventory auditor
pub struct Auditor {
    /// Resolves profiles to sessions
    provider: Arc<dyn CredentialProvider>,
    /// Accounts and limits for the run
    config: AuditConfig,
}

impl Auditor {
    pub fn new(provider: Arc<dyn CredentialProvider>, config: AuditConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    fn timeout(&self) -> CallTimeout {
        CallTimeout::from_secs(self.config.call_timeout_secs)
    }

    /// Audit every configured account.
    ///
    /// Accounts run concurrently up to `max_concurrent_accounts`; rows come
    /// back in configured account order so reruns produce identical reports.
    pub async fn run(&self) -> AuditReport {
        let started_at = Utc::now();

        info!(
            accounts = self.config.profiles.len(),
            concurrency = self.config.max_concurrent_accounts,
            "Starting DNSSEC inventory"
        );

        let passes: Vec<(Vec<InventoryRow>, AccountOutcome)> =
            stream::iter(self.config.profiles.iter())
                .map(|profile| self.audit_account(profile))
                .buffered(self.config.max_concurrent_accounts.max(1))
                .collect()
                .await;

        let mut rows = Vec::new();
        let mut accounts = Vec::with_capacity(passes.len());
        for (account_rows, outcome) in passes {
            rows.extend(account_rows);
            accounts.push(outcome);
        }

        let report = AuditReport {
            rows,
            accounts,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            rows = report.rows.len(),
            failed_accounts = report.failed_accounts(),
            "DNSSEC inventory complete"
        );

        report
    }

    /// Audit a single account; never fails, failures are reported in the outcome
    pub async fn audit_account(&self, profile: &str) -> (Vec<InventoryRow>, AccountOutcome) {
        info!(profile = %profile, "=== Profile: {} ===", profile);

        let session = match self.provider.resolve(profile).await {
            Ok(session) => session,
            Err(e) => {
                error!(profile = %profile, error = %e, "Failed to create session");
                return (
                    Vec::new(),
                    AccountOutcome {
                        profile: profile.to_string(),
                        account_id: UNKNOWN.to_string(),
                        zones: 0,
                        status: AccountStatus::Aborted {
                            reason: e.to_string(),
                        },
                    },
                );
            }
        };

        let timeout = self.timeout();
        let account_id = identity::resolve_account_id(session.as_ref(), timeout).await;
        let account = AccountContext {
            profile: profile.to_string(),
            account_id,
            session,
        };

        let registrar = registrar::resolve_registrar(
            account.session.as_ref(),
            &self.config.registrar_region,
            timeout,
        )
        .await;

        let dns = account.session.dns();
        let (rows, status) = self.audit_zones(&account, &registrar, dns).await;

        let outcome = AccountOutcome {
            profile: account.profile.clone(),
            account_id: account.account_id.clone(),
            zones: rows.len(),
            status,
        };

        info!(
            profile = %outcome.profile,
            account_id = %outcome.account_id,
            zones = outcome.zones,
            "Account audit finished"
        );

        (rows, outcome)
    }

    async fn audit_zones(
        &self,
        account: &AccountContext,
        registrar: &RegistrarIndex,
        dns: Arc<dyn DnsApi>,
    ) -> (Vec<InventoryRow>, AccountStatus) {
        let timeout = self.timeout();

        let classified = zones::enumerate_zones(dns.clone(), timeout)
            .map(|zone| {
                let dns = dns.clone();
                async move {
                    match zone {
                        Ok(zone) => {
                            Ok(classify_zone(account, registrar, dns.as_ref(), zone, timeout).await)
                        }
                        Err(e) => Err(e),
                    }
                }
            })
            .buffered(self.config.max_concurrent_zone_queries.max(1));
        let mut classified = std::pin::pin!(classified);

        let mut rows = Vec::new();
        while let Some(result) = classified.next().await {
            match result {
                Ok(row) => {
                    info!(
                        profile = %row.profile,
                        " - {} ({}) Registrar={}, DNSSEC={}",
                        row.domain_name,
                        row.zone_type,
                        row.registered_in_route53,
                        row.dnssec_status
                    );
                    rows.push(row);
                }
                Err(e) => {
                    warn!(
                        profile = %account.profile,
                        zones_listed = rows.len(),
                        error = %e,
                        "Hosted zone listing failed"
                    );
                    return (
                        rows,
                        AccountStatus::Partial {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        (rows, AccountStatus::Completed)
    }
}

/// Build the report row for one zone.
///
/// Private zones are never sent to the DNSSEC resolver.
pub async fn classify_zone(
    account: &AccountContext,
    registrar: &RegistrarIndex,
    dns: &dyn DnsApi,
    zone: ZoneRecord,
    timeout: CallTimeout,
) -> InventoryRow {
    let registered = registrar.verdict(&zone.domain_name);

    let dnssec_status = if zone.zone_type.is_private() {
        DnssecStatus::NotSupportedPrivateZone
    } else {
        dnssec::resolve_dnssec(dns, &zone.hosted_zone_id, timeout).await
    };

    InventoryRow::new(account, zone, registered, dnssec_status)
}
