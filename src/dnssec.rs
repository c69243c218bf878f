//! DNSSEC status resolution for public hosted zones

use tracing::{debug, warn};

use crate::api::{CallTimeout, DnsApi};
use crate::error::DnssecQueryError;
use crate::types::DnssecStatus;

/// Query the signing status of a public zone.
///
/// Single attempt; callers must not pass private zones.
pub async fn resolve_dnssec(
    dns: &dyn DnsApi,
    hosted_zone_id: &str,
    timeout: CallTimeout,
) -> DnssecStatus {
    match timeout
        .run("GetDNSSEC", dns.get_dnssec(hosted_zone_id))
        .await
    {
        Ok(response) => match response.status {
            Some(status) if !status.is_empty() => DnssecStatus::Reported(status),
            _ => {
                debug!(zone_id = %hosted_zone_id, "DNSSEC response carried no status");
                DnssecStatus::Unknown
            }
        },
        Err(DnssecQueryError::NotFound) => DnssecStatus::NotConfigured,
        Err(DnssecQueryError::Other(e)) => {
            warn!(zone_id = %hosted_zone_id, error = %e, "DNSSEC query failed");
            DnssecStatus::Unknown
        }
    }
}
