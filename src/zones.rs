//! Hosted zone enumeration

use futures::stream::{Stream, StreamExt};
use std::sync::Arc;

use crate::api::{CallTimeout, DnsApi};
use crate::error::ApiError;
use crate::pagination;
use crate::types::ZoneRecord;

/// Lazily walk every hosted zone of an account.
///
/// Single pass: re-enumerating needs a fresh call. A failed page is yielded
/// as `Err` and ends the stream.
pub fn enumerate_zones(
    dns: Arc<dyn DnsApi>,
    timeout: CallTimeout,
) -> impl Stream<Item = Result<ZoneRecord, ApiError>> {
    pagination::items(move |marker: Option<String>| {
        let dns = dns.clone();
        async move {
            timeout
                .run("ListHostedZones", dns.list_hosted_zones(marker.as_deref()))
                .await
        }
    })
    .map(|raw| raw.map(|zone| ZoneRecord::from_raw(&zone.id, &zone.name, zone.private_zone)))
}
