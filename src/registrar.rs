//! Registrar cross-reference
//!
//! Builds the set of domains registered through the account's registrar.
//! The listing is all-or-nothing: a partial set could turn registered
//! domains into false "NO" verdicts, so any failure yields an unavailable
//! index instead.

use futures::StreamExt;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::api::{CallTimeout, CloudSession, MarkerPage};
use crate::pagination;
use crate::types::RegistrarIndex;

/// Region the registrar API is served from
pub const DEFAULT_REGISTRAR_REGION: &str = "us-east-1";

/// Fetch every registered domain across all listing pages
pub async fn resolve_registrar(
    session: &dyn CloudSession,
    region: &str,
    timeout: CallTimeout,
) -> RegistrarIndex {
    let client = match session.registrar(region) {
        Ok(client) => client,
        Err(e) => {
            warn!(region = %region, error = %e, "Failed to create registrar client");
            return RegistrarIndex::unavailable();
        }
    };

    let mut domains = HashSet::new();
    let mut page_count = 0usize;

    let pages = pagination::pages(move |marker: Option<String>| {
        let client = client.clone();
        async move {
            timeout
                .run("ListDomains", client.list_domains(marker.as_deref()))
                .await
        }
    });
    let mut pages = std::pin::pin!(pages);

    while let Some(page) = pages.next().await {
        match page {
            Ok(page) => {
                page_count += 1;
                debug!(page = page_count, count = page.domains.len(), "Fetched registrar page");
                domains.extend(
                    page.into_items()
                        .into_iter()
                        .filter(|d| !d.is_empty()),
                );
            }
            Err(e) => {
                warn!(
                    page = page_count + 1,
                    error = %e,
                    "Registrar listing failed, registration verdicts will be UNKNOWN"
                );
                return RegistrarIndex::unavailable();
            }
        }
    }

    let index = RegistrarIndex::available(domains);
    info!(domains = index.len(), pages = page_count, "Loaded registered domains");
    index
}
