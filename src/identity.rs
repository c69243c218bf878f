//! Account identity resolution
//!
//! Looks up the account id behind a session. Never fails: any error is
//! absorbed and reported as `UNKNOWN`.

use tracing::{debug, warn};

use crate::api::{CallTimeout, CloudSession};
use crate::types::UNKNOWN;

/// Resolve the caller's account id, falling back to `UNKNOWN`
pub async fn resolve_account_id(session: &dyn CloudSession, timeout: CallTimeout) -> String {
    let identity = session.identity();

    match timeout
        .run("GetCallerIdentity", identity.get_caller_identity())
        .await
    {
        Ok(caller) => match caller.account_id {
            Some(account_id) if !account_id.is_empty() => {
                debug!(account_id = %account_id, "Resolved caller identity");
                account_id
            }
            _ => {
                warn!("Caller identity response carried no account id");
                UNKNOWN.to_string()
            }
        },
        Err(e) => {
            warn!(error = %e, "Failed to resolve caller identity");
            UNKNOWN.to_string()
        }
    }
}
