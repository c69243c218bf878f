//! CSV report sink

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::ReportError;
use crate::types::InventoryRow;

/// Report columns, in order
pub const COLUMNS: [&str; 7] = [
    "profile",
    "account_id",
    "hosted_zone_id",
    "domain_name",
    "zone_type",
    "registered_in_route53",
    "dnssec_status",
];

/// Serialize rows as CSV, header first (also for an empty report)
pub fn write_rows<W: Write>(writer: W, rows: &[InventoryRow]) -> Result<(), ReportError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(COLUMNS)?;
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;

    Ok(())
}

/// Write the report file, creating its parent directory if needed
pub fn write_report(path: &Path, rows: &[InventoryRow]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path)?;
    write_rows(file, rows)?;

    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}
