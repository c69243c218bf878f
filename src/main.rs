//! Route53 DNSSEC Inventory - Standalone Binary
//!
//! Audits DNSSEC status of every hosted zone across the configured AWS
//! profiles and writes a CSV report. Read-only: no DNS, zone or key state
//! is modified.
//!
//! # Usage
//! ```bash
//! # Audit the default profiles
//! route53-dnssec-audit
//!
//! # Audit selected profiles into a custom report
//! route53-dnssec-audit --profile prod --profile network --output out/dnssec.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use route53_dnssec_audit::{report, AuditConfig, Auditor, AwsCredentialProvider, ConfigOverrides};

/// Route53 DNSSEC Inventory - audits DNSSEC coverage across AWS accounts
#[derive(Parser, Debug)]
#[command(name = "route53-dnssec-audit", version, about)]
struct Args {
    /// TOML config file
    #[arg(long, env = "AUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// AWS profile to audit (repeatable, replaces the configured list)
    #[arg(long = "profile", env = "AUDIT_PROFILES", value_delimiter = ',')]
    profiles: Vec<String>,

    /// CSV report path
    #[arg(long, env = "AUDIT_OUTPUT")]
    output: Option<PathBuf>,

    /// Region for the Route53 Domains client
    #[arg(long, env = "AUDIT_REGISTRAR_REGION")]
    registrar_region: Option<String>,

    /// Accounts audited concurrently
    #[arg(long, env = "AUDIT_CONCURRENCY")]
    concurrency: Option<usize>,

    /// DNSSEC queries in flight per account
    #[arg(long, env = "AUDIT_ZONE_CONCURRENCY")]
    zone_concurrency: Option<usize>,

    /// Per-call timeout in seconds (0 disables)
    #[arg(long, env = "AUDIT_CALL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            profiles: self.profiles.clone(),
            output: self.output.clone(),
            registrar_region: self.registrar_region.clone(),
            max_concurrent_accounts: self.concurrency,
            max_concurrent_zone_queries: self.zone_concurrency,
            call_timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let config = load_config(&args)?;

    info!(
        profiles = ?config.profiles,
        output = %config.output.display(),
        "Route53 DNSSEC inventory starting"
    );

    let auditor = Auditor::new(Arc::new(AwsCredentialProvider::new()), config);
    let result = auditor.run().await;

    let output = &auditor.config().output;
    report::write_report(output, &result.rows)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    let elapsed = result.finished_at - result.started_at;
    println!("\nInventory completed successfully.");
    println!(
        "Accounts audited: {} ({} failed), zones: {}, elapsed: {}s",
        result.accounts.len(),
        result.failed_accounts(),
        result.rows.len(),
        elapsed.num_seconds()
    );
    println!("CSV saved at: {}", output.display());

    Ok(())
}

fn load_config(args: &Args) -> Result<AuditConfig> {
    let base = match &args.config {
        Some(path) => AuditConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AuditConfig::default(),
    };

    let config = base.with_overrides(args.overrides());
    config.validate().context("Invalid audit configuration")?;
    Ok(config)
}
