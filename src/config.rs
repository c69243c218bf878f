//! Audit configuration
//!
//! Built-in defaults, optionally overlaid by a TOML file and then by
//! command-line / environment overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::registrar::DEFAULT_REGISTRAR_REGION;

/// Report location when none is configured
pub const DEFAULT_OUTPUT: &str = "../output/route53_dnssec_inventory.csv";

/// Profiles audited when none are configured
pub const DEFAULT_PROFILES: &[&str] = &["prod", "staging", "dev", "qa", "network"];

/// Configuration for a DNSSEC inventory run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Credential profiles to audit, in report order
    pub profiles: Vec<String>,
    /// CSV report path
    pub output: PathBuf,
    /// Region the registrar client is pinned to
    pub registrar_region: String,
    /// Accounts audited at the same time
    pub max_concurrent_accounts: usize,
    /// DNSSEC queries in flight per account
    pub max_concurrent_zone_queries: usize,
    /// Per-call timeout in seconds (0 disables)
    pub call_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            profiles: DEFAULT_PROFILES.iter().map(|p| p.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            registrar_region: DEFAULT_REGISTRAR_REGION.to_string(),
            max_concurrent_accounts: 4,
            max_concurrent_zone_queries: 8,
            call_timeout_secs: 30,
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub profiles: Vec<String>,
    pub output: Option<PathBuf>,
    pub registrar_region: Option<String>,
    pub max_concurrent_accounts: Option<usize>,
    pub max_concurrent_zone_queries: Option<usize>,
    pub call_timeout_secs: Option<u64>,
}

impl AuditConfig {
    /// Create a config for the given profiles with default limits
    pub fn with_profiles<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profiles: profiles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Apply overrides on top of this config
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if !overrides.profiles.is_empty() {
            self.profiles = overrides.profiles;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(region) = overrides.registrar_region {
            self.registrar_region = region;
        }
        if let Some(n) = overrides.max_concurrent_accounts {
            self.max_concurrent_accounts = n;
        }
        if let Some(n) = overrides.max_concurrent_zone_queries {
            self.max_concurrent_zone_queries = n;
        }
        if let Some(secs) = overrides.call_timeout_secs {
            self.call_timeout_secs = secs;
        }
        self
    }

    /// Check the config can drive a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::Invalid("no profiles configured".to_string()));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.trim().is_empty() {
                return Err(ConfigError::Invalid("blank profile name".to_string()));
            }
            if !seen.insert(profile.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "profile listed more than once: {}",
                    profile
                )));
            }
        }

        if self.registrar_region.trim().is_empty() {
            return Err(ConfigError::Invalid("registrar_region is empty".to_string()));
        }
        if self.max_concurrent_accounts == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_accounts must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_zone_queries == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_zone_queries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
