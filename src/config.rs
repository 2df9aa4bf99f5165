//! Sync configuration
//!
//! Values arrive from flags or the environment (`ZT_NETWORK`, `ZT_TOKEN`,
//! `DOMAIN`, `R53_ZONE`) and are validated together before any remote call.

use clap::Args;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required values are unset or blank
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Unvalidated configuration as parsed from the command line
#[derive(Args, Debug, Clone, Default)]
pub struct RawConfig {
    /// ZeroTier network ID to read members from
    #[arg(long = "network", env = "ZT_NETWORK")]
    pub network_id: Option<String>,

    /// ZeroTier Central API token
    #[arg(long = "token", env = "ZT_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Domain suffix appended to member names (e.g. zt.example.com)
    #[arg(long = "domain", env = "DOMAIN")]
    pub domain_suffix: Option<String>,

    /// Route 53 hosted zone ID
    #[arg(long = "zone", env = "R53_ZONE")]
    pub hosted_zone_id: Option<String>,
}

/// Validated configuration handed to each stage
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub network_id: String,
    pub auth_token: String,
    pub domain_suffix: String,
    pub hosted_zone_id: String,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("network_id", &self.network_id)
            .field("auth_token", &"<redacted>")
            .field("domain_suffix", &self.domain_suffix)
            .field("hosted_zone_id", &self.hosted_zone_id)
            .finish()
    }
}

impl RawConfig {
    /// Check every required value, reporting all missing ones at once
    pub fn validate(self) -> Result<SyncConfig, ConfigError> {
        let mut missing = Vec::new();

        let network_id = required(self.network_id, "ZT_NETWORK", &mut missing);
        let auth_token = required(self.auth_token, "ZT_TOKEN", &mut missing);
        let domain_suffix = required(self.domain_suffix, "DOMAIN", &mut missing);
        let hosted_zone_id = required(self.hosted_zone_id, "R53_ZONE", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(SyncConfig {
            network_id,
            auth_token,
            domain_suffix,
            hosted_zone_id,
        })
    }
}

fn required(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawConfig {
        RawConfig {
            network_id: Some("8056c2e21c000001".to_string()),
            auth_token: Some("secret".to_string()),
            domain_suffix: Some("zt.example.com".to_string()),
            hosted_zone_id: Some("Z0123456789ABC".to_string()),
        }
    }

    #[test]
    fn test_complete_config_validates() {
        let config = complete().validate().unwrap();

        assert_eq!(config.network_id, "8056c2e21c000001");
        assert_eq!(config.domain_suffix, "zt.example.com");
        assert_eq!(config.hosted_zone_id, "Z0123456789ABC");
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let err = RawConfig::default().validate().unwrap_err();

        assert_eq!(
            err,
            ConfigError::Missing(vec!["ZT_NETWORK", "ZT_TOKEN", "DOMAIN", "R53_ZONE"])
        );
        assert_eq!(
            err.to_string(),
            "Missing required configuration: ZT_NETWORK, ZT_TOKEN, DOMAIN, R53_ZONE"
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let raw = RawConfig {
            auth_token: Some("   ".to_string()),
            hosted_zone_id: Some(String::new()),
            ..complete()
        };

        assert_eq!(
            raw.validate().unwrap_err(),
            ConfigError::Missing(vec!["ZT_TOKEN", "R53_ZONE"])
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = complete().validate().unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
