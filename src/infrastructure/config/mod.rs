use std::collections::BTreeMap;
use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{ReservedNames, RoutingTargets};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Service configuration, loaded once at startup from a TOML file.
/// Every field has a default, so a missing file yields a working
/// development setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub platform: PlatformSettings,
    pub server: ServerSettings,
    pub dns: DnsSettings,
    pub auth: AuthSettings,
    /// Path of the domain-record store file.
    pub store_path: PathBuf,
    /// Extra reserved subdomain labels on top of the curated defaults.
    pub reserved_extra: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformSettings {
    /// The platform's apex domain; free subdomains live under it and
    /// customers may never claim it.
    pub domain: String,
    /// Anycast edge IP that root custom domains must A-record to.
    pub edge_ip: Ipv4Addr,
    /// Canonical edge hostname that subdomain CNAMEs must point at.
    pub canonical_host: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DnsSettings {
    /// Upper bound for a single DNS lookup.
    #[serde(with = "humantime_duration")]
    pub lookup_timeout: Duration,
    /// How often pending domains are re-checked in the background.
    #[serde(with = "humantime_duration")]
    pub recheck_interval: Duration,
}

/// Static bearer-token map standing in for the platform's auth
/// provider. The daemon only needs the seam: token in, identity out.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    pub tokens: BTreeMap<String, TokenIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenIdentity {
    pub user_id: String,
    pub email: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: PlatformSettings::default(),
            server: ServerSettings::default(),
            dns: DnsSettings::default(),
            auth: AuthSettings::default(),
            store_path: PathBuf::from("linkhub-store.toml"),
            reserved_extra: Vec::new(),
        }
    }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            domain: "linkhub.com".to_string(),
            edge_ip: Ipv4Addr::new(76, 76, 21, 21),
            canonical_host: "edge.linkhub.com".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Default for DnsSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            recheck_interval: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or fall back to defaults when the file is
    /// absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn routing_targets(&self) -> RoutingTargets {
        RoutingTargets {
            edge_ip: self.platform.edge_ip,
            canonical_host: self.platform.canonical_host.clone(),
        }
    }

    pub fn reserved_names(&self) -> ReservedNames {
        ReservedNames::with_extra(self.reserved_extra.iter().cloned())
    }
}

/// Durations in the config file are human-readable (`"30s"`, `"5m"`).
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
