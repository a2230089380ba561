use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::errors::ConfigError;
use super::link_local::LinkLocalConfig;
use super::logging::LoggingConfig;
use super::policy::PolicyConfig;
use super::relay::RelaySettings;
use super::server::ServerConfig;

const LOCAL_CONFIG_PATH: &str = "linkrelay.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/linkrelay/config.toml";

/// Main configuration structure for linkrelay
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (interface, bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Relay gateway addresses handed out in answers
    #[serde(default)]
    pub relay: RelaySettings,

    /// Admission policy
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub link_local: LinkLocalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. linkrelay.toml in current directory
    /// 3. /etc/linkrelay/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(interface) = overrides.interface {
            self.server.interface = interface;
        }
        if let Some(addr) = overrides.local_ipv6 {
            self.server.local_ipv6 = addr;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(addr) = overrides.relay_ipv4 {
            self.relay.ipv4 = Some(addr);
        }
        if let Some(addr) = overrides.relay_ipv6 {
            self.relay.ipv6 = Some(addr);
        }
        if let Some(ttl) = overrides.ttl_secs {
            self.relay.ttl_secs = ttl;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.interface.trim().is_empty() {
            return Err(ConfigError::Validation(
                "No network interface configured".to_string(),
            ));
        }

        for cidr in &self.policy.allowed_subnets {
            cidr.parse::<ipnetwork::IpNetwork>().map_err(|e| {
                ConfigError::Validation(format!("Invalid subnet '{}': {}", cidr, e))
            })?;
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub interface: Option<String>,
    pub local_ipv6: Option<Ipv6Addr>,
    pub dns_port: Option<u16>,
    pub relay_ipv4: Option<Ipv4Addr>,
    pub relay_ipv6: Option<Ipv6Addr>,
    pub ttl_secs: Option<u64>,
    pub log_level: Option<String>,
}
