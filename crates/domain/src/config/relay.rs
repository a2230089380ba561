use crate::RelayConfig;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelaySettings {
    #[serde(default)]
    pub ipv4: Option<Ipv4Addr>,

    #[serde(default)]
    pub ipv6: Option<Ipv6Addr>,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl RelaySettings {
    pub fn to_relay_config(&self) -> RelayConfig {
        RelayConfig::new(self.ipv4, self.ipv6).with_ttl(Duration::from_secs(self.ttl_secs))
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            ipv4: None,
            ipv6: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    60
}
