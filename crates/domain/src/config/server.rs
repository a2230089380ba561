use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Interface the responder is bound to; also the IPv6 zone of the
    /// listen address.
    #[serde(default)]
    pub interface: String,

    #[serde(default = "default_local_ipv6")]
    pub local_ipv6: Ipv6Addr,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            interface: String::new(),
            local_ipv6: default_local_ipv6(),
            dns_port: default_dns_port(),
        }
    }
}

fn default_local_ipv6() -> Ipv6Addr {
    Ipv6Addr::UNSPECIFIED
}

fn default_dns_port() -> u16 {
    53
}
