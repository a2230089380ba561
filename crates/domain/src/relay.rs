use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

pub const DEFAULT_ANSWER_TTL: Duration = Duration::from_secs(60);

/// Addresses handed out in every answer. Read-only once serving starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub relay_ipv4: Option<Ipv4Addr>,
    pub relay_ipv6: Option<Ipv6Addr>,
    pub answer_ttl: Duration,
}

impl RelayConfig {
    pub fn new(relay_ipv4: Option<Ipv4Addr>, relay_ipv6: Option<Ipv6Addr>) -> Self {
        Self {
            relay_ipv4,
            relay_ipv6,
            answer_ttl: DEFAULT_ANSWER_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.answer_ttl = ttl;
        self
    }

    /// TTL in whole seconds, saturating at the 32-bit wire limit.
    pub fn ttl_secs(&self) -> u32 {
        u32::try_from(self.answer_ttl.as_secs()).unwrap_or(u32::MAX)
    }

    pub fn has_relay(&self) -> bool {
        self.relay_ipv4.is_some() || self.relay_ipv6.is_some()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}
