use crate::ports::AdmissionPolicy;
use ipnetwork::IpNetwork;
use linkrelay_domain::{DomainError, QueryKind};
use std::net::IpAddr;
use std::sync::Arc;

/// Answers every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

impl AdmissionPolicy for AllowAllPolicy {
    fn should_respond(&self, _name: &str, _kind: &QueryKind, _peer: IpAddr) -> bool {
        true
    }
}

/// Answers peers inside one of the configured networks.
#[derive(Debug, Clone)]
pub struct SubnetPolicy {
    networks: Vec<IpNetwork>,
}

impl SubnetPolicy {
    pub fn new(cidrs: &[String]) -> Result<Self, DomainError> {
        let networks = cidrs
            .iter()
            .map(|cidr| {
                cidr.parse::<IpNetwork>()
                    .map_err(|e| DomainError::InvalidCidr(format!("{}: {}", cidr, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { networks })
    }

    pub fn contains(&self, peer: IpAddr) -> bool {
        // dual-stack sockets report IPv4 peers as ::ffff:a.b.c.d
        let peer = peer.to_canonical();
        self.networks.iter().any(|network| network.contains(peer))
    }
}

impl AdmissionPolicy for SubnetPolicy {
    fn should_respond(&self, _name: &str, _kind: &QueryKind, peer: IpAddr) -> bool {
        self.contains(peer)
    }
}

/// Answers names equal to, or below, one of the listed names.
#[derive(Debug, Clone)]
pub struct NameAllowListPolicy {
    names: Vec<String>,
}

impl NameAllowListPolicy {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|n| !n.is_empty())
            .collect();

        Self { names }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim_end_matches('.').to_ascii_lowercase();
        self.names.iter().any(|allowed| {
            name == *allowed
                || name
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

impl AdmissionPolicy for NameAllowListPolicy {
    fn should_respond(&self, name: &str, _kind: &QueryKind, _peer: IpAddr) -> bool {
        self.matches(name)
    }
}

/// Admits a query only when every member policy does.
#[derive(Clone, Default)]
pub struct PolicyChain {
    policies: Vec<Arc<dyn AdmissionPolicy>>,
}

impl PolicyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, policy: Arc<dyn AdmissionPolicy>) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl AdmissionPolicy for PolicyChain {
    fn should_respond(&self, name: &str, kind: &QueryKind, peer: IpAddr) -> bool {
        self.policies
            .iter()
            .all(|policy| policy.should_respond(name, kind, peer))
    }
}

impl std::fmt::Debug for PolicyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyChain")
            .field("policies", &self.policies.len())
            .finish()
    }
}
