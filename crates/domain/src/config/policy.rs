use serde::{Deserialize, Serialize};

/// Restricts which queries are answered. Empty lists do not restrict.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Peers must be inside one of these CIDRs.
    #[serde(default)]
    pub allowed_subnets: Vec<String>,

    /// Names must equal one of these entries or be below it.
    #[serde(default)]
    pub allowed_names: Vec<String>,
}

impl PolicyConfig {
    pub fn is_unrestricted(&self) -> bool {
        self.allowed_subnets.is_empty() && self.allowed_names.is_empty()
    }
}
