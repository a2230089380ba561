use serde::{Deserialize, Serialize};

/// Additional responders attached to link-local sockets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinkLocalConfig {
    /// LLMNR on UDP 5355 (ff02::1:3).
    #[serde(default)]
    pub llmnr: bool,

    /// mDNS on UDP 5353 (ff02::fb).
    #[serde(default)]
    pub mdns: bool,

    /// NetBIOS name service on UDP 137.
    #[serde(default)]
    pub netbios: bool,
}

impl LinkLocalConfig {
    pub fn any_enabled(&self) -> bool {
        self.llmnr || self.mdns || self.netbios
    }
}
